//! HTTP API for shared shopping lists.
//!
//! `/health` is public. Everything under `/api` requires a bearer API key
//! that maps to a user id.

pub mod auth;
mod handlers;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use auth::{ApiKeyStore, AuthUser};

use crate::service::ShoppingListService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ShoppingListService,
    pub api_keys: Arc<ApiKeyStore>,
}

impl AppState {
    pub fn new(service: ShoppingListService, api_keys: ApiKeyStore) -> Self {
        Self {
            service,
            api_keys: Arc::new(api_keys),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::health));

    let protected_routes = Router::new()
        .route("/api/shopping-list", get(handlers::get_list))
        .route("/api/shopping-list/add-recipe", post(handlers::add_recipe))
        .route("/api/shopping-list/items", post(handlers::add_item))
        .route(
            "/api/shopping-list/items/{index}/toggle",
            post(handlers::toggle_item),
        )
        .route(
            "/api/shopping-list/items/{index}",
            delete(handlers::remove_item),
        )
        .route(
            "/api/shopping-list/clear-completed",
            post(handlers::clear_completed),
        )
        .route("/api/shopping-list/invite", post(handlers::invite))
        .route(
            "/api/shopping-list/invite/{user_id}",
            delete(handlers::uninvite),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
