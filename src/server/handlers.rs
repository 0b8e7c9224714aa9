use axum::{
    extract::{Path, State},
    Extension, Json,
};
use cookshare_core::ShoppingList;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::AuthUser;
use super::AppState;
use crate::error::AppError;
use crate::service::AddRecipeOutcome;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeRequest {
    #[serde(default)]
    recipe_id: String,
    servings: Option<f64>,
}

pub async fn add_recipe(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddRecipeRequest>,
) -> Result<Json<AddRecipeOutcome>, AppError> {
    let recipe_id = Uuid::parse_str(body.recipe_id.trim())
        .map_err(|_| AppError::InvalidInput(format!("Invalid recipeId '{}'", body.recipe_id)))?;

    let outcome = state
        .service
        .add_recipe_to_list(&user.user_id, recipe_id, body.servings)
        .await?;
    Ok(Json(outcome))
}

pub async fn get_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ShoppingList>, AppError> {
    Ok(Json(state.service.current_list(&user.user_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    name: String,
    #[serde(default)]
    amount: String,
    #[serde(default)]
    unit: String,
}

pub async fn add_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ShoppingList>, AppError> {
    let list = state
        .service
        .add_item(&user.user_id, &body.name, &body.amount, &body.unit)
        .await?;
    Ok(Json(list))
}

pub async fn toggle_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(index): Path<usize>,
) -> Result<Json<ShoppingList>, AppError> {
    Ok(Json(state.service.toggle_item(&user.user_id, index).await?))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(index): Path<usize>,
) -> Result<Json<ShoppingList>, AppError> {
    Ok(Json(state.service.remove_item(&user.user_id, index).await?))
}

#[derive(Serialize)]
pub struct ClearCompletedResponse {
    removed: usize,
}

pub async fn clear_completed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ClearCompletedResponse>, AppError> {
    let removed = state.service.clear_completed(&user.user_id).await?;
    Ok(Json(ClearCompletedResponse { removed }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    user_id: String,
}

pub async fn invite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<InviteRequest>,
) -> Result<Json<ShoppingList>, AppError> {
    Ok(Json(state.service.invite(&user.user_id, &body.user_id).await?))
}

pub async fn uninvite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(target): Path<String>,
) -> Result<Json<ShoppingList>, AppError> {
    Ok(Json(state.service.uninvite(&user.user_id, &target).await?))
}
