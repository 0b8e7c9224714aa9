//! Cookshare HTTP server
//!
//! Serves the shared shopping list API on top of the same SQLite database
//! the CLI uses.
//!
//! # Configuration
//!
//! Environment variables:
//! - `COOKSHARE_CONFIG`: Path to config file (default: ~/.config/cookshare/config.yaml)
//! - `COOKSHARE_PORT`: Port to listen on (default: 8080)
//! - `COOKSHARE_DATABASE_PATH`: SQLite database (default: ~/.local/share/cookshare/cookshare.db)
//!
//! # Config File Format
//!
//! ```yaml
//! port: 8080
//! api_keys:
//!   - key: "your-secret-key-here"
//!     user_id: "alice"
//! ```
//!
//! # Endpoints
//!
//! - `GET /health`: Health check (no auth required)
//! - `GET /api/shopping-list`: The caller's list
//! - `POST /api/shopping-list/add-recipe`: Merge a recipe into the list
//! - `POST /api/shopping-list/items`: Add a manual item
//! - `POST /api/shopping-list/items/{index}/toggle`: Toggle an item
//! - `DELETE /api/shopping-list/items/{index}`: Remove an item
//! - `POST /api/shopping-list/clear-completed`: Drop completed items
//! - `POST /api/shopping-list/invite`: Share the list with another user
//! - `DELETE /api/shopping-list/invite/{user_id}`: Stop sharing (or leave)

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cookshare::config::Config;
use cookshare::db::{init_db, RecipeRepository, ShoppingListRepository};
use cookshare::server::{router, ApiKeyStore, AppState};
use cookshare::service::ShoppingListService;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cookshare_server=info,cookshare=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("COOKSHARE_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path)?;

    match &config.config_file {
        Some(path) => tracing::info!("Config file: {}", path.display()),
        None => tracing::warn!("No config file found, using defaults"),
    }
    tracing::info!("Database: {}", config.database_path.value.display());

    let pool = init_db(&config.database_path.value).await?;
    let service = ShoppingListService::new(
        RecipeRepository::new(pool.clone()),
        ShoppingListRepository::new(pool),
    );
    let state = AppState::new(service, ApiKeyStore::new(&config.api_keys));

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port.value));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
