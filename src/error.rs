//! Application error type shared by the service layer, CLI and HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cookshare_core::ShoppingListError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    List(#[from] ShoppingListError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RecipeNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::List(ShoppingListError::ItemOutOfRange { .. }) => StatusCode::NOT_FOUND,
            AppError::List(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::RecipeNotFound(_) => "recipe_not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Forbidden(_) => "forbidden",
            AppError::List(ShoppingListError::ItemOutOfRange { .. }) => "item_not_found",
            AppError::List(_) => "invalid_item",
            AppError::Database(_) => "internal_error",
        }
    }
}

/// Error body returned by the HTTP API
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                error: self.code(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::RecipeNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::List(ShoppingListError::ItemOutOfRange { index: 4, len: 2 }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::List(ShoppingListError::EmptyItemName).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display() {
        let err = AppError::List(ShoppingListError::ItemOutOfRange { index: 4, len: 2 });
        assert_eq!(err.to_string(), "No item at position 4 (list has 2 items)");
        assert_eq!(
            AppError::RecipeNotFound("abc".into()).to_string(),
            "Recipe not found: abc"
        );
    }
}
