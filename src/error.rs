use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                let body = crate::templates::not_found_page(&what);
                (StatusCode::NOT_FOUND, Html(body)).into_response()
            },
            err => {
                tracing::error!(error = %err, "request failed");
                // Details stay in the log; the page only says something failed.
                let body = crate::templates::error_page(INTERNAL_ERROR_MESSAGE.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
            },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
