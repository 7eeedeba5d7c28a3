use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::db::StoreError;
use crate::utils::redirect::login_url;

/// Failures that end a request before the workflow gets a say.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("login required")]
    LoginRequired { next: String },
    #[error("missing or invalid CSRF token")]
    Csrf,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LoginRequired { .. } => StatusCode::SEE_OTHER,
            Self::Csrf => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Template(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::LoginRequired { next } => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, login_url(next)))
                .finish(),
            Self::Csrf => HttpResponse::BadRequest()
                .content_type("text/plain; charset=utf-8")
                .body("The CSRF token is missing or invalid."),
            _ => {
                tracing::error!(error = %self, "Request failed");
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("Internal Server Error")
            }
        }
    }
}
