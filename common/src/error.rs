use actix_web::{HttpResponse, http::StatusCode};
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    JWT(#[from] jsonwebtoken::errors::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_message = |err_msg: &str| {
            if is_dev {
                err_msg.to_string()
            } else {
                "Internal server error".to_string()
            }
        };

        let message = match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                to_internal_message(&error.to_string())
            }
            AppError::JWT(error) => {
                log::error!("JWT error: {}", error);
                to_internal_message(&error.to_string())
            }
            AppError::Template(error) => {
                log::error!("Template error: {:?}", error);
                to_internal_message(&error.to_string())
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_) | AppError::NotFound(_) | AppError::BadRequest(_) => {
                self.to_string()
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                to_internal_message(error)
            }
        };

        let status = self.status();
        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(error_page(status, &message))
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

// Kept free of the template engine so an error can still be shown when rendering fails.
fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{code}</title></head>\
         <body><main class=\"error\"><h2>{reason}</h2><p>{message}</p>\
         <a href=\"/dashboard\">Go back</a></main></body></html>",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = tera::escape_html(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_errors_keep_their_status() {
        assert_eq!(
            AppError::NotFound("invoice".into()).to_http_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("nope".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_page_escapes_message() {
        let page = error_page(StatusCode::BAD_REQUEST, "<script>");
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("Bad Request"));
    }
}
