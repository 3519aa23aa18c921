use axum::{
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::db::RepositoryError;

#[derive(Debug)]
pub enum ApiError {
    /// The path has no username segment where one is required.
    MissingUsername,

    /// The request body is not a decodable user.
    MalformedBody(String),

    /// `PUT /users/{name}` carried a body for a different user.
    UsernameMismatch { path: String, body: String },

    UnsupportedMethod(Method),

    TemplateNotFound(String),

    Render(String),

    Storage(RepositoryError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUsername => write!(f, "no username provided"),
            Self::MalformedBody(msg) => write!(f, "invalid request body: {msg}"),
            Self::UsernameMismatch { .. } => write!(f, "wrong user specified"),
            Self::UnsupportedMethod(_) => write!(f, "Not Found"),
            Self::TemplateNotFound(name) => write!(f, "template not found: {name}"),
            Self::Render(msg) => write!(f, "template rendering failed: {msg}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

/// Every failure is reported as `500` with the message as a plain-text body;
/// clients cannot tell a missing user from a storage outage.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(err) if err.is_violation() => {
                tracing::warn!("Storage rule violated: {}", err);
            }
            Self::Storage(err) => tracing::error!("Database error: {}", err),
            Self::Render(msg) => tracing::error!("Render error: {}", msg),
            Self::TemplateNotFound(name) => tracing::error!("Template not found: {}", name),
            Self::UsernameMismatch { path, body } => {
                tracing::warn!(path_username = %path, body_username = %body, "Username mismatch");
            }
            Self::UnsupportedMethod(method) => tracing::warn!(%method, "Unsupported method"),
            other => tracing::warn!("Request failed: {}", other),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Storage(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedBody(err.to_string())
    }
}
