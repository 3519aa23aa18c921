use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::info;

use super::path::{require_username, resolve_username};
use super::render::View;
use super::{ApiError, AppState};
use crate::models::User;

/// Single entry point for every `/users` and `/api/users` route.
///
/// | method | username in path | action |
/// |--------|------------------|--------|
/// | GET    | no               | list   |
/// | GET    | yes              | read   |
/// | POST   | ignored          | create |
/// | PUT    | required         | update |
/// | DELETE | required         | delete |
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let path = uri.path();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    match method {
        Method::GET => match resolve_username(path) {
            None => list_users(&state, content_type).await,
            Some(username) => find_user(&state, &username, content_type).await,
        },
        Method::POST => create_user(&state, &body).await,
        Method::PUT => update_user(&state, path, &body).await,
        Method::DELETE => delete_user(&state, path).await,
        other => Err(ApiError::UnsupportedMethod(other)),
    }
}

async fn list_users(state: &AppState, content_type: Option<&str>) -> Result<Response, ApiError> {
    let users = state.users.list_all_users().await?;
    state.renderer.render(content_type, &users, View::List).await
}

async fn find_user(
    state: &AppState,
    username: &str,
    content_type: Option<&str>,
) -> Result<Response, ApiError> {
    let user = state.users.find_by_username(username).await?;
    state.renderer.render(content_type, &user, View::Show).await
}

async fn create_user(state: &AppState, body: &[u8]) -> Result<Response, ApiError> {
    let user = decode_user(body)?;
    state.users.add_user(&user).await?;

    info!(username = %user.username, "User created");
    Ok(confirmation("user successfully added"))
}

async fn update_user(state: &AppState, path: &str, body: &[u8]) -> Result<Response, ApiError> {
    let username = require_username(path)?;
    let user = decode_user(body)?;

    if user.username != username {
        return Err(ApiError::UsernameMismatch {
            path: username,
            body: user.username,
        });
    }

    state.users.update_user(&user).await?;

    info!(username = %user.username, "User updated");
    Ok(confirmation("user successfully updated"))
}

async fn delete_user(state: &AppState, path: &str) -> Result<Response, ApiError> {
    let username = require_username(path)?;
    state.users.remove_user(&username).await?;

    info!(username = %username, "User deleted");
    Ok(confirmation("user successfully deleted"))
}

/// Decodes a user from a JSON object body. Arrays and scalars are malformed.
fn decode_user(body: &[u8]) -> Result<User, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(ApiError::MalformedBody("expected a JSON object".to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

fn confirmation(message: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message,
    )
        .into_response()
}
