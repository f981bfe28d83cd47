use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::register::TokenData;
use super::ApiError;
use super::ApiForm;
use crate::inbound::http::router::AppState;

/// OAuth2 password flow: form-encoded `username` and `password`.
pub async fn login(
    State(state): State<AppState>,
    ApiForm(body): ApiForm<LoginForm>,
) -> Result<Json<TokenData>, ApiError> {
    let token = state
        .auth_service
        .authenticate(&body.username, &body.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect credentials".to_string()))?;

    Ok(Json(token.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}
