use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete(&current.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
