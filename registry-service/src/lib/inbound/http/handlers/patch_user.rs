use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::get_current_user::UserData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserRole;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn patch_user(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<PatchUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .patch(&current.user_id, body.into())
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Fields absent from the body keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatchUserRequest {
    role: Option<UserRole>,
    shortname: Option<String>,
    tin: Option<String>,
    ogrn: Option<String>,
    kpp: Option<String>,
    brand: Option<String>,
    manager_name: Option<String>,
    manager_position: Option<String>,
    password: Option<String>,
}

impl From<PatchUserRequest> for UpdateUserCommand {
    fn from(body: PatchUserRequest) -> Self {
        UpdateUserCommand {
            role: body.role,
            shortname: body.shortname,
            tin: body.tin,
            ogrn: body.ogrn,
            kpp: body.kpp,
            brand: body.brand,
            manager_name: body.manager_name,
            manager_position: body.manager_position,
            password: body.password,
        }
    }
}
