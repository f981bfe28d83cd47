use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::UserType;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .get(&current.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Public read model of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub role: UserRole,
    pub name: String,
    pub shortname: Option<String>,
    pub tin: Option<String>,
    pub ogrn: Option<String>,
    pub kpp: Option<String>,
    pub brand: Option<String>,
    pub manager_name: Option<String>,
    pub manager_position: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            user_type: user.user_type,
            role: user.role,
            name: user.name.clone(),
            shortname: user.shortname.clone(),
            tin: user.tin.clone(),
            ogrn: user.ogrn.clone(),
            kpp: user.kpp.clone(),
            brand: user.brand.clone(),
            manager_name: user.manager_name.clone(),
            manager_position: user.manager_position.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
