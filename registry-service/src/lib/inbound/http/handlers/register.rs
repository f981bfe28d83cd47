use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UserRole;
use crate::domain::user::models::UserType;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenData>), ApiError> {
    let token = state.auth_service.register(body.into_command()).await?;

    Ok((StatusCode::CREATED, Json(token.into())))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "type")]
    user_type: UserType,
    #[serde(default)]
    role: UserRole,
    name: String,
    shortname: Option<String>,
    tin: Option<String>,
    ogrn: Option<String>,
    kpp: Option<String>,
    brand: Option<String>,
    manager_name: Option<String>,
    manager_position: Option<String>,
    password: String,
}

impl RegisterRequest {
    fn into_command(self) -> CreateUserCommand {
        CreateUserCommand {
            role: self.role,
            shortname: self.shortname,
            tin: self.tin,
            ogrn: self.ogrn,
            kpp: self.kpp,
            brand: self.brand,
            manager_name: self.manager_name,
            manager_position: self.manager_position,
            ..CreateUserCommand::new(self.user_type, self.name, self.password)
        }
    }
}

/// OAuth2 token response, sent bare rather than in the `data` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub token_type: String,
}

impl From<auth::AccessToken> for TokenData {
    fn from(token: auth::AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
        }
    }
}
