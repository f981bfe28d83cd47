use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::get_profile::ProfileData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::user::models::Address;
use crate::domain::user::models::BankDetails;
use crate::domain::user::models::Contacts;
use crate::domain::user::models::Passport;
use crate::domain::user::models::UserDetails;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Stores each supplied sub-record; omitted ones are left untouched.
pub async fn update_details(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    ApiJson(body): ApiJson<UpdateDetailsRequest>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .user_service
        .update_details(&current.user_id, body.into())
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateDetailsRequest {
    passport: Option<Passport>,
    address: Option<Address>,
    bank_details: Option<BankDetails>,
    contacts: Option<Contacts>,
}

impl From<UpdateDetailsRequest> for UserDetails {
    fn from(body: UpdateDetailsRequest) -> Self {
        UserDetails {
            passport: body.passport,
            address: body.address,
            bank_details: body.bank_details,
            contacts: body.contacts,
        }
    }
}
