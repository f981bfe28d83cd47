use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::get_current_user::UserData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Address;
use crate::domain::user::models::BankDetails;
use crate::domain::user::models::Contacts;
use crate::domain::user::models::Passport;
use crate::domain::user::models::UserProfile;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .user_service
        .get_profile(&current.user_id)
        .await
        .map_err(ApiError::from)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub user: UserData,
    pub passport: Option<Passport>,
    pub address: Option<Address>,
    pub bank_details: Option<BankDetails>,
    pub contacts: Option<Contacts>,
}

impl From<UserProfile> for ProfileData {
    fn from(profile: UserProfile) -> Self {
        Self {
            user: (&profile.user).into(),
            passport: profile.details.passport,
            address: profile.details.address,
            bank_details: profile.details.bank_details,
            contacts: profile.details.contacts,
        }
    }
}
