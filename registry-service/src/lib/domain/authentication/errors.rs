use thiserror::Error;

use crate::user::errors::UserError;

/// Errors from registration and login.
///
/// Failed credentials are not an error; see `AuthServicePort::authenticate`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),
}
