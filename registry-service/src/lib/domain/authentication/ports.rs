use async_trait::async_trait;

use crate::domain::authentication::errors::AuthError;
use crate::domain::user::models::CreateUserCommand;

/// Port for registration, login and token checks.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a user and issue a token bound to its identifier.
    ///
    /// # Errors
    /// * `User(Validation)` - A field rule is broken
    /// * `User(NameAlreadyExists)` - Name is already taken
    /// * `Token` - Token generation failed
    async fn register(&self, command: CreateUserCommand) -> Result<auth::AccessToken, AuthError>;

    /// Check a name and password and issue a token.
    ///
    /// Unknown name and wrong password both return `Ok(None)`, so callers
    /// cannot tell which one happened.
    ///
    /// # Errors
    /// * `Password` - The stored hash is corrupt
    /// * `Token` - Token generation failed
    /// * `User(DatabaseError)` - Database operation failed
    async fn authenticate(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Option<auth::AccessToken>, AuthError>;

    /// Verify a token's signature and expiry.
    ///
    /// Any verification failure returns `None`.
    fn decode(&self, token: &str) -> Option<auth::Claims>;
}
