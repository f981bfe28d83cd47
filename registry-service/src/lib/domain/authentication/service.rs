use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessToken;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::models::CreateUserCommand;
use crate::user::ports::UserServicePort;

/// Registration, login and token verification on top of the user service.
pub struct AuthService<US>
where
    US: UserServicePort + ?Sized,
{
    user_service: Arc<US>,
    authenticator: Arc<Authenticator>,
}

impl<US> AuthService<US>
where
    US: UserServicePort + ?Sized,
{
    pub fn new(user_service: Arc<US>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            user_service,
            authenticator,
        }
    }
}

#[async_trait]
impl<US> AuthServicePort for AuthService<US>
where
    US: UserServicePort + ?Sized,
{
    async fn register(&self, command: CreateUserCommand) -> Result<AccessToken, AuthError> {
        let user = self.user_service.add(command).await?;
        let token = self.authenticator.issue_token(user.id)?;

        Ok(token)
    }

    async fn authenticate(
        &self,
        name: &str,
        password: &str,
    ) -> Result<Option<AccessToken>, AuthError> {
        let Some(credentials) = self.user_service.get_credentials_by_name(name).await? else {
            self.authenticator.reject_unknown(password);
            tracing::debug!("Login rejected: unknown name");
            return Ok(None);
        };

        match self.authenticator.authenticate(
            password,
            &credentials.password_hash,
            credentials.user.id,
        ) {
            Ok(token) => {
                tracing::info!(user_id = %credentials.user.id, "User logged in");
                Ok(Some(token))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(user_id = %credentials.user.id, "Login rejected: wrong password");
                Ok(None)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(
                    user_id = %credentials.user.id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                Err(e.into())
            }
            Err(AuthenticationError::JwtError(e)) => Err(e.into()),
        }
    }

    fn decode(&self, token: &str) -> Option<Claims> {
        self.authenticator
            .validate_token(token)
            .map_err(|e| tracing::debug!(error = %e, "Token rejected"))
            .ok()
    }
}
