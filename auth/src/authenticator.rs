use std::sync::OnceLock;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Serialize;

use crate::jwt::Algorithm;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

const DECOY_PASSWORD: &str = "decoy-password-never-stored";

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    // Hashed with `password_hasher` so a decoy check costs the same as a real one.
    decoy_hash: OnceLock<Option<String>>,
}

/// Issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `algorithm` - HMAC signing algorithm
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - `algorithm` is not an HMAC algorithm
    pub fn new(
        jwt_secret: &[u8],
        algorithm: Algorithm,
        token_ttl: Duration,
    ) -> Result<Self, JwtError> {
        Ok(Self::with_hasher(
            PasswordHasher::new(),
            JwtHandler::new(jwt_secret, algorithm)?,
            token_ttl,
        ))
    }

    /// Create an authenticator from preconfigured parts.
    pub fn with_hasher(
        password_hasher: PasswordHasher,
        jwt_handler: JwtHandler,
        token_ttl: Duration,
    ) -> Self {
        Self {
            password_hasher,
            jwt_handler,
            token_ttl,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<AccessToken, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject)?)
    }

    /// Run one password verification against a decoy hash and discard it.
    ///
    /// Call when no stored hash exists for the claimed subject, so that the
    /// rejection takes as long as a wrong password does.
    pub fn reject_unknown(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.password_hasher.hash(DECOY_PASSWORD).ok());

        if let Some(hash) = decoy {
            let _ = self.password_hasher.verify(password, hash);
        }
    }

    /// Issue a token for `subject` without password verification.
    ///
    /// Used right after registration, when the caller has just proven the
    /// credentials by creating them.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString) -> Result<AccessToken, JwtError> {
        let claims = Claims::issue(subject, self.token_ttl);
        let access_token = self.jwt_handler.encode(&claims)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_at,
        })
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is expired, forged, or malformed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
