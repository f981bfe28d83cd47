//! Credential primitives for the registry service.
//!
//! - Password hashing (Argon2id, salted PHC strings)
//! - Access token signing and verification (HMAC JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("secret1").unwrap();
//! assert!(hasher.verify("secret1", &hash).unwrap());
//! assert!(!hasher.verify("secret2", &hash).unwrap());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Algorithm, Authenticator, PasswordHasher};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Algorithm::HS256,
//!     Duration::minutes(30),
//! )
//! .unwrap();
//!
//! let hash = PasswordHasher::new().hash("password123").unwrap();
//! let token = auth.authenticate("password123", &hash, "user123").unwrap();
//!
//! let claims = auth.validate_token(&token.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AccessToken;
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Algorithm;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
