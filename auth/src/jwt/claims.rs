use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token payload.
///
/// Carries the authenticated subject and the standard RFC 7519 time claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Claims for `subject`, issued now and valid for `ttl`.
    pub fn issue(subject: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Claims with explicit timestamps.
    pub fn new(subject: impl ToString, issued_at: i64, expires_at: i64) -> Self {
        Self {
            sub: subject.to_string(),
            exp: expires_at,
            iat: issued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sets_expiration_from_ttl() {
        let claims = Claims::issue("user123", Duration::minutes(30));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }
}
