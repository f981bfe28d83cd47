use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::JwtError;

/// Signs and verifies JWTs with a shared secret.
///
/// Only the HMAC family (HS256, HS384, HS512) is accepted, since the key
/// material is a single secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a handler for `algorithm` keyed with `secret`.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - `algorithm` is not an HMAC algorithm
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Result<Self, JwtError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(JwtError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            algorithm,
        })
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past
    /// * `InvalidSignature` - Token was not signed with this secret
    /// * `DecodingFailed` - Token is malformed, uses another algorithm, or
    ///   lacks `exp`/`sub`
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::DecodingFailed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::Utc;

    use super::*;
    use crate::jwt::Claims;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(SECRET, Algorithm::HS256).unwrap();
        let claims = Claims::issue("user123", Duration::minutes(30));

        let token = handler.encode(&claims).expect("Failed to encode token");
        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(SECRET, Algorithm::HS256).unwrap();
        let now = Utc::now().timestamp();
        let claims = Claims::new("user123", now - 120, now - 60);

        let token = handler.encode(&claims).unwrap();
        let result = handler.decode::<Claims>(&token);

        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!", Algorithm::HS256)
            .unwrap();
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!", Algorithm::HS256)
            .unwrap();

        let token = handler1
            .encode(&Claims::issue("user123", Duration::minutes(5)))
            .unwrap();

        assert_eq!(
            handler2.decode::<Claims>(&token),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_decode_with_other_algorithm() {
        let hs256 = JwtHandler::new(SECRET, Algorithm::HS256).unwrap();
        let hs512 = JwtHandler::new(SECRET, Algorithm::HS512).unwrap();

        let token = hs512
            .encode(&Claims::issue("user123", Duration::minutes(5)))
            .unwrap();

        assert!(hs256.decode::<Claims>(&token).is_err());
        assert!(hs512.decode::<Claims>(&token).is_ok());
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(SECRET, Algorithm::HS256).unwrap();
        let result = handler.decode::<Claims>("invalid.token.here");
        assert!(matches!(result, Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_rejects_asymmetric_algorithm() {
        let result = JwtHandler::new(SECRET, Algorithm::RS256);
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }
}
