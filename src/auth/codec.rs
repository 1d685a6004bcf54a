//! Token codec: signed, time-bound token encoding and decoding.

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use super::claims::{Claims, TokenType};
use super::config::AuthConfig;
use super::error::AuthError;

/// Encodes and decodes signed tokens with a process-wide secret.
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the signing configuration.
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let algorithm: Algorithm = config
            .jwt_algorithm
            .parse()
            .with_context(|| format!("unsupported JWT algorithm: {}", config.jwt_algorithm))?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.validate_aud = false;
        // Tokens without an exp claim are valid by configuration, so exp
        // must not be a required claim.
        validation.required_spec_claims.clear();

        Ok(Self {
            header: Header::new(algorithm),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Serialize and sign claims `{sub, type, jti, exp?}`.
    ///
    /// `ttl_minutes = None` omits the `exp` claim entirely, producing a
    /// token that never expires.
    pub fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        jti: &str,
        ttl_minutes: Option<i64>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            token_type,
            jti: jti.to_string(),
            exp: ttl_minutes.map(|minutes| Utc::now().timestamp() + minutes * 60),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("encoding token: {e}")))
    }

    /// Verify signature and (if present) expiry, returning the claims.
    ///
    /// Every failure mode collapses into `AuthError::InvalidToken`:
    /// callers branch on validity alone, and the reason goes to the log.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "token rejected");
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> TokenCodec {
        let config = AuthConfig {
            jwt_secret: "test-secret-for-unit-tests-minimum-32-chars-long".to_string(),
            ..AuthConfig::default()
        };
        TokenCodec::new(&config).unwrap()
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = test_codec();
        let token = codec
            .issue("alice", TokenType::Access, "jti-1", Some(10))
            .unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.jti, "jti-1");
        assert!(claims.exp.is_some());
    }

    #[test]
    fn test_no_ttl_means_no_expiry() {
        let codec = test_codec();
        let token = codec
            .issue("alice", TokenType::Access, "jti-1", None)
            .unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = test_codec();
        // Far enough in the past to clear the default clock leeway.
        let token = codec
            .issue("alice", TokenType::Access, "jti-1", Some(-10))
            .unwrap();

        assert!(matches!(
            codec.decode(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = test_codec();
        let token = codec
            .issue("alice", TokenType::Access, "jti-1", Some(10))
            .unwrap();

        // Flip one character in the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            codec.decode(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = test_codec();
        let other = TokenCodec::new(&AuthConfig {
            jwt_secret: "a-completely-different-secret-value-here".to_string(),
            ..AuthConfig::default()
        })
        .unwrap();

        let token = codec
            .issue("alice", TokenType::Access, "jti-1", Some(10))
            .unwrap();
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = test_codec();
        assert!(codec.decode("not-a-token").is_err());
        assert!(codec.decode("").is_err());
        assert!(codec.decode("a.b.c").is_err());
    }

    #[test]
    fn test_unsupported_algorithm() {
        let config = AuthConfig {
            jwt_algorithm: "HS999".to_string(),
            ..AuthConfig::default()
        };
        assert!(TokenCodec::new(&config).is_err());
    }
}
