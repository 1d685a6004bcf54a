//! JWT claims carried by access and refresh tokens.

use serde::{Deserialize, Serialize};

/// Token type claim.
///
/// A token of one type must never be accepted where the other is required:
/// the access guard only honors `Access`, the refresh operation only
/// honors `Refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims embedded in every issued token.
///
/// The signed encoding is the sole source of truth for these values; only
/// the liveness of `jti` is checked against the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,

    /// Token type.
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Session epoch identifier, copied from the user record at issuance.
    pub jti: String,

    /// Expiration time as a Unix timestamp.
    ///
    /// `None` means the token never expires. This is a deliberate
    /// configuration option, not a default: see `AuthConfig`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenType::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenType::Refresh).unwrap(),
            "\"refresh\""
        );
    }

    #[test]
    fn test_claims_omit_exp_when_absent() {
        let claims = Claims {
            sub: "alice".to_string(),
            token_type: TokenType::Access,
            jti: "abc".to_string(),
            exp: None,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("exp").is_none());
        assert_eq!(json["type"], "access");
    }

    #[test]
    fn test_claims_round_trip() {
        let json = r#"{"sub":"bob","type":"refresh","jti":"xyz","exp":123}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "bob");
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert_eq!(claims.exp, Some(123));
    }
}
