//! Capability Tokens
//!
//! Short-lived signed tokens binding a user and a call session.
//! Wire format: `user_id:session_id:issued_at:signature` where the
//! signature is an HMAC-SHA256 over the first three fields.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::errors::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Validity window for in-call tool tokens
pub const TOKEN_TTL_SECS: i64 = 300;

/// Issues and validates capability tokens with a shared secret
#[derive(Clone)]
pub struct TokenAuthority {
    secret: String,
}

impl TokenAuthority {
    /// The secret must be configured at deployment; the server entrypoint
    /// treats a missing secret as fatal.
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a token for a (user, session) pair
    pub fn issue(&self, user_id: &str, session_id: &str) -> String {
        self.issue_at(user_id, session_id, Utc::now())
    }

    fn issue_at(&self, user_id: &str, session_id: &str, now: DateTime<Utc>) -> String {
        let issued_at = now.timestamp();
        let payload = format!("{}:{}:{}", user_id, session_id, issued_at);
        format!("{}:{}", payload, self.sign(&payload))
    }

    /// Validate a token and return the bound (user_id, session_id)
    pub fn validate(&self, token: &str) -> Result<(String, String), AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validation with an explicit clock, for deterministic expiry checks
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, String), AuthError> {
        let fields: Vec<&str> = token.split(':').collect();
        if fields.len() != 4 {
            return Err(AuthError::Malformed);
        }

        let (user_id, session_id, issued_at_raw, signature) =
            (fields[0], fields[1], fields[2], fields[3]);

        let issued_at: i64 = issued_at_raw.parse().map_err(|_| AuthError::Malformed)?;

        if now.timestamp() - issued_at > TOKEN_TTL_SECS {
            return Err(AuthError::Expired);
        }

        let payload = format!("{}:{}:{}", user_id, session_id, issued_at);
        self.verify(&payload, signature)?;

        Ok((user_id.to_string(), session_id.to_string()))
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn verify(&self, payload: &str, signature: &str) -> Result<(), AuthError> {
        let expected = hex::decode(signature).map_err(|_| AuthError::BadSignature)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        // verify_slice is constant-time
        mac.verify_slice(&expected).map_err(|_| AuthError::BadSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn authority() -> TokenAuthority {
        TokenAuthority::new("test-secret".to_string())
    }

    #[test]
    fn test_issue_validate_round_trip() {
        let auth = authority();
        let token = auth.issue("user-1", "sess_123");
        let (user_id, session_id) = auth.validate(&token).unwrap();
        assert_eq!(user_id, "user-1");
        assert_eq!(session_id, "sess_123");
    }

    #[test]
    fn test_expired_token_rejected_despite_valid_signature() {
        let auth = authority();
        let token = auth.issue("user-1", "sess_123");
        let later = Utc::now() + Duration::seconds(TOKEN_TTL_SECS + 1);
        assert_eq!(auth.validate_at(&token, later), Err(AuthError::Expired));
    }

    #[test]
    fn test_token_valid_just_inside_window() {
        let auth = authority();
        let token = auth.issue("user-1", "sess_123");
        let later = Utc::now() + Duration::seconds(TOKEN_TTL_SECS - 1);
        assert!(auth.validate_at(&token, later).is_ok());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let auth = authority();
        let token = auth.issue("user-1", "sess_123");
        // Flip the last hex character of the signature
        let mut chars: Vec<char> = token.chars().collect();
        let last = *chars.last().unwrap();
        *chars.last_mut().unwrap() = if last == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();
        assert_eq!(auth.validate(&tampered), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let auth = authority();
        assert_eq!(auth.validate("a:b:c"), Err(AuthError::Malformed));
        assert_eq!(auth.validate("a:b:c:d:e"), Err(AuthError::Malformed));
    }

    #[test]
    fn test_non_integer_timestamp_is_malformed() {
        let auth = authority();
        assert_eq!(
            auth.validate("user:sess:not-a-number:deadbeef"),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn test_different_secret_rejects() {
        let token = authority().issue("user-1", "sess_123");
        let other = TokenAuthority::new("other-secret".to_string());
        assert_eq!(other.validate(&token), Err(AuthError::BadSignature));
    }
}
