//! Webhook Signature Verification
//!
//! Authenticates asynchronous event deliveries from the calling platform.
//! Header format: `t=<unix_ts>,v=<hex_mac>`; the MAC is computed over
//! `"{timestamp}.{raw_body}"`. This is the sole trust boundary for
//! post-call transcripts and failure notifications.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a webhook delivery before it is treated as a replay
pub const WEBHOOK_REPLAY_WINDOW_SECS: i64 = 300;

/// Verifies signed webhook deliveries with a shared secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
}

impl WebhookVerifier {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Verify a delivery against its signature header
    pub fn verify(&self, raw_body: &[u8], signature_header: &str) -> Result<(), WebhookError> {
        self.verify_at(raw_body, signature_header, Utc::now())
    }

    /// Verification with an explicit clock, for deterministic replay checks
    pub fn verify_at(
        &self,
        raw_body: &[u8],
        signature_header: &str,
        now: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        let (timestamp, mac_hex) = parse_header(signature_header)?;

        if now.timestamp() - timestamp > WEBHOOK_REPLAY_WINDOW_SECS {
            return Err(WebhookError::Stale);
        }

        let expected = hex::decode(mac_hex).map_err(|_| WebhookError::BadSignature)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(raw_body);
        // verify_slice is constant-time
        mac.verify_slice(&expected)
            .map_err(|_| WebhookError::BadSignature)
    }

    /// Produce a signature header for a body, used by tests and local tooling
    pub fn sign_at(&self, raw_body: &[u8], now: DateTime<Utc>) -> String {
        let timestamp = now.timestamp();
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(raw_body);
        format!("t={},v={}", timestamp, hex::encode(mac.finalize().into_bytes()))
    }
}

fn parse_header(header: &str) -> Result<(i64, &str), WebhookError> {
    let mut timestamp = None;
    let mut mac_hex = None;

    for part in header.split(',') {
        match part.split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse().map_err(|_| WebhookError::MalformedHeader)?);
            }
            Some(("v", value)) => mac_hex = Some(value),
            _ => return Err(WebhookError::MalformedHeader),
        }
    }

    match (timestamp, mac_hex) {
        (Some(t), Some(v)) => Ok((t, v)),
        _ => Err(WebhookError::MalformedHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new("webhook-secret".to_string())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let v = verifier();
        let body = br#"{"event_type":"post_call_transcription"}"#;
        let now = Utc::now();
        let header = v.sign_at(body, now);
        assert!(v.verify_at(body, &header, now).is_ok());
    }

    #[test]
    fn test_stale_timestamp_rejected_despite_valid_signature() {
        let v = verifier();
        let body = b"payload";
        let signed_at = Utc::now();
        let header = v.sign_at(body, signed_at);
        let later = signed_at + Duration::seconds(WEBHOOK_REPLAY_WINDOW_SECS + 1);
        assert_eq!(v.verify_at(body, &header, later), Err(WebhookError::Stale));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let v = verifier();
        let now = Utc::now();
        let header = v.sign_at(b"original", now);
        assert_eq!(
            v.verify_at(b"tampered", &header, now),
            Err(WebhookError::BadSignature)
        );
    }

    #[test]
    fn test_malformed_header_rejected() {
        let v = verifier();
        assert_eq!(
            v.verify(b"body", "no-equals-signs"),
            Err(WebhookError::MalformedHeader)
        );
        assert_eq!(
            v.verify(b"body", "t=123"),
            Err(WebhookError::MalformedHeader)
        );
        assert_eq!(
            v.verify(b"body", "t=abc,v=deadbeef"),
            Err(WebhookError::MalformedHeader)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let now = Utc::now();
        let header = verifier().sign_at(body, now);
        let other = WebhookVerifier::new("other-secret".to_string());
        assert_eq!(
            other.verify_at(body, &header, now),
            Err(WebhookError::BadSignature)
        );
    }
}
