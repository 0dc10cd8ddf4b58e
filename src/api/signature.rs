//! HMAC checks for requests that do not come from the slash command.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

type HmacSha256 = Hmac<Sha256>;

/// Oldest accepted request timestamp, in seconds.
const MAX_AGE_SECS: u64 = 300;
/// Tolerated clock skew into the future, in seconds.
const MAX_SKEW_SECS: u64 = 60;

fn mac_for(secret: &str) -> Option<HmacSha256> {
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => Some(mac),
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            None
        }
    }
}

fn timestamp_is_fresh(timestamp: &str) -> bool {
    let (Ok(ts), Ok(now)) = (
        timestamp.parse::<u64>(),
        SystemTime::now().duration_since(UNIX_EPOCH),
    ) else {
        return false;
    };
    let now_secs = now.as_secs();
    if ts > now_secs + MAX_SKEW_SECS || now_secs.saturating_sub(ts) > MAX_AGE_SECS {
        error!("Timestamp out of range, potential replay attack");
        return false;
    }
    true
}

/// `v0=<hex hmac-sha256("v0:{timestamp}:{body}")>`
#[must_use]
pub fn compute_signature(timestamp: &str, body: &[u8], secret: &str) -> String {
    let Some(mut mac) = mac_for(secret) else {
        return String::new();
    };
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verifies the `X-Mbotc-Signature` header of an editor or button request.
#[must_use]
pub fn verify_request_signature(
    body: &[u8],
    timestamp: &str,
    signature: &str,
    secret: &str,
) -> bool {
    if !timestamp_is_fresh(timestamp) {
        return false;
    }
    let Some(received) = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        error!("Malformed request signature");
        return false;
    };
    let Some(mut mac) = mac_for(secret) else {
        return false;
    };
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    mac.verify_slice(&received).is_ok()
}

/// State value for the creation dialog opened by `user_id` in `channel_id`.
#[must_use]
pub fn sign_dialog_state(secret: &str, user_id: &str, channel_id: &str) -> String {
    let Some(mut mac) = mac_for(secret) else {
        return String::new();
    };
    mac.update(format!("{user_id}:{channel_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a dialog submission's state against its user and channel.
#[must_use]
pub fn verify_dialog_state(secret: &str, user_id: &str, channel_id: &str, state: &str) -> bool {
    let Ok(received) = hex::decode(state) else {
        return false;
    };
    let Some(mut mac) = mac_for(secret) else {
        return false;
    };
    mac.update(format!("{user_id}:{channel_id}").as_bytes());
    mac.verify_slice(&received).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string()
    }

    #[test]
    fn signature_round_trip() {
        let ts = now();
        let sig = compute_signature(&ts, b"{\"post_id\":\"p1\"}", "secret");
        assert!(verify_request_signature(b"{\"post_id\":\"p1\"}", &ts, &sig, "secret"));
        assert!(!verify_request_signature(b"{\"post_id\":\"p2\"}", &ts, &sig, "secret"));
        assert!(!verify_request_signature(b"{\"post_id\":\"p1\"}", &ts, &sig, "other"));
    }

    #[test]
    fn stale_or_garbled_requests_are_rejected() {
        let old = "1000";
        let sig = compute_signature(old, b"x", "secret");
        assert!(!verify_request_signature(b"x", old, &sig, "secret"));

        let ts = now();
        assert!(!verify_request_signature(b"x", &ts, "v0=zz", "secret"));
        assert!(!verify_request_signature(b"x", &ts, "deadbeef", "secret"));
        assert!(!verify_request_signature(b"x", "not-a-number", "v0=00", "secret"));
    }

    #[test]
    fn dialog_state_binds_user_and_channel() {
        let state = sign_dialog_state("secret", "u1", "c1");
        assert!(verify_dialog_state("secret", "u1", "c1", &state));
        assert!(!verify_dialog_state("secret", "u2", "c1", &state));
        assert!(!verify_dialog_state("secret", "u1", "c2", &state));
        assert!(!verify_dialog_state("secret", "u1", "c1", ""));
    }
}
