use chrono::NaiveDateTime;
use rand::Rng;
use sha2::{Digest, Sha256};

use super::model::OtpPurpose;

pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Hex SHA-256 over `email:purpose:code`, so a stored hash cannot be replayed
/// for another account or purpose.
pub fn hash_code(email: &str, purpose: OtpPurpose, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(purpose.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(code.trim().as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    Valid,
    Expired,
    AttemptsExhausted,
    Mismatch { remaining_attempts: i32 },
}

impl OtpCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpCheck::Valid => "valid",
            OtpCheck::Expired => "expired",
            OtpCheck::AttemptsExhausted => "exhausted",
            OtpCheck::Mismatch { .. } => "mismatch",
        }
    }
}

pub fn is_expired(expires_at: NaiveDateTime, now: NaiveDateTime) -> bool {
    now >= expires_at
}

/// Decides the outcome of a verification attempt on a live code.
///
/// `claimed_attempt` is the 1-based attempt number counted for this request,
/// or `None` when no attempts were left to claim. A wrong guess on the last
/// attempt exhausts the code; a correct one on the last attempt still passes.
pub fn evaluate(
    stored_hash: &str,
    submitted_hash: &str,
    claimed_attempt: Option<i32>,
    max_attempts: i32,
) -> OtpCheck {
    let Some(attempt) = claimed_attempt else {
        return OtpCheck::AttemptsExhausted;
    };
    if constant_time_eq(stored_hash.as_bytes(), submitted_hash.as_bytes()) {
        return OtpCheck::Valid;
    }
    match max_attempts - attempt {
        remaining if remaining > 0 => OtpCheck::Mismatch {
            remaining_attempts: remaining,
        },
        _ => OtpCheck::AttemptsExhausted,
    }
}

/// Seconds left before another code may be sent, if still cooling down.
pub fn cooldown_remaining(
    last_sent: NaiveDateTime,
    now: NaiveDateTime,
    cooldown_secs: i64,
) -> Option<i64> {
    let elapsed = (now - last_sent).num_seconds();
    let remaining = cooldown_secs - elapsed;
    (remaining > 0).then_some(remaining)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
