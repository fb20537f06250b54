use super::error::VerificationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Verdict on one transaction, as emitted by the verifier binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub tx_id: Uuid,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub verified_at: DateTime<Utc>,
}

impl VerificationReport {
    pub fn new(tx_id: Uuid, result: &Result<(), VerificationError>) -> Self {
        let (code, reason) = match result {
            Ok(()) => (None, None),
            Err(err) => (Some(err.code().to_string()), Some(err.to_string())),
        };
        Self {
            tx_id,
            accepted: result.is_ok(),
            code,
            reason,
            verified_at: Utc::now(),
        }
    }
}
