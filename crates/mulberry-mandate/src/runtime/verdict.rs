//! Authorization outcomes.

use crate::mandate::{Mandate, MandateStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a payment was denied.
///
/// Serialized with a `code` tag, e.g. `{"code":"budget_exceeded",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DenyReason {
    #[error("mandate signature does not match its content")]
    SignatureMismatch,

    #[error("mandate expired at {expires_at}")]
    Expired { expires_at: DateTime<Utc> },

    #[error("requested {requested} exceeds limit {max_amount}")]
    BudgetExceeded { requested: u64, max_amount: u64 },

    #[error("mandate is {status}")]
    InvalidStatus { status: MandateStatus },

    #[error("agent {} is not bound to this mandate", .agent_id.as_deref().unwrap_or("<missing>"))]
    AgentMismatch { agent_id: Option<String> },

    #[error("trust score {} is below threshold {floor}", display_score(.score))]
    TrustScoreBelowThreshold { score: Option<f64>, floor: f64 },

    #[error("merchant category {} is not allowed", .category.as_deref().unwrap_or("<missing>"))]
    CategoryNotAllowed { category: Option<String> },

    #[error("purchase intent does not match mandate scope")]
    IntentMismatch,

    /// Denial from a caller-supplied gate.
    #[error("rejected by {gate}: {detail}")]
    GateRejected { gate: String, detail: String },
}

fn display_score(score: &Option<f64>) -> String {
    match score {
        Some(s) => s.to_string(),
        None => "<missing>".to_string(),
    }
}

impl DenyReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SignatureMismatch => "signature_mismatch",
            Self::Expired { .. } => "expired",
            Self::BudgetExceeded { .. } => "budget_exceeded",
            Self::InvalidStatus { .. } => "invalid_status",
            Self::AgentMismatch { .. } => "agent_mismatch",
            Self::TrustScoreBelowThreshold { .. } => "trust_score_below_threshold",
            Self::CategoryNotAllowed { .. } => "category_not_allowed",
            Self::IntentMismatch => "intent_mismatch",
            Self::GateRejected { .. } => "gate_rejected",
        }
    }

    /// Whether the same mandate might approve a different or later request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::BudgetExceeded { .. } | Self::TrustScoreBelowThreshold { .. }
        )
    }
}

/// Division of an approved amount between the merchant and the community fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSplit {
    pub vendor_amount: u64,
    pub community_fund: u64,
}

impl FundSplit {
    pub fn total(&self) -> u64 {
        self.vendor_amount + self.community_fund
    }
}

/// Result of running a pipeline against one payment request.
///
/// Only a pipeline run produces a verdict; there is no public constructor.
///
/// ```compile_fail
/// use mulberry_mandate::{Mandate, Verdict};
///
/// fn forge(mandate: &Mandate) -> Verdict {
///     Verdict::approve(mandate, None)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<FundSplit>,
    pub mandate_id: Uuid,
    /// Mandate status after evaluation
    pub status: MandateStatus,
}

impl Verdict {
    pub(crate) fn approve(mandate: &Mandate, split: Option<FundSplit>) -> Self {
        Self {
            approved: true,
            reason: None,
            split,
            mandate_id: mandate.id(),
            status: mandate.status(),
        }
    }

    pub(crate) fn deny(mandate: &Mandate, reason: DenyReason) -> Self {
        Self {
            approved: false,
            reason: Some(reason),
            split: None,
            mandate_id: mandate.id(),
            status: mandate.status(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_reason_codes_match_serialization() {
        let reasons = vec![
            DenyReason::SignatureMismatch,
            DenyReason::Expired {
                expires_at: Utc::now(),
            },
            DenyReason::BudgetExceeded {
                requested: 2,
                max_amount: 1,
            },
            DenyReason::InvalidStatus {
                status: MandateStatus::Revoked,
            },
            DenyReason::AgentMismatch {
                agent_id: Some("other-agent".into()),
            },
            DenyReason::TrustScoreBelowThreshold {
                score: Some(10.0),
                floor: 50.0,
            },
            DenyReason::CategoryNotAllowed { category: None },
            DenyReason::IntentMismatch,
            DenyReason::GateRejected {
                gate: "velocity".into(),
                detail: "too many".into(),
            },
        ];

        for reason in reasons {
            let value = serde_json::to_value(&reason).unwrap();
            assert_eq!(value["code"], reason.code());
        }
    }

    #[test]
    fn test_retryable_reasons() {
        assert!(DenyReason::BudgetExceeded {
            requested: 2,
            max_amount: 1
        }
        .is_retryable());
        assert!(DenyReason::TrustScoreBelowThreshold {
            score: None,
            floor: 50.0
        }
        .is_retryable());
        assert!(!DenyReason::SignatureMismatch.is_retryable());
        assert!(!DenyReason::IntentMismatch.is_retryable());
        assert!(!DenyReason::AgentMismatch { agent_id: None }.is_retryable());
        assert!(!DenyReason::CategoryNotAllowed {
            category: Some("5411".into())
        }
        .is_retryable());
    }

    #[test]
    fn test_deny_reason_messages() {
        let reason = DenyReason::TrustScoreBelowThreshold {
            score: None,
            floor: 50.0,
        };
        assert_eq!(
            reason.to_string(),
            "trust score <missing> is below threshold 50"
        );

        let reason = DenyReason::BudgetExceeded {
            requested: 70_000,
            max_amount: 50_000,
        };
        assert_eq!(reason.to_string(), "requested 70000 exceeds limit 50000");
    }

    #[test]
    fn test_verdict_json_shape() {
        let verdict = Verdict {
            approved: true,
            reason: None,
            split: Some(FundSplit {
                vendor_amount: 27_000,
                community_fund: 3_000,
            }),
            mandate_id: Uuid::nil(),
            status: MandateStatus::Active,
        };
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["approved"], true);
        assert!(value.get("reason").is_none());
        assert_eq!(value["split"]["community_fund"], 3_000);
        assert_eq!(value["status"], "active");

        let back: Verdict = serde_json::from_value(value).unwrap();
        assert_eq!(back, verdict);
    }
}
