//! Payment request context supplied by the agent.

use serde::{Deserialize, Serialize};

/// One payment the agent wants to make under a mandate.
///
/// Context fields are optional; a gate that needs a missing field denies.
/// Integrators map a failed trust-score or intent lookup to `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in the smallest unit of the mandate's currency
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Agent making the payment, checked against the mandate's `agent_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: u64) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    pub fn with_merchant_category(mut self, code: impl Into<String>) -> Self {
        self.merchant_category = Some(code.into());
        self
    }

    pub fn with_trust_score(mut self, score: f64) -> Self {
        self.trust_score = Some(score);
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}
