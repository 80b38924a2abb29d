//! Built-in gates, in pipeline order.

use super::gate::{Gate, GateInput};
use super::verdict::DenyReason;
use crate::mandate::MandateStatus;

/// Recomputes the signature; any verification failure is a mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityGate;

impl Gate for IntegrityGate {
    fn name(&self) -> &str {
        "integrity"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        input
            .signer
            .verify(input.mandate)
            .map_err(|_| DenyReason::SignatureMismatch)
    }
}

/// Denies once `now` is past `expires_at`, whatever the stored status.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryGate;

impl Gate for ExpiryGate {
    fn name(&self) -> &str {
        "expiry"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        if input.mandate.is_expired_at(input.now) {
            return Err(DenyReason::Expired {
                expires_at: input.mandate.constraints().expires_at,
            });
        }
        Ok(())
    }
}

/// Binds the mandate to the agent it was issued to. A request without an
/// agent id denies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentGate;

impl Gate for AgentGate {
    fn name(&self) -> &str {
        "agent"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        match input.request.agent_id.as_deref() {
            Some(agent) if agent == input.mandate.agent_id() => Ok(()),
            agent => Err(DenyReason::AgentMismatch {
                agent_id: agent.map(str::to_string),
            }),
        }
    }
}

/// Fail-closed trust-score circuit breaker.
///
/// Threshold is the larger of the mandate's `min_spirit_score` and the
/// configured global floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustScoreGate;

impl TrustScoreGate {
    pub fn effective_floor(input: &GateInput<'_>) -> f64 {
        input
            .mandate
            .constraints()
            .min_spirit_score
            .max(input.global_trust_floor)
    }
}

impl Gate for TrustScoreGate {
    fn name(&self) -> &str {
        "trust_score"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        let floor = Self::effective_floor(input);
        match input.request.trust_score {
            Some(score) if score.is_finite() && score >= floor => Ok(()),
            score => Err(DenyReason::TrustScoreBelowThreshold { score, floor }),
        }
    }
}

/// Merchant category allowlist.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryGate;

impl Gate for CategoryGate {
    fn name(&self) -> &str {
        "category"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        match input.request.merchant_category.as_deref() {
            Some(code) if input.mandate.constraints().allows_category(code) => Ok(()),
            category => Err(DenyReason::CategoryNotAllowed {
                category: category.map(str::to_string),
            }),
        }
    }
}

/// Per-payment ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetGate;

impl Gate for BudgetGate {
    fn name(&self) -> &str {
        "budget"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        let max_amount = input.mandate.constraints().max_amount;
        if input.request.amount > max_amount {
            return Err(DenyReason::BudgetExceeded {
                requested: input.request.amount,
                max_amount,
            });
        }
        Ok(())
    }
}

/// Only active mandates authorize.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusGate;

impl Gate for StatusGate {
    fn name(&self) -> &str {
        "status"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        match input.mandate.status() {
            MandateStatus::Active => Ok(()),
            status => Err(DenyReason::InvalidStatus { status }),
        }
    }
}

/// Case-insensitive containment of the mandate's intent scope in the
/// request's intent. Either side missing or blank denies.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentGate;

impl IntentGate {
    pub fn matches(intent: &str, scope: &str) -> bool {
        let scope = scope.trim().to_lowercase();
        if scope.is_empty() {
            return false;
        }
        intent.trim().to_lowercase().contains(&scope)
    }
}

impl Gate for IntentGate {
    fn name(&self) -> &str {
        "intent"
    }

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason> {
        let scope = input.mandate.constraints().intent_scope.as_deref();
        match (input.request.intent.as_deref(), scope) {
            (Some(intent), Some(scope)) if Self::matches(intent, scope) => Ok(()),
            _ => Err(DenyReason::IntentMismatch),
        }
    }
}
