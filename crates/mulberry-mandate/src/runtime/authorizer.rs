//! Payment authorization.
//!
//! Flow for every request:
//! 1. Run the pipeline's gates in order, stopping at the first denial
//! 2. On an `expired` denial, move an active mandate to `expired`
//! 3. On approval, compute the donation split if the pipeline carries one
//! 4. On approval under [`UsagePolicy::SingleUse`], move the mandate to `exhausted`
//!
//! Denials are [`Verdict`] values, never errors.

use super::pipeline::Pipeline;
use super::request::PaymentRequest;
use super::verdict::Verdict;
use crate::config::{AuthzConfig, UsagePolicy};
use crate::mandate::{self, Constraints, IssueError, Mandate, MandateSigner};
use chrono::{DateTime, Utc};

#[path = "authorizer_internal/mod.rs"]
mod authorizer_internal;

pub use authorizer_internal::split::compute_split;

/// Issues and authorizes mandates with one signing secret.
#[derive(Debug, Clone)]
pub struct Authorizer {
    signer: MandateSigner,
    config: AuthzConfig,
}

impl Authorizer {
    pub fn new(signer: MandateSigner, config: AuthzConfig) -> Self {
        Self { signer, config }
    }

    pub fn config(&self) -> &AuthzConfig {
        &self.config
    }

    pub fn signer(&self) -> &MandateSigner {
        &self.signer
    }

    /// Issue a mandate signed with this authorizer's secret.
    pub fn issue(
        &self,
        principal_id: &str,
        agent_id: &str,
        constraints: Constraints,
    ) -> Result<Mandate, IssueError> {
        mandate::issue_mandate(&self.signer, principal_id, agent_id, constraints)
    }

    /// Like [`issue`](Self::issue) with an explicit `now`.
    pub fn issue_at(
        &self,
        now: DateTime<Utc>,
        principal_id: &str,
        agent_id: &str,
        constraints: Constraints,
    ) -> Result<Mandate, IssueError> {
        mandate::issue_mandate_at(&self.signer, now, principal_id, agent_id, constraints)
    }

    /// Integrity check alone.
    pub fn verify_integrity(&self, mandate: &Mandate) -> bool {
        self.signer.verify(mandate).is_ok()
    }

    /// Base pipeline: integrity, expiry, budget, status.
    pub fn authorize(&self, mandate: &mut Mandate, amount: u64) -> Verdict {
        self.evaluate(&Pipeline::base(), mandate, &PaymentRequest::new(amount))
    }

    /// Zero-trust pipeline. A missing score or category denies.
    pub fn authorize_zero_trust(
        &self,
        mandate: &mut Mandate,
        amount: u64,
        merchant_category: Option<&str>,
        trust_score: Option<f64>,
    ) -> Verdict {
        let request = PaymentRequest {
            amount,
            merchant_category: merchant_category.map(str::to_string),
            trust_score,
            ..PaymentRequest::default()
        };
        self.evaluate(&Pipeline::zero_trust(), mandate, &request)
    }

    /// Social-intent pipeline with donation split. A missing score or intent denies.
    pub fn authorize_social(
        &self,
        mandate: &mut Mandate,
        amount: u64,
        intent: Option<&str>,
        trust_score: Option<f64>,
    ) -> Verdict {
        let request = PaymentRequest {
            amount,
            trust_score,
            intent: intent.map(str::to_string),
            ..PaymentRequest::default()
        };
        self.evaluate(&Pipeline::social(), mandate, &request)
    }

    /// Run an arbitrary pipeline against the system clock.
    pub fn evaluate(
        &self,
        pipeline: &Pipeline,
        mandate: &mut Mandate,
        request: &PaymentRequest,
    ) -> Verdict {
        self.evaluate_at(Utc::now(), pipeline, mandate, request)
    }

    /// Like [`evaluate`](Self::evaluate) with an explicit `now`.
    /// Use this in tests to avoid clock-dependent assertions.
    pub fn evaluate_at(
        &self,
        now: DateTime<Utc>,
        pipeline: &Pipeline,
        mandate: &mut Mandate,
        request: &PaymentRequest,
    ) -> Verdict {
        authorizer_internal::run::evaluate_at_impl(self, now, pipeline, mandate, request)
    }

    fn single_use(&self) -> bool {
        self.config.usage == UsagePolicy::SingleUse
    }
}
