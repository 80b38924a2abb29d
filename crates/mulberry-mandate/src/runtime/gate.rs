//! Gate abstraction for the authorization pipeline.

use super::request::PaymentRequest;
use super::verdict::DenyReason;
use crate::mandate::{Mandate, MandateSigner};
use chrono::{DateTime, Utc};

/// Everything a gate may look at.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub mandate: &'a Mandate,
    pub request: &'a PaymentRequest,
    pub now: DateTime<Utc>,
    pub signer: &'a MandateSigner,
    /// Configured lower bound on the trust threshold
    pub global_trust_floor: f64,
}

/// A single authorization check.
///
/// Gates are pure: they never mutate the mandate. Status changes that follow
/// from a denial (expiry) or an approval (single use) are applied by the
/// pipeline runner.
pub trait Gate: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn check(&self, input: &GateInput<'_>) -> Result<(), DenyReason>;
}
