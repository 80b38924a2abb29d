//! Mandate data model.
//!
//! A [`Mandate`] binds a principal, an agent and a [`Constraints`] envelope
//! under a keyed signature. Apart from `status`, nothing in a mandate changes
//! after issuance; any change to the identifier, the principal or a
//! constraint field breaks the signature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Payload type used for domain separation in the signing input.
pub const MANDATE_PAYLOAD_TYPE: &str = "application/vnd.mulberry.mandate+json;v=1";

/// Policy envelope approved by the principal.
///
/// Field order and representation are part of the signing input, so the
/// category set is a `BTreeSet` (sorted, deduplicated) and optional fields are
/// omitted rather than serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraints {
    /// Per-payment ceiling in the smallest unit of `currency`
    pub max_amount: u64,

    /// ISO 4217 alphabetic code (e.g. "KRW")
    pub currency: String,

    /// Merchant category codes the agent may pay
    pub allowed_categories: BTreeSet<String>,

    /// Minimum live trust score for autonomous authorization
    #[serde(default)]
    pub min_spirit_score: f64,

    /// Purchase intent the mandate covers (e.g. "groceries")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_scope: Option<String>,

    /// Fraction of each payment routed to the community fund
    #[serde(default)]
    pub auto_donation_rate: f64,

    /// Mandate expires after this instant
    pub expires_at: DateTime<Utc>,
}

impl Constraints {
    /// Create constraints with the required fields.
    pub fn new<I, S>(
        max_amount: u64,
        currency: impl Into<String>,
        allowed_categories: I,
        expires_at: DateTime<Utc>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            max_amount,
            currency: currency.into(),
            allowed_categories: allowed_categories.into_iter().map(Into::into).collect(),
            min_spirit_score: 0.0,
            intent_scope: None,
            auto_donation_rate: 0.0,
            expires_at,
        }
    }

    /// Set the minimum trust score.
    pub fn with_min_spirit_score(mut self, score: f64) -> Self {
        self.min_spirit_score = score;
        self
    }

    /// Set the permitted intent scope.
    pub fn with_intent_scope(mut self, scope: impl Into<String>) -> Self {
        self.intent_scope = Some(scope.into());
        self
    }

    /// Set the automatic donation rate.
    pub fn with_auto_donation_rate(mut self, rate: f64) -> Self {
        self.auto_donation_rate = rate;
        self
    }

    /// Check whether a merchant category code is on the allowlist.
    pub fn allows_category(&self, code: &str) -> bool {
        self.allowed_categories.contains(code)
    }

    /// Structural checks shared by issuance and deserialization.
    ///
    /// These never look at the clock or at numeric ranges; a stored mandate
    /// may legitimately be expired, and range violations on a stored mandate
    /// are caught by the signature.
    pub(crate) fn structural_violation(&self) -> Option<ConstraintViolation> {
        if !is_currency_code(&self.currency) {
            return Some(ConstraintViolation::new(
                "currency",
                format!("'{}' is not a three-letter ISO 4217 code", self.currency),
            ));
        }
        if self.allowed_categories.is_empty() {
            return Some(ConstraintViolation::new(
                "allowed_categories",
                "at least one merchant category is required",
            ));
        }
        if self.allowed_categories.iter().any(|c| c.trim().is_empty()) {
            return Some(ConstraintViolation::new(
                "allowed_categories",
                "category codes must not be blank",
            ));
        }
        if !self.min_spirit_score.is_finite() {
            return Some(ConstraintViolation::new(
                "min_spirit_score",
                "must be a finite number",
            ));
        }
        if !self.auto_donation_rate.is_finite() {
            return Some(ConstraintViolation::new(
                "auto_donation_rate",
                "must be a finite number",
            ));
        }
        if let Some(scope) = &self.intent_scope {
            if scope.trim().is_empty() {
                return Some(ConstraintViolation::new(
                    "intent_scope",
                    "must not be blank when present",
                ));
            }
        }
        None
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// A single failed constraint check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConstraintViolation {
    pub field: &'static str,
    pub reason: String,
}

impl ConstraintViolation {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Mandate lifecycle status.
///
/// `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateStatus {
    Active,
    Exhausted,
    Revoked,
    Expired,
}

impl MandateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Exhausted => "exhausted",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for MandateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed delegation of bounded spending capability.
///
/// Fields are private: a `Mandate` comes either from issuance or from the
/// validating deserialization path (see `codec`), never from a caller-built
/// struct literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "super::codec::MandateRecord")]
pub struct Mandate {
    #[serde(rename = "mandate_id")]
    pub(crate) id: Uuid,
    pub(crate) principal_id: String,
    pub(crate) agent_id: String,
    pub(crate) constraints: Constraints,
    pub(crate) status: MandateStatus,
    /// Metadata only; not covered by the signature
    pub(crate) issued_at: DateTime<Utc>,
    pub(crate) signature: String,
}

impl Mandate {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn principal_id(&self) -> &str {
        &self.principal_id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn status(&self) -> MandateStatus {
        self.status
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Stored signature, `hmac-sha256:<hex>`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn is_active(&self) -> bool {
        self.status == MandateStatus::Active
    }

    /// Whether `now` is past the mandate's expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.constraints.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 28, 11, 0, 0).unwrap()
    }

    #[test]
    fn test_constraints_builder() {
        let c = Constraints::new(50_000, "KRW", ["API_FEE"], expiry())
            .with_min_spirit_score(70.0)
            .with_intent_scope("groceries")
            .with_auto_donation_rate(0.1);

        assert_eq!(c.max_amount, 50_000);
        assert!(c.allows_category("API_FEE"));
        assert!(!c.allows_category("5411"));
        assert_eq!(c.intent_scope.as_deref(), Some("groceries"));
        assert!(c.structural_violation().is_none());
    }

    #[test]
    fn test_categories_sorted_and_deduplicated() {
        let c = Constraints::new(1, "KRW", ["b", "a", "b"], expiry());
        let codes: Vec<_> = c.allowed_categories.iter().cloned().collect();
        assert_eq!(codes, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_structural_violations() {
        let base = Constraints::new(1, "KRW", ["API_FEE"], expiry());

        let mut c = base.clone();
        c.currency = "krw".into();
        assert_eq!(c.structural_violation().unwrap().field, "currency");

        let mut c = base.clone();
        c.allowed_categories.clear();
        assert_eq!(c.structural_violation().unwrap().field, "allowed_categories");

        let mut c = base.clone();
        c.allowed_categories.insert("  ".into());
        assert_eq!(c.structural_violation().unwrap().field, "allowed_categories");

        let c = base.clone().with_min_spirit_score(f64::NAN);
        assert_eq!(c.structural_violation().unwrap().field, "min_spirit_score");

        let c = base.clone().with_intent_scope(" ");
        assert_eq!(c.structural_violation().unwrap().field, "intent_scope");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&MandateStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&MandateStatus::Exhausted).unwrap(),
            "\"exhausted\""
        );
        assert!(!MandateStatus::Active.is_terminal());
        assert!(MandateStatus::Revoked.is_terminal());
        assert!(MandateStatus::Expired.is_terminal());
    }

    #[test]
    fn test_intent_scope_omitted_when_absent() {
        let c = Constraints::new(1, "KRW", ["API_FEE"], expiry());
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("intent_scope"));
    }

    #[test]
    fn test_constraints_reject_unknown_fields() {
        let json = r#"{
            "max_amount": 1,
            "currency": "KRW",
            "allowed_categories": ["API_FEE"],
            "expires_at": "2026-01-28T11:00:00Z",
            "max_amount_override": 999
        }"#;
        assert!(serde_json::from_str::<Constraints>(json).is_err());
    }
}
