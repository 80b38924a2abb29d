//! Mandate issuance.
//!
//! Turns an approved [`Constraints`] value into a signed, `active` mandate.
//! Issuance is the only place where range checks run (amount, donation rate,
//! expiry); the verifier relies on the signature to keep them true.

use crate::mandate::signing::{MandateSigner, SigningError};
use crate::mandate::types::{ConstraintViolation, Constraints, Mandate, MandateStatus};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Issuance errors.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("invalid constraints: {field}: {reason}")]
    InvalidConstraints { field: &'static str, reason: String },

    #[error("{field} must not be empty")]
    MissingIdentity { field: &'static str },

    #[error(transparent)]
    Signing(#[from] SigningError),
}

fn invalid(v: ConstraintViolation) -> IssueError {
    IssueError::InvalidConstraints {
        field: v.field,
        reason: v.reason,
    }
}

/// Validate constraints for issuance at `now`.
pub fn validate_constraints(constraints: &Constraints, now: DateTime<Utc>) -> Result<(), IssueError> {
    if constraints.max_amount == 0 {
        return Err(invalid(ConstraintViolation::new(
            "max_amount",
            "must be greater than zero",
        )));
    }
    if !(0.0..=1.0).contains(&constraints.auto_donation_rate) {
        return Err(invalid(ConstraintViolation::new(
            "auto_donation_rate",
            format!("{} is outside [0, 1]", constraints.auto_donation_rate),
        )));
    }
    if constraints.expires_at <= now {
        return Err(invalid(ConstraintViolation::new(
            "expires_at",
            format!(
                "{} is not in the future (now {})",
                constraints.expires_at.to_rfc3339(),
                now.to_rfc3339()
            ),
        )));
    }
    if let Some(violation) = constraints.structural_violation() {
        return Err(invalid(violation));
    }
    Ok(())
}

/// Issue a new mandate using the system clock.
pub fn issue_mandate(
    signer: &MandateSigner,
    principal_id: &str,
    agent_id: &str,
    constraints: Constraints,
) -> Result<Mandate, IssueError> {
    issue_mandate_at(signer, Utc::now(), principal_id, agent_id, constraints)
}

/// Like [`issue_mandate`] with an explicit `now`.
pub fn issue_mandate_at(
    signer: &MandateSigner,
    now: DateTime<Utc>,
    principal_id: &str,
    agent_id: &str,
    constraints: Constraints,
) -> Result<Mandate, IssueError> {
    if principal_id.trim().is_empty() {
        return Err(IssueError::MissingIdentity {
            field: "principal_id",
        });
    }
    if agent_id.trim().is_empty() {
        return Err(IssueError::MissingIdentity { field: "agent_id" });
    }
    validate_constraints(&constraints, now)?;

    let id = Uuid::new_v4();
    let signature = signer.sign_fields(&id, principal_id, &constraints)?;

    tracing::info!(
        mandate_id = %id,
        agent_id,
        max_amount = constraints.max_amount,
        currency = %constraints.currency,
        expires_at = %constraints.expires_at,
        "mandate issued"
    );

    Ok(Mandate {
        id,
        principal_id: principal_id.to_string(),
        agent_id: agent_id.to_string(),
        constraints,
        status: MandateStatus::Active,
        issued_at: now,
        signature,
    })
}
