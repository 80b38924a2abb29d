//! Status transitions.
//!
//! `Active` moves to exactly one terminal state and stays there. Repeating
//! the transition that put a mandate in its current state is a no-op.

use crate::mandate::types::{Mandate, MandateStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move mandate from {from} to {to}")]
pub struct TransitionError {
    pub from: MandateStatus,
    pub to: MandateStatus,
}

impl Mandate {
    /// Revoke an active mandate.
    pub fn revoke(&mut self) -> Result<(), TransitionError> {
        self.transition(MandateStatus::Revoked)
    }

    /// Mark an active mandate as spent.
    pub fn mark_exhausted(&mut self) -> Result<(), TransitionError> {
        self.transition(MandateStatus::Exhausted)
    }

    /// Record expiry. Only an active mandate changes; returns whether it did.
    pub(crate) fn mark_expired(&mut self) -> bool {
        if self.status == MandateStatus::Active {
            self.status = MandateStatus::Expired;
            true
        } else {
            false
        }
    }

    fn transition(&mut self, to: MandateStatus) -> Result<(), TransitionError> {
        match self.status {
            MandateStatus::Active => {
                tracing::info!(mandate_id = %self.id, status = %to, "mandate status changed");
                self.status = to;
                Ok(())
            }
            current if current == to => Ok(()),
            from => Err(TransitionError { from, to }),
        }
    }
}
