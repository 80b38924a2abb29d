//! Payment Mandates
//!
//! Signed, time-boxed delegations that let an agent pay on behalf of a
//! principal within a fixed [`Constraints`] envelope.
//!
//! # Lifecycle
//!
//! | Status | Reached by | Terminal |
//! |--------|------------|----------|
//! | `active` | issuance | no |
//! | `exhausted` | [`Mandate::mark_exhausted`], single-use approval | yes |
//! | `revoked` | [`Mandate::revoke`] | yes |
//! | `expired` | first authorization past `expires_at` | yes |
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use mulberry_mandate::mandate::{
//!     issue_mandate, Constraints, MandateSigner, MandateStatus, SigningSecret,
//! };
//!
//! let signer = MandateSigner::new(SigningSecret::new(b"doc-secret".to_vec()).unwrap());
//! let constraints = Constraints::new(50_000, "KRW", ["API_FEE"], Utc::now() + Duration::hours(1));
//!
//! let mandate = issue_mandate(&signer, "user-123", "mulberry-kp", constraints).unwrap();
//! assert_eq!(mandate.status(), MandateStatus::Active);
//! assert!(signer.verify(&mandate).is_ok());
//! ```

pub mod codec;
pub mod issue;
pub mod lifecycle;
pub mod signing;
pub mod types;

pub use codec::DeserializationError;
pub use issue::{issue_mandate, issue_mandate_at, validate_constraints, IssueError};
pub use lifecycle::TransitionError;
pub use signing::{
    decode_signature, signing_input, MandateSigner, SigningError, SigningSecret, VerifyError,
    SIGNATURE_LEN, SIGNATURE_PREFIX,
};
pub use types::{Constraints, Mandate, MandateStatus, MANDATE_PAYLOAD_TYPE};
