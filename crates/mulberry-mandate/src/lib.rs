//! Mulberry payment mandates.
//!
//! Issue tamper-evident spending mandates for autonomous agents and authorize
//! individual payments against them.
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use mulberry_mandate::{
//!     Authorizer, AuthzConfig, Constraints, DenyReason, MandateSigner, SigningSecret,
//! };
//!
//! let signer = MandateSigner::new(SigningSecret::new(b"doc-secret".to_vec()).unwrap());
//! let authorizer = Authorizer::new(signer, AuthzConfig::default());
//!
//! let constraints = Constraints::new(50_000, "KRW", ["API_FEE"], Utc::now() + Duration::hours(1));
//! let mut mandate = authorizer.issue("user-123", "mulberry-kp", constraints).unwrap();
//!
//! assert!(authorizer.authorize(&mut mandate, 30_000).is_approved());
//! assert!(matches!(
//!     authorizer.authorize(&mut mandate, 70_000).reason,
//!     Some(DenyReason::BudgetExceeded { .. })
//! ));
//! ```

pub mod config;
pub mod crypto;
pub mod mandate;
pub mod runtime;

pub use config::{AuthzConfig, ConfigError, UsagePolicy, DEFAULT_GLOBAL_TRUST_FLOOR};
pub use mandate::{
    Constraints, DeserializationError, IssueError, Mandate, MandateSigner, MandateStatus,
    SigningSecret, TransitionError, VerifyError,
};
pub use runtime::{
    Authorizer, DenyReason, FundSplit, Gate, GateInput, PaymentRequest, Pipeline, PipelineKind,
    Verdict,
};
