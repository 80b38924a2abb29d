//! Runtime payment authorization.
//!
//! ```text
//!  agent ──▶ PaymentRequest ──▶ Authorizer ──▶ Pipeline ──▶ Verdict ──▶ gateway
//!                                   │             │
//!                                   │      Integrity → Expiry → Agent → TrustScore
//!                                   │      → Category → Budget → Status
//!                                   │      → Intent → [custom] → (split)
//!                                   ▼
//!                          &mut Mandate (status)
//! ```

mod authorizer;
mod gate;
mod gates;
mod pipeline;
mod request;
mod verdict;

pub use authorizer::{compute_split, Authorizer};
pub use gate::{Gate, GateInput};
pub use gates::{
    AgentGate, BudgetGate, CategoryGate, ExpiryGate, IntegrityGate, IntentGate, StatusGate,
    TrustScoreGate,
};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineKind};
pub use request::PaymentRequest;
pub use verdict::{DenyReason, FundSplit, Verdict};
