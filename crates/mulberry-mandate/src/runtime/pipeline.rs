//! Authorization pipeline assembly.
//!
//! Gate order is fixed:
//!
//! ```text
//! Integrity → Expiry → Agent → TrustScore → Category → Budget → Status → Intent → [custom] → (split)
//! ```
//!
//! Integrity, Expiry, Budget and Status are always present. The builder can
//! only switch overlays on and append custom gates after the built-ins.
//! Only `full` binds the requesting agent by default; any other preset gets
//! it through [`PipelineKind::builder`] and [`PipelineBuilder::with_agent_gate`].

use super::gate::Gate;
use super::gates::{
    AgentGate, BudgetGate, CategoryGate, ExpiryGate, IntegrityGate, IntentGate, StatusGate,
    TrustScoreGate,
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Named pipeline presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Integrity, expiry, budget, status
    Base,
    /// Base plus trust score and merchant category
    ZeroTrust,
    /// Base plus trust score, intent and donation split
    Social,
    /// Every built-in gate, agent binding included, plus donation split
    Full,
}

impl PipelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::ZeroTrust => "zero-trust",
            Self::Social => "social",
            Self::Full => "full",
        }
    }

    /// Builder preloaded with this preset's overlays, for adding more.
    pub fn builder(self) -> PipelineBuilder {
        let builder = Pipeline::builder();
        match self {
            Self::Base => builder,
            Self::ZeroTrust => builder.with_trust_gate().with_category_gate(),
            Self::Social => builder
                .with_trust_gate()
                .with_intent_gate()
                .with_donation_split(),
            Self::Full => builder
                .with_agent_gate()
                .with_trust_gate()
                .with_category_gate()
                .with_intent_gate()
                .with_donation_split(),
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Self::Base),
            "zero-trust" | "zero_trust" => Ok(Self::ZeroTrust),
            "social" => Ok(Self::Social),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown pipeline '{}' (expected base, zero-trust, social or full)",
                other
            )),
        }
    }
}

/// Ordered gates plus an optional donation split.
#[derive(Clone)]
pub struct Pipeline {
    gates: Vec<Arc<dyn Gate>>,
    split: bool,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn base() -> Self {
        Self::for_kind(PipelineKind::Base)
    }

    pub fn zero_trust() -> Self {
        Self::for_kind(PipelineKind::ZeroTrust)
    }

    pub fn social() -> Self {
        Self::for_kind(PipelineKind::Social)
    }

    pub fn full() -> Self {
        Self::for_kind(PipelineKind::Full)
    }

    pub fn for_kind(kind: PipelineKind) -> Self {
        kind.builder().build()
    }

    pub fn gates(&self) -> impl Iterator<Item = &dyn Gate> {
        self.gates.iter().map(|g| g.as_ref())
    }

    pub fn gate_names(&self) -> Vec<&str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    /// Whether approvals carry a [`FundSplit`](super::FundSplit).
    pub fn splits_donation(&self) -> bool {
        self.split
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("gates", &self.gate_names())
            .field("split", &self.split)
            .finish()
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    agent: bool,
    trust: bool,
    category: bool,
    intent: bool,
    split: bool,
    custom: Vec<Arc<dyn Gate>>,
}

impl PipelineBuilder {
    /// Require the request's agent id to match the mandate's.
    pub fn with_agent_gate(mut self) -> Self {
        self.agent = true;
        self
    }

    pub fn with_trust_gate(mut self) -> Self {
        self.trust = true;
        self
    }

    pub fn with_category_gate(mut self) -> Self {
        self.category = true;
        self
    }

    pub fn with_intent_gate(mut self) -> Self {
        self.intent = true;
        self
    }

    pub fn with_donation_split(mut self) -> Self {
        self.split = true;
        self
    }

    /// Append a custom gate. Custom gates run after every built-in gate,
    /// in insertion order.
    pub fn with_gate(mut self, gate: impl Gate + 'static) -> Self {
        self.custom.push(Arc::new(gate));
        self
    }

    pub fn build(self) -> Pipeline {
        let mut gates: Vec<Arc<dyn Gate>> = vec![Arc::new(IntegrityGate), Arc::new(ExpiryGate)];
        if self.agent {
            gates.push(Arc::new(AgentGate));
        }
        if self.trust {
            gates.push(Arc::new(TrustScoreGate));
        }
        if self.category {
            gates.push(Arc::new(CategoryGate));
        }
        gates.push(Arc::new(BudgetGate));
        gates.push(Arc::new(StatusGate));
        if self.intent {
            gates.push(Arc::new(IntentGate));
        }
        gates.extend(self.custom);

        Pipeline {
            gates,
            split: self.split,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::gate::GateInput;
    use crate::runtime::verdict::DenyReason;

    struct AlwaysPass;

    impl Gate for AlwaysPass {
        fn name(&self) -> &str {
            "always_pass"
        }

        fn check(&self, _input: &GateInput<'_>) -> Result<(), DenyReason> {
            Ok(())
        }
    }

    #[test]
    fn test_preset_gate_order() {
        assert_eq!(
            Pipeline::base().gate_names(),
            vec!["integrity", "expiry", "budget", "status"]
        );
        assert_eq!(
            Pipeline::zero_trust().gate_names(),
            vec![
                "integrity",
                "expiry",
                "trust_score",
                "category",
                "budget",
                "status"
            ]
        );
        assert_eq!(
            Pipeline::social().gate_names(),
            vec![
                "integrity",
                "expiry",
                "trust_score",
                "budget",
                "status",
                "intent"
            ]
        );
        assert_eq!(
            Pipeline::full().gate_names(),
            vec![
                "integrity",
                "expiry",
                "agent",
                "trust_score",
                "category",
                "budget",
                "status",
                "intent"
            ]
        );
        assert!(Pipeline::social().splits_donation());
        assert!(!Pipeline::zero_trust().splits_donation());
    }

    #[test]
    fn test_builder_order_independent_of_call_order() {
        let a = Pipeline::builder()
            .with_intent_gate()
            .with_category_gate()
            .with_trust_gate()
            .with_agent_gate()
            .build();
        assert_eq!(a.gate_names(), Pipeline::full().gate_names());
    }

    #[test]
    fn test_custom_gates_run_last() {
        let p = Pipeline::builder()
            .with_gate(AlwaysPass)
            .with_trust_gate()
            .build();
        assert_eq!(p.gate_names().last(), Some(&"always_pass"));
        assert_eq!(p.gate_names()[0], "integrity");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("zero-trust".parse::<PipelineKind>(), Ok(PipelineKind::ZeroTrust));
        assert_eq!("full".parse::<PipelineKind>(), Ok(PipelineKind::Full));
        assert!("strict".parse::<PipelineKind>().is_err());
        assert_eq!(
            Pipeline::for_kind(PipelineKind::Social).gate_names(),
            Pipeline::social().gate_names()
        );
    }

    #[test]
    fn test_kind_builder_adds_agent_binding() {
        let p = PipelineKind::ZeroTrust.builder().with_agent_gate().build();
        assert_eq!(
            p.gate_names(),
            vec![
                "integrity",
                "expiry",
                "agent",
                "trust_score",
                "category",
                "budget",
                "status"
            ]
        );
        assert!(!Pipeline::base().gate_names().contains(&"agent"));
        assert!(!Pipeline::social().gate_names().contains(&"agent"));
    }

    #[test]
    fn test_debug_lists_gates() {
        let debug = format!("{:?}", Pipeline::base());
        assert!(debug.contains("integrity"));
        assert!(debug.contains("split: false"));
    }
}
