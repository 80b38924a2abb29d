//! `mulberry authorize` - Run one payment through an authorization pipeline.

use anyhow::Result;
use clap::{Args, ValueEnum};
use mulberry_mandate::{DenyReason, PaymentRequest, Pipeline, PipelineKind};
use std::path::PathBuf;

use super::common::{build_authorizer, read_mandate, write_mandate};
use crate::cli::args::GlobalArgs;
use crate::exit_codes;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineArg {
    /// Integrity, expiry, budget, status
    #[default]
    Base,
    /// Base plus trust score and merchant category
    ZeroTrust,
    /// Base plus trust score, intent and donation split
    Social,
    /// All gates, agent binding included, plus donation split
    Full,
}

impl From<PipelineArg> for PipelineKind {
    fn from(arg: PipelineArg) -> Self {
        match arg {
            PipelineArg::Base => PipelineKind::Base,
            PipelineArg::ZeroTrust => PipelineKind::ZeroTrust,
            PipelineArg::Social => PipelineKind::Social,
            PipelineArg::Full => PipelineKind::Full,
        }
    }
}

#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// Mandate file (JSON)
    pub mandate: PathBuf,

    /// Amount in the smallest currency unit
    #[arg(long)]
    pub amount: u64,

    /// Merchant category code
    #[arg(long)]
    pub mcc: Option<String>,

    /// Live trust score
    #[arg(long)]
    pub trust_score: Option<f64>,

    /// Extracted purchase intent
    #[arg(long)]
    pub intent: Option<String>,

    /// Requesting agent; when given, it must match the mandate's agent
    #[arg(long)]
    pub agent: Option<String>,

    #[arg(long, value_enum, default_value_t = PipelineArg::Base)]
    pub pipeline: PipelineArg,

    /// Persist status changes (expired / exhausted) back to the mandate file
    #[arg(long)]
    pub write_back: bool,
}

pub fn cmd_authorize(args: AuthorizeArgs, global: &GlobalArgs) -> i32 {
    match run_authorize(&args, global) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::INTERNAL_ERROR
        }
    }
}

fn run_authorize(args: &AuthorizeArgs, global: &GlobalArgs) -> Result<i32> {
    let authorizer = build_authorizer(global)?;
    let mut mandate = read_mandate(&args.mandate)?;
    let status_before = mandate.status();

    let request = PaymentRequest {
        amount: args.amount,
        merchant_category: args.mcc.clone(),
        trust_score: args.trust_score,
        intent: args.intent.clone(),
        agent_id: args.agent.clone(),
    };
    let pipeline = pipeline_for(args);
    let verdict = authorizer.evaluate(&pipeline, &mut mandate, &request);

    println!("{}", serde_json::to_string_pretty(&verdict)?);

    if args.write_back && mandate.status() != status_before {
        write_mandate(&args.mandate, &mandate)?;
        tracing::info!(status = %mandate.status(), "mandate status written back");
    }

    Ok(exit_code_for(verdict.reason.as_ref()))
}

fn pipeline_for(args: &AuthorizeArgs) -> Pipeline {
    let builder = PipelineKind::from(args.pipeline).builder();
    if args.agent.is_some() {
        builder.with_agent_gate().build()
    } else {
        builder.build()
    }
}

fn exit_code_for(reason: Option<&DenyReason>) -> i32 {
    match reason {
        None => exit_codes::SUCCESS,
        Some(DenyReason::SignatureMismatch) => exit_codes::INTEGRITY_FAILURE,
        Some(_) => exit_codes::DENIED,
    }
}
