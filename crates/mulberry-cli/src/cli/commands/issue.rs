//! `mulberry issue` - Issue a signed mandate.

use anyhow::{Context, Result};
use chrono::{Duration, SecondsFormat, Utc};
use clap::Args;
use mulberry_mandate::Constraints;
use std::path::PathBuf;

use super::common::{build_authorizer, read_document, write_mandate};
use crate::cli::args::GlobalArgs;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Principal (human) the mandate acts for
    #[arg(long)]
    pub principal: String,

    /// Agent allowed to spend under the mandate
    #[arg(long)]
    pub agent: String,

    /// Constraints file (JSON or YAML)
    #[arg(long)]
    pub constraints: PathBuf,

    /// Set expires_at to now + SECONDS, overriding the file
    #[arg(long, value_name = "SECONDS")]
    pub expires_in: Option<i64>,

    /// Write the mandate here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn cmd_issue(args: IssueArgs, global: &GlobalArgs) -> i32 {
    match run_issue(&args, global) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_codes::INTERNAL_ERROR
        }
    }
}

fn run_issue(args: &IssueArgs, global: &GlobalArgs) -> Result<()> {
    let authorizer = build_authorizer(global)?;

    let mut doc = read_document(&args.constraints)?;
    if let Some(secs) = args.expires_in {
        let expires_at = Duration::try_seconds(secs)
            .and_then(|d| Utc::now().checked_add_signed(d))
            .context("--expires-in is out of range")?;
        let obj = doc
            .as_object_mut()
            .context("constraints document must be a mapping")?;
        obj.insert(
            "expires_at".to_string(),
            expires_at.to_rfc3339_opts(SecondsFormat::Secs, true).into(),
        );
    }
    let constraints: Constraints = serde_json::from_value(doc)
        .with_context(|| format!("invalid constraints: {}", args.constraints.display()))?;

    let mandate = authorizer.issue(&args.principal, &args.agent, constraints)?;

    match &args.out {
        Some(path) => {
            write_mandate(path, &mandate)?;
            eprintln!("Issued mandate {} -> {}", mandate.id(), path.display());
        }
        None => println!("{}", mandate.to_json_pretty()?),
    }
    Ok(())
}
