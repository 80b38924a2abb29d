//! `mulberry verify` - Check a stored mandate's signature.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{build_authorizer, read_mandate};
use crate::cli::args::GlobalArgs;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Mandate file (JSON)
    pub mandate: PathBuf,

    /// Quiet mode - only exit code, no output
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Serialize)]
struct VerifyReport {
    mandate_id: String,
    valid: bool,
    status: String,
}

pub fn cmd_verify(args: VerifyArgs, global: &GlobalArgs) -> i32 {
    match run_verify(&args, global) {
        Ok(code) => code,
        Err(e) => {
            if !args.quiet {
                eprintln!("error: {e:#}");
            }
            exit_codes::INTERNAL_ERROR
        }
    }
}

fn run_verify(args: &VerifyArgs, global: &GlobalArgs) -> Result<i32> {
    let authorizer = build_authorizer(global)?;
    let mandate = read_mandate(&args.mandate)?;

    let valid = authorizer.verify_integrity(&mandate);
    if !args.quiet {
        let report = VerifyReport {
            mandate_id: mandate.id().to_string(),
            valid,
            status: mandate.status().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if valid {
        Ok(exit_codes::SUCCESS)
    } else {
        if !args.quiet {
            eprintln!("error: signature does not match mandate content");
        }
        Ok(exit_codes::INTEGRITY_FAILURE)
    }
}
