//! `mulberry revoke` - Revoke a stored mandate in place.

use anyhow::Result;
use clap::Args;
use mulberry_mandate::TransitionError;
use std::path::PathBuf;

use super::common::{read_mandate, write_mandate};
use crate::cli::args::GlobalArgs;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Mandate file (JSON)
    pub mandate: PathBuf,
}

pub fn cmd_revoke(args: RevokeArgs, _global: &GlobalArgs) -> i32 {
    match run_revoke(&args) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if e.downcast_ref::<TransitionError>().is_some() {
                exit_codes::DENIED
            } else {
                exit_codes::INTERNAL_ERROR
            }
        }
    }
}

fn run_revoke(args: &RevokeArgs) -> Result<()> {
    let mut mandate = read_mandate(&args.mandate)?;
    mandate.revoke()?;
    write_mandate(&args.mandate, &mandate)?;
    eprintln!("Revoked mandate {}", mandate.id());
    Ok(())
}
