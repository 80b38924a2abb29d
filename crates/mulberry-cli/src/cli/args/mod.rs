use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{authorize::AuthorizeArgs, issue::IssueArgs, revoke::RevokeArgs, verify::VerifyArgs};

/// Environment variable holding the signing secret when `--secret-file` is absent.
pub const SECRET_ENV_VAR: &str = "MULBERRY_MANDATE_SECRET";

#[derive(Parser, Debug)]
#[command(
    name = "mulberry",
    version,
    about = "Issue and authorize tamper-evident payment mandates for autonomous agents"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// File containing the signing secret (default: $MULBERRY_MANDATE_SECRET)
    #[arg(long, global = true)]
    pub secret_file: Option<PathBuf>,

    /// Authorization config (YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Issue a signed mandate from a constraints file
    Issue(IssueArgs),

    /// Check a stored mandate's signature
    Verify(VerifyArgs),

    /// Authorize one payment against a stored mandate
    Authorize(AuthorizeArgs),

    /// Revoke a stored mandate in place
    Revoke(RevokeArgs),
}
