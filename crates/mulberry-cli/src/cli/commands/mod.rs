pub mod authorize;
pub mod common;
pub mod issue;
pub mod revoke;
pub mod verify;

use super::args::{Cli, Command};

/// Run the selected command and return its process exit code.
pub fn dispatch(cli: Cli) -> i32 {
    let global = &cli.global;
    match cli.cmd {
        Command::Issue(args) => issue::cmd_issue(args, global),
        Command::Verify(args) => verify::cmd_verify(args, global),
        Command::Authorize(args) => authorize::cmd_authorize(args, global),
        Command::Revoke(args) => revoke::cmd_revoke(args, global),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes;
    use clap::Parser;

    #[test]
    fn test_dispatch_maps_command_errors_to_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let missing = missing.to_str().unwrap();

        let cli = Cli::try_parse_from(["mulberry", "revoke", missing]).unwrap();
        assert_eq!(dispatch(cli), exit_codes::INTERNAL_ERROR);

        let cli = Cli::try_parse_from(["mulberry", "verify", "--quiet", missing]).unwrap();
        assert_eq!(dispatch(cli), exit_codes::INTERNAL_ERROR);
    }
}
