//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// driftenv - Resolve environment values across providers and detect drift
#[derive(Parser, Debug)]
#[command(name = "driftenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Declarations file (YAML, JSON, or TOML)
    #[arg(
        short,
        long,
        global = true,
        env = "DRIFTENV_CONFIG",
        default_value = "driftenv.yml"
    )]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show resolved entries, redacted by severity
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print resolved entries as KEY=value lines
    Env,

    /// Compare source-labeled entries against sink-labeled entries
    ///
    /// Exits non-zero when drift is found.
    Drift {
        /// Fail when a key appears more than once on either side
        #[arg(long)]
        strict: bool,

        /// Print raw value diffs instead of redacted values
        #[arg(long)]
        reveal: bool,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Search files for resolved secret values
    ///
    /// Exits non-zero when a secret is found.
    Scan {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy stdin to stdout with secret values replaced
    Redact,

    /// Write a value through a provider
    Put {
        /// Provider name from the declarations
        #[arg(short, long)]
        provider: String,

        /// Backend path to write
        #[arg(long)]
        path: String,

        /// Field within a structured secret
        #[arg(short, long)]
        field: Option<String>,

        /// Value to write
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from::<[&str; 1], &str>(["driftenv"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_drift_flags() {
        let cli = Cli::parse_from(["driftenv", "-c", "x.yaml", "drift", "--strict", "--json"]);
        assert_eq!(cli.config, PathBuf::from("x.yaml"));
        assert_eq!(
            cli.command,
            Some(Commands::Drift {
                strict: true,
                reveal: false,
                json: true
            })
        );
    }

    #[test]
    fn parse_put() {
        let cli = Cli::parse_from([
            "driftenv", "put", "--provider", "local", "--path", "app/db", "-f", "pw", "s3cret",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::Put {
                provider: "local".into(),
                path: "app/db".into(),
                field: Some("pw".into()),
                value: "s3cret".into(),
            })
        );
    }
}
