//! docsite CLI - documentation site configuration resolver.
//!
//! Provides commands for:
//! - `validate-config`: Validate a site configuration and report diagnostics
//! - `resolve`: Print the resolved site model as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ResolveArgs, ValidateArgs};
use output::Output;

/// docsite - documentation site configuration resolver.
#[derive(Parser)]
#[command(name = "docsite", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a site configuration.
    ValidateConfig(ValidateArgs),
    /// Resolve a site configuration and print it as JSON.
    Resolve(ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout carries resolved JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let result = match cli.command {
        Commands::ValidateConfig(args) => args.execute(&output),
        Commands::Resolve(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_config() {
        let cli = Cli::try_parse_from([
            "docsite",
            "validate-config",
            "website/docsite.toml",
            "--base-url",
            "/preview/",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_parse_resolve_with_output() {
        let cli = Cli::try_parse_from(["docsite", "resolve", "-o", "site.json"]).unwrap();

        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Resolve(_)));
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["docsite", "serve"]).is_err());
    }
}
