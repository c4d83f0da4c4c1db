//! `docsite resolve` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected or the output
    /// cannot be written.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let resolved = self.config.assemble(output)?;
        let json = resolved.site().to_json()?;

        match self.output {
            Some(path) => {
                std::fs::write(&path, format!("{json}\n"))?;
                output.success(&format!("Resolved site written to {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::commands::fixtures::{VALID, write_site};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ResolveArgs,
    }

    #[test]
    fn test_writes_json_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_site(temp_dir.path(), VALID);
        let out = temp_dir.path().join("site.json");

        let cli = TestCli::try_parse_from([
            "resolve",
            path.to_str().unwrap(),
            "--base-url",
            "/preview/",
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();
        cli.args.execute(&Output::new()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["baseUrl"], "/preview/");
        assert_eq!(value["generated"]["redirects"][0]["to"], "/preview/v0.50/");
    }

    #[test]
    fn test_rejected_site_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_site(temp_dir.path(), &format!("{VALID}\n[[redirects]]\nfrom = \"/docs\"\nto = \"/v0.50/\"\n"));
        let out = temp_dir.path().join("site.json");

        let cli = TestCli::try_parse_from([
            "resolve",
            path.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();

        assert!(cli.args.execute(&Output::new()).is_err());
        assert!(!out.exists());
    }
}
