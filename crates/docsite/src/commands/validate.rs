//! `docsite validate-config` command implementation.

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate-config command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl ValidateArgs {
    /// Execute the validate-config command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed or is rejected.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let resolved = self.config.assemble(output)?;
        let site = resolved.site();
        output.success(&format!(
            "Configuration is valid: {} version(s), {} page(s)",
            site.versions().len(),
            site.pages().len()
        ));
        Ok(())
    }
}
