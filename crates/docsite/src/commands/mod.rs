//! CLI command implementations.

pub(crate) mod resolve;
pub(crate) mod validate;

use std::path::PathBuf;

use clap::Args;
use docsite_config::{CliSettings, SiteDocument};
use docsite_resolve::{Resolved, SiteAssembler};
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use resolve::ResolveArgs;
pub(crate) use validate::ValidateArgs;

/// Config file selection and overrides shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover docsite.toml).
    path: Option<PathBuf>,

    /// Base path the site is served under (overrides config).
    #[arg(long, env = "DOCSITE_BASE_URL")]
    base_url: Option<String>,

    /// Production URL (overrides config).
    #[arg(long, env = "DOCSITE_URL")]
    url: Option<String>,
}

impl ConfigArgs {
    /// Load and assemble the site, printing every diagnostic.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` on syntax errors and `CliError::Rejected`
    /// when any diagnostic has error severity.
    pub(crate) fn assemble(self, output: &Output) -> Result<Resolved, CliError> {
        let cli_settings = CliSettings {
            base_url: self.base_url,
            url: self.url,
        };
        let loaded = SiteDocument::load(self.path.as_deref(), Some(&cli_settings))?;
        output.info(&format!("Config: {}", loaded.config_path.display()));
        debug!(root = %loaded.root_dir.display(), "resolving site");

        match SiteAssembler::from_loaded(loaded).assemble() {
            Ok(resolved) => {
                output.report(resolved.diagnostics());
                Ok(resolved)
            }
            Err(rejected) => {
                output.report(rejected.diagnostics());
                Err(rejected.into())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    pub(crate) const VALID: &str = r#"
title = "Spawn"
url = "https://rollchains.github.io"
baseUrl = "/spawn/"
organizationName = "rollchains"
projectName = "spawn"

[docs]
lastVersion = "v0.50.x"

[docs.versions."v0.50.x"]
path = "v0.50"
banner = "none"

[[redirects]]
from = ["/", "/docs"]
to = "/v0.50/"
"#;

    /// Write a site with one versioned doc and return the config path.
    pub(crate) fn write_site(dir: &Path, config: &str) -> PathBuf {
        let docs = dir.join("versioned_docs/version-v0.50.x");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("01-intro.md"), "# Introduction").unwrap();
        let path = dir.join("docsite.toml");
        std::fs::write(&path, config).unwrap();
        path
    }
}
