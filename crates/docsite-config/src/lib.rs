//! Configuration document loading for docsite.
//!
//! Parses the declarative site configuration (`docsite.toml`, or a JSON/YAML
//! equivalent) into a [`SiteDocument`] and provides auto-discovery of the
//! config file in parent directories.
//!
//! Loading separates two classes of problems:
//!
//! - **Syntax** problems ([`ConfigError`]): the file is missing, unreadable,
//!   unparseable, or does not match the document shape. Loading aborts; no
//!   partial document exists.
//! - **Validation** problems ([`Diagnostics`]): unknown keys, unrecognized
//!   enumeration values, deprecated fields, unset environment variables. These
//!   are collected and returned alongside the document so every issue is
//!   reported in one pass.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, reported if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `url`
//! - `baseUrl`
//! - `organizationName`
//! - `projectName`
//! - `navbar.items[].href`
//! - `footer.links[].items[].href`

mod diagnostics;
mod document;
mod expand;
mod sidebars;
mod unique;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;
use unique::UniqueKeys;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, FieldPath, Severity};
pub use document::{
    BannerSetting, DocsConfig, FooterColumn, FooterConfig, FooterItemDecl, I18nConfig,
    NavItemDecl, NavPosition, NavbarConfig, NavbarLogo, PluginEntry, RedirectEntry,
    ReportingSeverity, SiteDocument, VersionOptions,
};
pub use sidebars::{
    DEFAULT_SIDEBAR_ID, SidebarItem, SidebarItemDecl, SidebarsDocument, default_sidebars,
};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "docsite.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded document.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override `baseUrl`.
    pub base_url: Option<String>,
    /// Override `url`.
    pub url: Option<String>,
}

/// Serialization format of a configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
    /// YAML (`.yaml`, `.yml`).
    Yaml,
}

impl Format {
    /// Detect the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => f.write_str("TOML"),
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Configuration error.
///
/// Every variant is fatal: no document can be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Syntax or document shape error.
    #[error("{format} parse error: {message}")]
    Parse {
        /// Format being parsed.
        format: Format,
        /// Parser message.
        message: String,
    },
    /// File extension maps to no supported format.
    #[error("Unsupported configuration format: {} (expected .toml, .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// A parsed document together with where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    /// Parsed document, environment-expanded and with CLI settings applied.
    pub document: SiteDocument,
    /// Path of the config file.
    pub config_path: PathBuf,
    /// Site root: the directory containing the config file.
    pub root_dir: PathBuf,
    /// Problems found while loading.
    pub diagnostics: Diagnostics,
}

/// Parse text into a generic value tree.
///
/// An empty YAML document yields an empty mapping.
///
/// # Errors
///
/// Returns `ConfigError::Parse` if the text is not valid in `format`, or if
/// any mapping repeats a key.
pub fn parse_value(content: &str, format: Format) -> Result<serde_json::Value, ConfigError> {
    let parse_err = |message: String| ConfigError::Parse { format, message };
    let UniqueKeys(value) = match format {
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
    };
    Ok(match value {
        serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
        other => other,
    })
}

/// Parse text into a typed structure.
///
/// # Errors
///
/// Returns `ConfigError::Parse` on syntax errors and on shape mismatches.
pub fn parse_str<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, ConfigError> {
    let value = parse_value(content, format)?;
    serde_json::from_value(value).map_err(|e| ConfigError::Parse {
        format,
        message: e.to_string(),
    })
}

impl SiteDocument {
    /// Load the document from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after environment expansion, so CLI arguments
    /// take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if no config file is found, or reading or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<LoadedConfig, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => discover_config().ok_or_else(|| {
                ConfigError::NotFound(
                    std::env::current_dir()
                        .unwrap_or_default()
                        .join(CONFIG_FILENAME),
                )
            })?,
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let format =
            Format::from_path(&path).ok_or_else(|| ConfigError::UnsupportedFormat(path.clone()))?;

        debug!(path = %path.display(), %format, "loading site configuration");
        let content = std::fs::read_to_string(&path)?;
        let (mut document, diagnostics) = Self::parse(&content, format)?;

        if let Some(settings) = cli_settings {
            document.apply_cli_settings(settings);
        }

        let root_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(LoadedConfig {
            document,
            config_path: path,
            root_dir,
            diagnostics,
        })
    }

    /// Parse a document from text.
    ///
    /// Returns the document and the diagnostics found while reading it
    /// (unknown keys, unrecognized enumeration values, deprecated fields,
    /// unset environment variables). An unrecognized enumeration value is
    /// reported at its field path and the field keeps its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is malformed or does not match
    /// the document shape.
    pub fn parse(content: &str, format: Format) -> Result<(Self, Diagnostics), ConfigError> {
        let mut value = parse_value(content, format)?;
        let mut diagnostics = Diagnostics::new();
        report_unknown_keys(&value, &mut diagnostics);
        take_invalid_values(&mut value, &mut diagnostics);

        let mut document: Self = serde_json::from_value(value).map_err(|e| ConfigError::Parse {
            format,
            message: e.to_string(),
        })?;

        if document.on_broken_markdown_links.is_some() {
            diagnostics.deprecated(
                "onBrokenMarkdownLinks",
                "deprecated; markdown link checks are handled by the renderer",
            );
        }
        document.expand_env_vars(&mut diagnostics);

        Ok((document, diagnostics))
    }

    /// Apply CLI settings to the document.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.base_url.clone_from(base_url);
        }
        if let Some(url) = &settings.url {
            self.url = Some(url.clone());
        }
    }

    /// Expand environment variable references in configuration strings.
    ///
    /// Unset variables are reported at the field path and the value is left
    /// unexpanded.
    fn expand_env_vars(&mut self, diagnostics: &mut Diagnostics) {
        let mut expand = |value: &mut String, path: FieldPath| match expand::expand_env(value) {
            Ok(expanded) => *value = expanded,
            Err(message) => diagnostics.error(path, message),
        };

        if let Some(url) = self.url.as_mut() {
            expand(url, FieldPath::new("url"));
        }
        expand(&mut self.base_url, FieldPath::new("baseUrl"));
        if let Some(org) = self.organization_name.as_mut() {
            expand(org, FieldPath::new("organizationName"));
        }
        if let Some(project) = self.project_name.as_mut() {
            expand(project, FieldPath::new("projectName"));
        }

        let items = FieldPath::new("navbar").field("items");
        for (i, item) in self.navbar.items.iter_mut().enumerate() {
            if let Some(href) = item.href.as_mut() {
                expand(href, items.index(i).field("href"));
            }
        }

        let links = FieldPath::new("footer").field("links");
        for (c, column) in self.footer.links.iter_mut().enumerate() {
            for (i, item) in column.items.iter_mut().enumerate() {
                if let Some(href) = item.href.as_mut() {
                    expand(href, links.index(c).field("items").index(i).field("href"));
                }
            }
        }
    }
}

/// Warn about keys the schema does not know.
///
/// Covers the top level, `docs`, each `docs.versions` entry, each
/// `navbar.items` entry and each `plugins` entry written as a table.
/// Free-form sections (`plugins[].options`, sidebars) are not checked.
fn report_unknown_keys(value: &serde_json::Value, diagnostics: &mut Diagnostics) {
    let Some(root) = value.as_object() else {
        return;
    };
    warn_unknown_keys(root, document::KNOWN_KEYS, FieldPath::new, diagnostics);

    if let Some(docs) = root.get("docs").and_then(serde_json::Value::as_object) {
        let docs_path = FieldPath::new("docs");
        warn_unknown_keys(
            docs,
            document::KNOWN_DOCS_KEYS,
            |key| docs_path.field(key),
            diagnostics,
        );

        let versions = docs.get("versions").and_then(serde_json::Value::as_object);
        for (id, options) in versions.into_iter().flatten() {
            if let Some(options) = options.as_object() {
                let entry = docs_path.field("versions").key(id);
                warn_unknown_keys(
                    options,
                    document::KNOWN_VERSION_KEYS,
                    |key| entry.field(key),
                    diagnostics,
                );
            }
        }
    }

    let items = root
        .get("navbar")
        .and_then(|navbar| navbar.get("items"))
        .and_then(serde_json::Value::as_array);
    for (i, item) in items.into_iter().flatten().enumerate() {
        if let Some(item) = item.as_object() {
            let entry = FieldPath::new("navbar").field("items").index(i);
            warn_unknown_keys(
                item,
                document::KNOWN_NAV_ITEM_KEYS,
                |key| entry.field(key),
                diagnostics,
            );
        }
    }

    let plugins = root.get("plugins").and_then(serde_json::Value::as_array);
    for (i, plugin) in plugins.into_iter().flatten().enumerate() {
        if let Some(plugin) = plugin.as_object() {
            let entry = FieldPath::new("plugins").index(i);
            warn_unknown_keys(
                plugin,
                document::KNOWN_PLUGIN_KEYS,
                |key| entry.field(key),
                diagnostics,
            );
        }
    }
}

fn warn_unknown_keys(
    object: &serde_json::Map<String, serde_json::Value>,
    known: &[&str],
    path: impl Fn(&str) -> FieldPath,
    diagnostics: &mut Diagnostics,
) {
    for key in object.keys() {
        if !known.contains(&key.as_str()) {
            diagnostics.warning(path(key), "unknown key is ignored");
        }
    }
}

/// Report enumeration fields whose value names no variant.
///
/// The offending field is removed so typed parsing falls back to its default
/// and the rest of the document is still checked.
fn take_invalid_values(value: &mut serde_json::Value, diagnostics: &mut Diagnostics) {
    let Some(root) = value.as_object_mut() else {
        return;
    };
    for key in ["onBrokenLinks", "onBrokenMarkdownLinks"] {
        take_invalid::<ReportingSeverity>(root, key, FieldPath::new(key), diagnostics);
    }

    let versions = root
        .get_mut("docs")
        .and_then(|docs| docs.get_mut("versions"))
        .and_then(serde_json::Value::as_object_mut);
    for (id, options) in versions.into_iter().flatten() {
        if let Some(options) = options.as_object_mut() {
            let path = FieldPath::new("docs").field("versions").key(id).field("banner");
            take_invalid::<BannerSetting>(options, "banner", path, diagnostics);
        }
    }

    let items = root
        .get_mut("navbar")
        .and_then(|navbar| navbar.get_mut("items"))
        .and_then(serde_json::Value::as_array_mut);
    for (i, item) in items.into_iter().flatten().enumerate() {
        if let Some(item) = item.as_object_mut() {
            let path = FieldPath::new("navbar").field("items").index(i).field("position");
            take_invalid::<NavPosition>(item, "position", path, diagnostics);
        }
    }
}

/// Remove `key` from `object` when present but not a valid `T`. An explicit
/// `null` is left for the optional fields to absorb.
fn take_invalid<T: DeserializeOwned>(
    object: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
    path: FieldPath,
    diagnostics: &mut Diagnostics,
) {
    let Some(value) = object.get(key).filter(|value| !value.is_null()) else {
        return;
    };
    if let Err(err) = T::deserialize(value) {
        diagnostics.error(path, format!("invalid value {value}: {err}"));
        object.remove(key);
    }
}

/// Search for config file in current directory and parents.
fn discover_config() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SPAWN_TOML: &str = r#"
title = "Spawn"
tagline = "Documentation for Spawn"
url = "https://rollchains.github.io"
baseUrl = "/spawn/"
organizationName = "rollchains"
projectName = "spawn"
trailingSlash = true
onBrokenLinks = "log"

[i18n]
defaultLocale = "en"
locales = ["en"]

[docs]
routeBasePath = "/"
exclude = ["**/*.template.md"]
lastVersion = "v0.50.x"

[docs.versions.current]
path = "main"
banner = "unreleased"

[docs.versions."v0.50.x"]
path = "v0.50"
banner = "none"

[[navbar.items]]
type = "docsVersionDropdown"
position = "right"

[[footer.links]]
title = "Community"
items = [{ label = "Discord", href = "https://discord.com/invite/interchain" }]

[[plugins]]
name = "@docusaurus/plugin-client-redirects"
options = { redirects = [{ from = ["/", "/docs", "/spawn"], to = "/v0.50/" }] }
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("docsite.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(Path::new("site.JSON")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("site.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("site.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("docusaurus.config.js")), None);
        assert_eq!(Format::from_path(Path::new("docsite")), None);
    }

    #[test]
    fn test_parse_toml_document() {
        let (doc, diagnostics) = SiteDocument::parse(SPAWN_TOML, Format::Toml).unwrap();

        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        assert_eq!(doc.title.as_deref(), Some("Spawn"));
        assert_eq!(doc.base_url, "/spawn/");
        assert_eq!(doc.trailing_slash, Some(true));
        assert_eq!(doc.on_broken_links, ReportingSeverity::Log);
        assert_eq!(doc.docs.last_version.as_deref(), Some("v0.50.x"));
        let ids: Vec<_> = doc.docs.versions.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["current", "v0.50.x"]);
        assert_eq!(doc.navbar.items[0].position, NavPosition::Right);
        assert_eq!(doc.footer.links[0].items.len(), 1);
        assert_eq!(doc.plugins[0].name, "@docusaurus/plugin-client-redirects");
    }

    #[test]
    fn test_parse_json_and_yaml_agree() {
        let json = r#"{"baseUrl": "/spawn/", "docs": {"lastVersion": "v0.50.x", "versions": {"v0.50.x": {"path": "v0.50"}}}}"#;
        let yaml = "baseUrl: /spawn/\ndocs:\n  lastVersion: v0.50.x\n  versions:\n    v0.50.x:\n      path: v0.50\n";

        let (from_json, _) = SiteDocument::parse(json, Format::Json).unwrap();
        let (from_yaml, _) = SiteDocument::parse(yaml, Format::Yaml).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_empty_yaml_is_default_document() {
        let (doc, diagnostics) = SiteDocument::parse("", Format::Yaml).unwrap();
        assert_eq!(doc, SiteDocument::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_syntax_error_aborts() {
        let err = SiteDocument::parse("baseUrl = ", Format::Toml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Parse { format: Format::Toml, .. }),
            "Expected ConfigError::Parse, got {err:?}"
        );
    }

    #[test]
    fn test_shape_mismatch_is_parse_error() {
        let err = SiteDocument::parse(r#"{"navbar": {"items": "nope"}}"#, Format::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: Format::Json, .. }));
        assert!(err.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn test_duplicate_keys_abort() {
        let json = r#"{"docs": {"versions": {
            "v0.50.x": {"path": "v0.50"},
            "v0.50.x": {"path": "legacy"}
        }}}"#;
        let err = SiteDocument::parse(json, Format::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: Format::Json, .. }));
        assert!(err.to_string().contains(r#"duplicate key "v0.50.x""#));

        let yaml = "docs:\n  lastVersion: a\n  lastVersion: b\n";
        let err = SiteDocument::parse(yaml, Format::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: Format::Yaml, .. }));
    }

    #[test]
    fn test_unknown_keys_are_warned() {
        let json = r#"{"baseUrl": "/", "themeConfig": {}, "docs": {"editUrl": "x"}}"#;
        let (_, diagnostics) = SiteDocument::parse(json, Format::Json).unwrap();

        let paths: Vec<_> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["themeConfig", "docs.editUrl"]);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_unknown_nested_keys_are_warned() {
        let json = r#"{
            "docs": {"versions": {"v0.50.x": {"path": "v0.50", "bannr": "none"}}},
            "navbar": {"items": [{"label": "Blog", "to": "/blog", "target": "_blank"}]},
            "plugins": [
                "search",
                {"name": "redirects", "option": {}, "options": {"anything": 1}}
            ]
        }"#;
        let (document, diagnostics) = SiteDocument::parse(json, Format::Json).unwrap();

        let paths: Vec<_> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                r#"docs.versions["v0.50.x"].bannr"#,
                "navbar.items[0].target",
                "plugins[1].option",
            ]
        );
        assert!(!diagnostics.has_errors());
        assert_eq!(document.plugins.len(), 2);
    }

    #[test]
    fn test_invalid_enum_values_are_collected() {
        let toml = r#"
onBrokenLinks = "explode"

[docs]
lastVersion = "v9"

[docs.versions."v0.50.x"]
path = "v0.50"
banner = "unmaintaned"

[[navbar.items]]
label = "GitHub"
href = "https://github.com/rollchains/spawn"
position = "center"
"#;
        let (document, diagnostics) = SiteDocument::parse(toml, Format::Toml).unwrap();

        let paths: Vec<_> = diagnostics.errors().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "onBrokenLinks",
                r#"docs.versions["v0.50.x"].banner"#,
                "navbar.items[0].position",
            ]
        );
        assert!(diagnostics.errors().nth(1).unwrap().message.contains("unmaintaned"));
        assert_eq!(document.docs.last_version.as_deref(), Some("v9"));
        assert_eq!(document.docs.versions["v0.50.x"].banner, None);
        assert_eq!(document.docs.versions["v0.50.x"].path.as_deref(), Some("v0.50"));
    }

    #[test]
    fn test_generated_key_is_accepted_silently() {
        let json = r#"{"baseUrl": "/", "generated": {"routes": []}}"#;
        let (_, diagnostics) = SiteDocument::parse(json, Format::Json).unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_deprecated_on_broken_markdown_links() {
        let json = r#"{"onBrokenMarkdownLinks": "log"}"#;
        let (_, diagnostics) = SiteDocument::parse(json, Format::Json).unwrap();

        let entry = diagnostics.iter().next().unwrap();
        assert_eq!(entry.kind, DiagnosticKind::Deprecation);
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.path, "onBrokenMarkdownLinks");
    }

    #[test]
    fn test_expand_env_vars_in_identifiers() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCSITE_LIB_TEST_ORG", "rollchains");
        }

        let toml = r#"
url = "https://${DOCSITE_LIB_TEST_ORG}.github.io"
organizationName = "${DOCSITE_LIB_TEST_ORG}"
projectName = "${DOCSITE_LIB_TEST_PROJECT:-spawn}"
baseUrl = "/${DOCSITE_LIB_TEST_PROJECT:-spawn}/"
"#;
        let (doc, diagnostics) = SiteDocument::parse(toml, Format::Toml).unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(doc.url.as_deref(), Some("https://rollchains.github.io"));
        assert_eq!(doc.organization_name.as_deref(), Some("rollchains"));
        assert_eq!(doc.project_name.as_deref(), Some("spawn"));
        assert_eq!(doc.base_url, "/spawn/");

        unsafe {
            std::env::remove_var("DOCSITE_LIB_TEST_ORG");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_is_collected() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCSITE_LIB_TEST_MISSING");
        }

        let toml = r#"
[[footer.links]]
items = [{ label = "GitHub", href = "${DOCSITE_LIB_TEST_MISSING}" }]
"#;
        let (doc, diagnostics) = SiteDocument::parse(toml, Format::Toml).unwrap();

        assert_eq!(diagnostics.error_count(), 1);
        let entry = diagnostics.errors().next().unwrap();
        assert_eq!(entry.path, "footer.links[0].items[0].href");
        assert!(entry.message.contains("DOCSITE_LIB_TEST_MISSING"));
        // Value is left as declared
        assert_eq!(
            doc.footer.links[0].items[0].href.as_deref(),
            Some("${DOCSITE_LIB_TEST_MISSING}")
        );
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut doc = SiteDocument::default();
        doc.apply_cli_settings(&CliSettings {
            base_url: Some("/preview/".to_owned()),
            ..Default::default()
        });
        assert_eq!(doc.base_url, "/preview/");
        assert!(doc.url.is_none());

        doc.apply_cli_settings(&CliSettings {
            url: Some("http://localhost:3000".to_owned()),
            ..Default::default()
        });
        assert_eq!(doc.url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(doc.base_url, "/preview/");
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("docsite.toml");
        std::fs::write(&path, SPAWN_TOML).unwrap();

        let loaded = SiteDocument::load(Some(&path), None).unwrap();
        assert_eq!(loaded.root_dir, temp_dir.path());
        assert_eq!(loaded.config_path, path);
        assert_eq!(loaded.document.project_name.as_deref(), Some("spawn"));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("site.json");
        std::fs::write(&path, r#"{"baseUrl": "/spawn/"}"#).unwrap();

        let settings = CliSettings {
            base_url: Some("/".to_owned()),
            ..Default::default()
        };
        let loaded = SiteDocument::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(loaded.document.base_url, "/");
    }

    #[test]
    fn test_load_missing_file() {
        let err = SiteDocument::load(Some(Path::new("/nonexistent/docsite.toml")), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("docusaurus.config.js");
        std::fs::write(&path, "module.exports = {}").unwrap();

        let err = SiteDocument::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_str_sidebars() {
        let sidebars: SidebarsDocument =
            parse_str("defaultSidebar:\n  - intro\n", Format::Yaml).unwrap();
        assert_eq!(
            sidebars[DEFAULT_SIDEBAR_ID],
            vec![SidebarItemDecl::DocId("intro".to_owned())]
        );
    }
}
