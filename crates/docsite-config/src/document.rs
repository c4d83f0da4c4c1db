//! Input document schema.
//!
//! Field names follow the camelCase keys of the declarative site configuration
//! (`baseUrl`, `docs.lastVersion`, `navbar.items`, ...). Every optional field
//! has an explicit default, so a parsed [`SiteDocument`] is always complete.
//! Object-valued fields replace their defaults wholesale; nothing is merged
//! recursively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::sidebars::SidebarsDocument;

/// Top-level keys recognized in the input document.
pub(crate) const KNOWN_KEYS: &[&str] = &[
    "title",
    "tagline",
    "url",
    "baseUrl",
    "favicon",
    "organizationName",
    "projectName",
    "deploymentBranch",
    "trailingSlash",
    "onBrokenLinks",
    "onBrokenMarkdownLinks",
    "i18n",
    "docs",
    "sidebars",
    "navbar",
    "footer",
    "themes",
    "plugins",
    "redirects",
    "generated",
];

/// Keys recognized inside the `docs` section.
pub(crate) const KNOWN_DOCS_KEYS: &[&str] = &[
    "path",
    "routeBasePath",
    "exclude",
    "sidebarPath",
    "lastVersion",
    "versions",
];

/// Keys recognized in a `docs.versions` entry.
pub(crate) const KNOWN_VERSION_KEYS: &[&str] = &["path", "banner", "label"];

/// Keys recognized in a `navbar.items` entry.
pub(crate) const KNOWN_NAV_ITEM_KEYS: &[&str] = &[
    "type",
    "label",
    "to",
    "href",
    "html",
    "docId",
    "sidebarId",
    "position",
    "dropdownActiveClassDisabled",
    "enabled",
];

/// Keys recognized in a `plugins` entry written as a table.
pub(crate) const KNOWN_PLUGIN_KEYS: &[&str] = &["name", "options", "enabled"];

/// Declarative site configuration as written by the user.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteDocument {
    /// Site title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Site tagline.
    pub tagline: String,
    /// Production URL (scheme and host).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Path prefix under which the site is served. Starts and ends with `/`.
    pub base_url: String,
    /// Favicon path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Organization (GitHub user or org) owning the deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    /// Project (repository) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Branch receiving deployed builds.
    pub deployment_branch: String,
    /// Trailing slash policy for permalinks. Unset preserves generated routes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_slash: Option<bool>,
    /// How link targets that match no known route are reported.
    pub on_broken_links: ReportingSeverity,
    /// Deprecated; accepted and reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_broken_markdown_links: Option<ReportingSeverity>,
    /// Internationalization settings.
    pub i18n: I18nConfig,
    /// Documentation content settings.
    pub docs: DocsConfig,
    /// Inline sidebar declarations. Takes precedence over `docs.sidebarPath`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebars: Option<SidebarsDocument>,
    /// Navigation bar.
    pub navbar: NavbarConfig,
    /// Page footer.
    pub footer: FooterConfig,
    /// Theme package names.
    pub themes: Vec<String>,
    /// Plugins in declaration order.
    pub plugins: Vec<PluginEntry>,
    /// Client-side redirects.
    pub redirects: Vec<RedirectEntry>,
    /// Output of a previous resolution. Ignored on input.
    #[serde(skip_serializing)]
    pub generated: Option<serde_json::Value>,
}

impl Default for SiteDocument {
    fn default() -> Self {
        Self {
            title: None,
            tagline: String::new(),
            url: None,
            base_url: "/".to_owned(),
            favicon: None,
            organization_name: None,
            project_name: None,
            deployment_branch: "gh-pages".to_owned(),
            trailing_slash: None,
            on_broken_links: ReportingSeverity::Throw,
            on_broken_markdown_links: None,
            i18n: I18nConfig::default(),
            docs: DocsConfig::default(),
            sidebars: None,
            navbar: NavbarConfig::default(),
            footer: FooterConfig::default(),
            themes: Vec::new(),
            plugins: Vec::new(),
            redirects: Vec::new(),
            generated: None,
        }
    }
}

/// Reporting level for a class of problems.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingSeverity {
    /// Do not report.
    Ignore,
    /// Report as a warning.
    Log,
    /// Report as a warning.
    Warn,
    /// Report as an error.
    #[default]
    Throw,
}

/// Internationalization settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct I18nConfig {
    /// Locale used when none is requested.
    pub default_locale: String,
    /// All locales the site is built for.
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            locales: vec!["en".to_owned()],
        }
    }
}

/// Documentation content settings.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocsConfig {
    /// Directory holding the current (unreleased) docs, relative to the site root.
    pub path: String,
    /// Route prefix for all docs, relative to `baseUrl`.
    pub route_base_path: String,
    /// Glob patterns of files that are never docs.
    pub exclude: Vec<String>,
    /// Sidebar declaration file, relative to the site root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_path: Option<String>,
    /// Version served as the default ("latest").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_version: Option<String>,
    /// Per-version options, in declaration order.
    pub versions: IndexMap<String, VersionOptions>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            path: "docs".to_owned(),
            route_base_path: "/".to_owned(),
            exclude: vec!["**/_*.md".to_owned(), "**/_*.mdx".to_owned()],
            sidebar_path: None,
            last_version: None,
            versions: IndexMap::new(),
        }
    }
}

/// Options for one documentation version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VersionOptions {
    /// Route segment for the version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Banner shown on every page of the version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<BannerSetting>,
    /// Label shown in the version dropdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Banner value as declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerSetting {
    /// No banner.
    None,
    /// The version documents unreleased work.
    Unreleased,
    /// The version is outdated.
    Deprecated,
    /// Deprecated spelling of [`BannerSetting::Deprecated`].
    Unmaintained,
}

/// Navigation bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Text shown next to the logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Logo image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<NavbarLogo>,
    /// Items in declaration order.
    pub items: Vec<NavItemDecl>,
}

/// Navbar logo.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavbarLogo {
    /// Alternative text.
    pub alt: String,
    /// Image path.
    pub src: String,
    /// Image path for the dark theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dark: Option<String>,
    /// Link target when clicking the logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Horizontal placement of a navbar item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    /// Left side.
    #[default]
    Left,
    /// Right side.
    Right,
}

/// Navbar item as declared.
///
/// `type` selects the kind: absent or `default` for a plain link,
/// `docsVersionDropdown`, `doc`, or `docSidebar`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItemDecl {
    /// Item kind.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Internal route, relative to `baseUrl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// External URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Raw HTML rendered instead of the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Target doc for `doc` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    /// Target sidebar for `docSidebar` items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_id: Option<String>,
    /// Placement.
    #[serde(default)]
    pub position: NavPosition,
    /// Disable the active-class highlight of dropdowns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown_active_class_disabled: Option<bool>,
    /// Disabled items are dropped during assembly.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Page footer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Footer style (`light` or `dark`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Copyright line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Link columns in declaration order.
    pub links: Vec<FooterColumn>,
}

/// One footer column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FooterColumn {
    /// Column heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Links in declaration order.
    pub items: Vec<FooterItemDecl>,
}

/// One footer link as declared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FooterItemDecl {
    /// Display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Internal route, relative to `baseUrl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// External URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Raw HTML rendered instead of a link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Plugin declaration.
///
/// Accepts either a bare plugin name or `{name, options, enabled}`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(from = "PluginRepr")]
pub struct PluginEntry {
    /// Plugin package name.
    pub name: String,
    /// Option bag, validated against the plugin's accepted keys.
    pub options: IndexMap<String, serde_json::Value>,
    /// Disabled plugins are dropped during assembly.
    pub enabled: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PluginRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        options: IndexMap<String, serde_json::Value>,
        #[serde(default = "default_true")]
        enabled: bool,
    },
}

impl From<PluginRepr> for PluginEntry {
    fn from(repr: PluginRepr) -> Self {
        match repr {
            PluginRepr::Name(name) => Self {
                name,
                options: IndexMap::new(),
                enabled: true,
            },
            PluginRepr::Full {
                name,
                options,
                enabled,
            } => Self {
                name,
                options,
                enabled,
            },
        }
    }
}

/// Client-side redirect.
///
/// `from` accepts a single route or a list of routes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedirectEntry {
    /// Routes that redirect, relative to `baseUrl`.
    #[serde(deserialize_with = "one_or_many")]
    pub from: Vec<String>,
    /// Destination route, relative to `baseUrl`.
    pub to: String,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(route) => vec![route],
        OneOrMany::Many(routes) => routes,
    })
}

fn default_true() -> bool {
    true
}
