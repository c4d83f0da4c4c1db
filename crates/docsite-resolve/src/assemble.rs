//! Site assembly.
//!
//! [`SiteAssembler`] holds a parsed document and a [`DocSource`]. Calling
//! [`SiteAssembler::assemble`] validates everything in one pass and ends in
//! exactly one of two terminal states:
//!
//! - [`Resolved`]: no error-severity diagnostic; carries an immutable
//!   [`ResolvedSite`] shared through an [`Arc`];
//! - [`Rejected`]: at least one error; carries only the diagnostics.
//!
//! Versions are resolved in parallel on the rayon pool. Each version owns its
//! diagnostics and results, which are merged in version order afterwards, so
//! the outcome does not depend on scheduling.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use docsite_config::{
    Diagnostics, FieldPath, Format, LoadedConfig, RedirectEntry, SidebarsDocument, SiteDocument,
    default_sidebars,
};
use docsite_source::{DocSource, FsSource};
use glob::Pattern;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::docs::{DocPage, VersionContent, compile_excludes};
use crate::links::{
    FooterSection, LatestDocs, LinkContext, NavEntry, resolve_footer, resolve_navbar,
};
use crate::plugins::{ResolvedPlugin, plugin_redirects, resolve_plugins};
use crate::route::{
    TrailingSlash, check_base_url, check_route, check_url, coerce_base_url, join_route,
    route_key,
};
use crate::sidebar::{SidebarLink, SidebarTreeBuilder, Sidebars, link_pages};
use crate::validate::{ClaimKind, RouteValidator};
use crate::version::{DocVersion, VersionResolver};

/// Extensions tried for per-version sidebar files, in order.
const SIDEBAR_EXTENSIONS: &[&str] = &["json", "toml", "yaml", "yml"];

/// Builds a [`ResolvedSite`] from a document and a document source.
pub struct SiteAssembler {
    document: SiteDocument,
    source: Arc<dyn DocSource>,
    diagnostics: Diagnostics,
}

impl SiteAssembler {
    /// Create an assembler reading docs from `source`.
    #[must_use]
    pub fn new(document: SiteDocument, source: Arc<dyn DocSource>) -> Self {
        Self {
            document,
            source,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Create an assembler for a loaded config, reading docs from its root
    /// directory and carrying over load diagnostics.
    #[must_use]
    pub fn from_loaded(loaded: LoadedConfig) -> Self {
        let source = Arc::new(FsSource::new(loaded.root_dir));
        Self::new(loaded.document, source).with_diagnostics(loaded.diagnostics)
    }

    /// Prepend diagnostics gathered before assembly (parsing, env expansion).
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        let mut merged = diagnostics;
        merged.extend(self.diagnostics);
        self.diagnostics = merged;
        self
    }

    /// Validate and resolve the site.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] with the full report if any diagnostic has error
    /// severity.
    pub fn assemble(self) -> Result<Resolved, Rejected> {
        let Self {
            mut document,
            source,
            mut diagnostics,
        } = self;
        debug!("validating site configuration");

        check_site_fields(&document, &mut diagnostics);
        let base_url = match check_base_url(&document.base_url) {
            Ok(()) => document.base_url.clone(),
            Err(message) => {
                diagnostics.error("baseUrl", message);
                let coerced = coerce_base_url(&document.base_url);
                warn!(base_url = %coerced, "continuing with coerced base path");
                coerced
            }
        };
        let trailing_slash = TrailingSlash::from(document.trailing_slash);

        let versions = VersionResolver::new(&document.docs, &base_url).resolve(&mut diagnostics);
        let excludes = compile_excludes(&document.docs.exclude, &mut diagnostics);
        let (declared, origin) = load_sidebars(&document, source.as_ref(), &mut diagnostics);

        let source_ref = source.as_ref();
        let builds: Vec<VersionBuild> = versions
            .par_iter()
            .map(|version| {
                build_version(
                    source_ref,
                    version,
                    &declared,
                    &origin,
                    &excludes,
                    &base_url,
                    trailing_slash,
                )
            })
            .collect();

        let mut validator = RouteValidator::new(&base_url, document.on_broken_links);
        let ctx = LinkContext {
            base_url: &base_url,
            latest: versions
                .iter()
                .zip(&builds)
                .find(|(version, _)| version.is_latest)
                .map(|(version, build)| LatestDocs {
                    version: &version.id,
                    pages: &build.pages,
                    sidebars: &build.sidebars,
                }),
        };
        let navbar = resolve_navbar(&document.navbar, &ctx, &mut validator, &mut diagnostics);
        let footer = resolve_footer(&document.footer, &base_url, &mut validator, &mut diagnostics);

        let mut sidebars = IndexMap::new();
        let mut pages = Vec::new();
        let mut sidebar_links = SidebarLinkClaims::default();
        for (version, build) in versions.iter().zip(builds) {
            diagnostics.extend(build.diagnostics);
            validator.known_route(version.route.clone());
            for page in &build.pages {
                validator.claim(ClaimKind::Page, page.permalink.clone(), &page.source);
            }
            sidebar_links.claim(build.links, &mut validator, &mut diagnostics);
            sidebars.insert(version.id.clone(), build.sidebars);
            pages.extend(build.pages);
        }

        let plugins = resolve_plugins(&document.plugins, &mut diagnostics);
        let mut redirect_lists = vec![(FieldPath::new("redirects"), document.redirects.clone())];
        redirect_lists.extend(plugin_redirects(&plugins, &mut diagnostics));
        let redirects = resolve_redirects(
            &redirect_lists,
            &base_url,
            &mut validator,
            &mut diagnostics,
        );

        validator.validate(&mut diagnostics);

        if diagnostics.has_errors() {
            info!(
                errors = diagnostics.error_count(),
                warnings = diagnostics.warning_count(),
                "site configuration rejected"
            );
            return Err(Rejected { diagnostics });
        }

        let routes = route_table(&versions, &pages, &redirects);
        document.sidebars = Some(declared);
        document.docs.sidebar_path = None;
        document.generated = None;

        info!(
            versions = versions.len(),
            pages = pages.len(),
            warnings = diagnostics.warning_count(),
            "site configuration resolved"
        );
        let site = ResolvedSite {
            document,
            generated: Generated {
                versions,
                sidebars,
                pages,
                navbar,
                footer,
                plugins,
                redirects,
                routes,
            },
        };
        Ok(Resolved {
            site: Arc::new(site),
            diagnostics,
        })
    }
}

/// Terminal success state.
#[derive(Debug)]
pub struct Resolved {
    site: Arc<ResolvedSite>,
    diagnostics: Diagnostics,
}

impl Resolved {
    /// Shared handle to the resolved site.
    #[must_use]
    pub fn site(&self) -> Arc<ResolvedSite> {
        Arc::clone(&self.site)
    }

    /// Warnings reported during resolution.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Split into the site and its warnings.
    #[must_use]
    pub fn into_parts(self) -> (Arc<ResolvedSite>, Diagnostics) {
        (self.site, self.diagnostics)
    }
}

/// Terminal failure state. Nothing may be rendered from a rejected site.
#[derive(Debug)]
pub struct Rejected {
    diagnostics: Diagnostics,
}

impl Rejected {
    /// Full report, errors and warnings.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume into the report.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "site configuration rejected with {} error(s)",
            self.diagnostics.error_count()
        )
    }
}

impl std::error::Error for Rejected {}

/// The immutable resolved site.
///
/// Serializes to the normalized input document plus a `generated` object,
/// which can be loaded again as input.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedSite {
    #[serde(flatten)]
    document: SiteDocument,
    generated: Generated,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct Generated {
    versions: Vec<DocVersion>,
    sidebars: IndexMap<String, Sidebars>,
    pages: Vec<DocPage>,
    navbar: Vec<NavEntry>,
    footer: Vec<FooterSection>,
    plugins: Vec<ResolvedPlugin>,
    redirects: Vec<ResolvedRedirect>,
    routes: Vec<RouteEntry>,
}

/// A redirect with resolved routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedRedirect {
    /// Source routes.
    pub from: Vec<String>,
    /// Destination route.
    pub to: String,
}

/// What serves a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Version root.
    Version,
    /// Doc page.
    Page,
    /// Client-side redirect.
    Redirect,
}

/// One entry of the route table.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RouteEntry {
    /// Resolved route.
    pub route: String,
    /// What serves it.
    pub kind: RouteKind,
    /// Version id, `version/doc id`, or redirect destination.
    pub target: String,
}

impl ResolvedSite {
    /// Normalized document: defaults explicit, sidebars inline.
    #[must_use]
    pub fn document(&self) -> &SiteDocument {
        &self.document
    }

    /// Base path the site is served under.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.document.base_url
    }

    /// Versions in display order.
    #[must_use]
    pub fn versions(&self) -> &[DocVersion] {
        &self.generated.versions
    }

    /// The version served by default.
    #[must_use]
    pub fn latest_version(&self) -> Option<&DocVersion> {
        self.generated.versions.iter().find(|v| v.is_latest)
    }

    /// Sidebars of a version.
    #[must_use]
    pub fn sidebars(&self, version: &str) -> Option<&Sidebars> {
        self.generated.sidebars.get(version)
    }

    /// All doc pages, grouped by version in version order.
    #[must_use]
    pub fn pages(&self) -> &[DocPage] {
        &self.generated.pages
    }

    /// Look up a page by version and doc id.
    #[must_use]
    pub fn page(&self, version: &str, id: &str) -> Option<&DocPage> {
        self.generated
            .pages
            .iter()
            .find(|page| page.version == version && page.id == id)
    }

    /// Enabled navbar items.
    #[must_use]
    pub fn navbar(&self) -> &[NavEntry] {
        &self.generated.navbar
    }

    /// Footer columns.
    #[must_use]
    pub fn footer(&self) -> &[FooterSection] {
        &self.generated.footer
    }

    /// Enabled plugins.
    #[must_use]
    pub fn plugins(&self) -> &[ResolvedPlugin] {
        &self.generated.plugins
    }

    /// All redirects: top-level first, then plugin-declared.
    #[must_use]
    pub fn redirects(&self) -> &[ResolvedRedirect] {
        &self.generated.redirects
    }

    /// Route table sorted by route.
    #[must_use]
    pub fn routes(&self) -> &[RouteEntry] {
        &self.generated.routes
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Per-version results, produced independently on the rayon pool.
struct VersionBuild {
    sidebars: Sidebars,
    links: Vec<SidebarLink>,
    pages: Vec<DocPage>,
    diagnostics: Diagnostics,
}

fn build_version(
    source: &dyn DocSource,
    version: &DocVersion,
    shared: &SidebarsDocument,
    shared_origin: &FieldPath,
    excludes: &[Pattern],
    base_url: &str,
    trailing_slash: TrailingSlash,
) -> VersionBuild {
    let mut diagnostics = Diagnostics::new();
    let mut content =
        VersionContent::discover(source, version, excludes, trailing_slash, &mut diagnostics);

    let versioned = versioned_sidebars(source, version, &mut diagnostics);
    let (declared, origin) = match &versioned {
        Some((declared, origin)) => (declared, origin),
        None => (shared, shared_origin),
    };
    let mut links = Vec::new();
    let sidebars = SidebarTreeBuilder::new(&content, version, base_url).build(
        declared,
        origin,
        &mut links,
        &mut diagnostics,
    );
    link_pages(&sidebars, &mut content);

    debug!(
        version = %version.id,
        sidebars = sidebars.len(),
        errors = diagnostics.error_count(),
        "built version"
    );
    VersionBuild {
        sidebars,
        links,
        pages: content.into_pages(),
        diagnostics,
    }
}

/// Sidebar links seen so far across versions.
///
/// A shared sidebar is built once per version, so each declaration is claimed
/// once. Two links of one sidebar to the same route are an error.
#[derive(Default)]
struct SidebarLinkClaims {
    claimed: HashSet<FieldPath>,
    first: HashMap<(FieldPath, String), FieldPath>,
}

impl SidebarLinkClaims {
    fn claim(
        &mut self,
        links: Vec<SidebarLink>,
        validator: &mut RouteValidator,
        diagnostics: &mut Diagnostics,
    ) {
        for link in links {
            if !self.claimed.insert(link.origin.clone()) {
                continue;
            }
            let key = (link.sidebar, route_key(&link.route).to_owned());
            match self.first.get(&key) {
                Some(first) => diagnostics.error(
                    &link.origin,
                    format!(
                        "route {:?} is already linked from this sidebar at {first}",
                        link.route
                    ),
                ),
                None => {
                    self.first.insert(key, link.origin.clone());
                    validator.claim(ClaimKind::Sidebar, link.route, link.origin);
                }
            }
        }
    }
}

/// Sidebar declaration used by every version without its own file.
fn load_sidebars(
    document: &SiteDocument,
    source: &dyn DocSource,
    diagnostics: &mut Diagnostics,
) -> (SidebarsDocument, FieldPath) {
    if let Some(inline) = &document.sidebars {
        return (inline.clone(), FieldPath::new("sidebars"));
    }
    let Some(path) = &document.docs.sidebar_path else {
        return (default_sidebars(), FieldPath::new("sidebars"));
    };
    let field = FieldPath::new("docs").field("sidebarPath");
    let declared = read_sidebars_file(source, path, &field, diagnostics).unwrap_or_default();
    (declared, FieldPath::new(path))
}

/// `versioned_sidebars/version-<id>-sidebars.<ext>`, if present.
fn versioned_sidebars(
    source: &dyn DocSource,
    version: &DocVersion,
    diagnostics: &mut Diagnostics,
) -> Option<(SidebarsDocument, FieldPath)> {
    if version.is_current() {
        return None;
    }
    let path = SIDEBAR_EXTENSIONS
        .iter()
        .map(|ext| format!("versioned_sidebars/version-{}-sidebars.{ext}", version.id))
        .find(|path| source.exists(path))?;
    let declared = read_sidebars_file(source, &path, &FieldPath::new(&path), diagnostics)?;
    Some((declared, FieldPath::new(&path)))
}

fn read_sidebars_file(
    source: &dyn DocSource,
    path: &str,
    field: &FieldPath,
    diagnostics: &mut Diagnostics,
) -> Option<SidebarsDocument> {
    let Some(format) = Format::from_path(Path::new(path)) else {
        diagnostics.error(
            field,
            format!("unsupported sidebar file format: {path} (expected .json, .toml, .yaml or .yml)"),
        );
        return None;
    };
    let content = source
        .read(path)
        .inspect_err(|e| diagnostics.filesystem_error(field, format!("cannot read sidebars: {e}")))
        .ok()?;
    docsite_config::parse_str(&content, format)
        .inspect_err(|e| diagnostics.error(field, format!("invalid sidebars file {path}: {e}")))
        .ok()
}

/// Site-wide scalar fields.
fn check_site_fields(document: &SiteDocument, diagnostics: &mut Diagnostics) {
    let required = [
        ("title", &document.title),
        ("url", &document.url),
        ("organizationName", &document.organization_name),
        ("projectName", &document.project_name),
    ];
    for (key, value) in required {
        match value.as_deref() {
            None => diagnostics.warning(key, format!("{key} is not set")),
            Some(v) if v.trim().is_empty() => diagnostics.error(key, format!("{key} is empty")),
            Some(_) => {}
        }
    }
    if let Some(url) = document.url.as_deref().filter(|u| !u.trim().is_empty())
        && let Err(message) = check_url(url)
    {
        diagnostics.error("url", message);
    }
    if document.deployment_branch.trim().is_empty() {
        diagnostics.error("deploymentBranch", "deploymentBranch is empty");
    }

    let i18n = FieldPath::new("i18n");
    let locales = &document.i18n.locales;
    if locales.is_empty() {
        diagnostics.error(i18n.field("locales"), "at least one locale is required");
    } else if !locales.contains(&document.i18n.default_locale) {
        diagnostics.error(
            i18n.field("defaultLocale"),
            format!(
                "default locale {:?} is not listed in i18n.locales",
                document.i18n.default_locale
            ),
        );
    }
    for (i, locale) in locales.iter().enumerate() {
        if locales[..i].contains(locale) {
            diagnostics.error(
                i18n.field("locales").index(i),
                format!("locale {locale:?} is listed twice"),
            );
        }
    }

    let docs = FieldPath::new("docs");
    if document.docs.path.trim().is_empty() {
        diagnostics.error(docs.field("path"), "docs path is empty");
    }
    let route_base = document.docs.route_base_path.trim_matches('/');
    if !route_base.is_empty()
        && let Err(message) = check_route(&format!("/{route_base}/"))
    {
        diagnostics.error(docs.field("routeBasePath"), message);
    }

    for (i, theme) in document.themes.iter().enumerate() {
        if theme.trim().is_empty() {
            diagnostics.error(FieldPath::new("themes").index(i), "theme name is empty");
        }
    }
}

fn resolve_redirects(
    lists: &[(FieldPath, Vec<RedirectEntry>)],
    base_url: &str,
    validator: &mut RouteValidator,
    diagnostics: &mut Diagnostics,
) -> Vec<ResolvedRedirect> {
    let mut resolved = Vec::new();
    for (list_path, entries) in lists {
        for (i, entry) in entries.iter().enumerate() {
            let path = list_path.index(i);
            let mut valid = true;
            if let Err(message) = check_route(&entry.to) {
                diagnostics.error(path.field("to"), message);
                valid = false;
            }
            if entry.from.is_empty() {
                diagnostics.error(path.field("from"), "redirect has no source route");
                valid = false;
            }
            for (j, from) in entry.from.iter().enumerate() {
                if let Err(message) = check_route(from) {
                    diagnostics.error(path.field("from").index(j), message);
                    valid = false;
                }
            }
            if !valid {
                continue;
            }

            let to = join_route(base_url, &entry.to);
            let from: Vec<String> = entry
                .from
                .iter()
                .map(|from| join_route(base_url, from))
                .collect();
            for (j, route) in from.iter().enumerate() {
                validator.redirect(route, &to, path.field("from").index(j));
            }
            resolved.push(ResolvedRedirect { from, to });
        }
    }
    resolved
}

fn route_table(
    versions: &[DocVersion],
    pages: &[DocPage],
    redirects: &[ResolvedRedirect],
) -> Vec<RouteEntry> {
    let mut routes: Vec<RouteEntry> = versions
        .iter()
        .map(|version| RouteEntry {
            route: version.route.clone(),
            kind: RouteKind::Version,
            target: version.id.clone(),
        })
        .chain(pages.iter().map(|page| RouteEntry {
            route: page.permalink.clone(),
            kind: RouteKind::Page,
            target: format!("{}/{}", page.version, page.id),
        }))
        .chain(redirects.iter().flat_map(|redirect| {
            redirect.from.iter().map(|from| RouteEntry {
                route: from.clone(),
                kind: RouteKind::Redirect,
                target: redirect.to.clone(),
            })
        }))
        .collect();
    routes.sort();
    routes
}
