//! Navbar and footer resolution.
//!
//! Internal targets (`to`) are joined with the base path and registered as
//! linking claims. External targets (`href`) are only checked for shape.

use docsite_config::{
    Diagnostics, FieldPath, FooterConfig, FooterItemDecl, NavItemDecl, NavPosition, NavbarConfig,
};
use serde::Serialize;

use crate::docs::DocPage;
use crate::route::{check_route, check_url, join_route};
use crate::sidebar::{Sidebars, first_doc};
use crate::validate::{ClaimKind, RouteValidator};

/// Resolved navbar item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NavKind {
    /// Plain link.
    Link,
    /// Version switcher.
    DocsVersionDropdown,
    /// Link to a doc of the latest version.
    Doc,
    /// Link to the first doc of a sidebar of the latest version.
    DocSidebar,
}

/// A resolved navbar item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    /// Item kind.
    pub kind: NavKind,
    /// Display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Resolved internal route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// External URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Raw HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Placement.
    pub position: NavPosition,
}

/// A resolved footer column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterSection {
    /// Column heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Links in order.
    pub items: Vec<FooterLink>,
}

/// A resolved footer link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    /// Display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Resolved internal route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// External URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Raw HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// Docs of the latest version, for `doc` and `docSidebar` navbar items.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LatestDocs<'a> {
    pub version: &'a str,
    pub pages: &'a [DocPage],
    pub sidebars: &'a Sidebars,
}

/// Inputs shared by navbar and footer resolution.
pub(crate) struct LinkContext<'a> {
    pub base_url: &'a str,
    /// `None` when no version is marked latest (already reported).
    pub latest: Option<LatestDocs<'a>>,
}

/// Resolve navbar items, dropping disabled ones.
pub(crate) fn resolve_navbar(
    navbar: &NavbarConfig,
    ctx: &LinkContext<'_>,
    validator: &mut RouteValidator,
    diagnostics: &mut Diagnostics,
) -> Vec<NavEntry> {
    let root = FieldPath::new("navbar");
    if let Some(href) = navbar.logo.as_ref().and_then(|logo| logo.href.as_deref())
        && let Err(message) = check_href(href)
    {
        diagnostics.error(root.field("logo").field("href"), message);
    }

    let items = root.field("items");
    navbar
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.enabled)
        .filter_map(|(i, item)| resolve_nav_item(item, &items.index(i), ctx, validator, diagnostics))
        .collect()
}

fn resolve_nav_item(
    item: &NavItemDecl,
    path: &FieldPath,
    ctx: &LinkContext<'_>,
    validator: &mut RouteValidator,
    diagnostics: &mut Diagnostics,
) -> Option<NavEntry> {
    let entry = |kind, label: Option<String>, to, href| NavEntry {
        kind,
        label,
        to,
        href,
        html: item.html.clone(),
        position: item.position,
    };

    match item.kind.as_deref() {
        None | Some("default") => {
            if item.label.is_none() && item.html.is_none() {
                diagnostics.error(path, "navbar link needs a label or html");
            }
            let (to, href) = resolve_target(
                item.to.as_deref(),
                item.href.as_deref(),
                path,
                ctx.base_url,
                diagnostics,
            )?;
            if let Some(route) = &to {
                validator.claim(ClaimKind::Navbar, route.clone(), path);
            }
            Some(entry(NavKind::Link, item.label.clone(), to, href))
        }
        Some("docsVersionDropdown") => {
            if item.to.is_some() || item.href.is_some() {
                diagnostics.warning(path, "version dropdown ignores to and href");
            }
            Some(entry(NavKind::DocsVersionDropdown, item.label.clone(), None, None))
        }
        Some("doc") => {
            let Some(doc_id) = &item.doc_id else {
                diagnostics.error(path.field("docId"), "doc item needs a docId");
                return None;
            };
            let latest = ctx.latest?;
            let Some(page) = latest.pages.iter().find(|page| &page.id == doc_id) else {
                diagnostics.error(
                    path.field("docId"),
                    format!(
                        "doc id {doc_id:?} not found in latest version {:?}",
                        latest.version
                    ),
                );
                return None;
            };
            validator.claim(ClaimKind::Navbar, page.permalink.clone(), path);
            let label = item.label.clone().or_else(|| Some(page.label().to_owned()));
            Some(entry(NavKind::Doc, label, Some(page.permalink.clone()), None))
        }
        Some("docSidebar") => {
            let Some(sidebar_id) = &item.sidebar_id else {
                diagnostics.error(path.field("sidebarId"), "docSidebar item needs a sidebarId");
                return None;
            };
            let latest = ctx.latest?;
            let first = latest
                .sidebars
                .get(sidebar_id)
                .and_then(|nodes| first_doc(nodes));
            let Some((_, permalink)) = first else {
                diagnostics.error(
                    path.field("sidebarId"),
                    format!(
                        "sidebar {sidebar_id:?} is unknown or has no docs in latest version {:?}",
                        latest.version
                    ),
                );
                return None;
            };
            validator.claim(ClaimKind::Navbar, permalink, path);
            Some(entry(
                NavKind::DocSidebar,
                item.label.clone(),
                Some(permalink.to_owned()),
                None,
            ))
        }
        Some(other) => {
            diagnostics.error(
                path.field("type"),
                format!("unknown navbar item type {other:?}"),
            );
            None
        }
    }
}

/// Resolve footer columns.
pub(crate) fn resolve_footer(
    footer: &FooterConfig,
    base_url: &str,
    validator: &mut RouteValidator,
    diagnostics: &mut Diagnostics,
) -> Vec<FooterSection> {
    let links = FieldPath::new("footer").field("links");
    footer
        .links
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let path = links.index(i);
            if column.title.is_none() && column.items.is_empty() {
                diagnostics.warning(&path, "footer column has no title and no items");
            }
            let items = path.field("items");
            FooterSection {
                title: column.title.clone(),
                items: column
                    .items
                    .iter()
                    .enumerate()
                    .filter_map(|(j, item)| {
                        resolve_footer_item(item, &items.index(j), base_url, validator, diagnostics)
                    })
                    .collect(),
            }
        })
        .collect()
}

fn resolve_footer_item(
    item: &FooterItemDecl,
    path: &FieldPath,
    base_url: &str,
    validator: &mut RouteValidator,
    diagnostics: &mut Diagnostics,
) -> Option<FooterLink> {
    if item.html.is_some() {
        if item.to.is_some() || item.href.is_some() {
            diagnostics.error(path, "footer item cannot combine html with to or href");
        }
        return Some(FooterLink {
            label: item.label.clone(),
            to: None,
            href: None,
            html: item.html.clone(),
        });
    }

    if item.label.is_none() {
        diagnostics.error(path.field("label"), "footer link needs a label");
    }
    let (to, href) = resolve_target(
        item.to.as_deref(),
        item.href.as_deref(),
        path,
        base_url,
        diagnostics,
    )?;
    if let Some(route) = &to {
        validator.claim(ClaimKind::Footer, route.clone(), path);
    }
    Some(FooterLink {
        label: item.label.clone(),
        to,
        href,
        html: None,
    })
}

/// Resolve a `to`/`href` pair; exactly one must be set.
fn resolve_target(
    to: Option<&str>,
    href: Option<&str>,
    path: &FieldPath,
    base_url: &str,
    diagnostics: &mut Diagnostics,
) -> Option<(Option<String>, Option<String>)> {
    match (to, href) {
        (Some(to), None) => match check_route(to) {
            Ok(()) => Some((Some(join_route(base_url, to)), None)),
            Err(message) => {
                diagnostics.error(path.field("to"), message);
                None
            }
        },
        (None, Some(href)) => match check_href(href) {
            Ok(()) => Some((None, Some(href.to_owned()))),
            Err(message) => {
                diagnostics.error(path.field("href"), message);
                None
            }
        },
        (Some(_), Some(_)) => {
            diagnostics.error(path, "declare either to or href, not both");
            None
        }
        (None, None) => {
            diagnostics.error(path, "link needs a to or href target");
            None
        }
    }
}

/// `href` may be a site-absolute path or an external URL.
fn check_href(href: &str) -> Result<(), String> {
    if href.starts_with('/') {
        check_route(href)
    } else {
        check_url(href)
    }
}
