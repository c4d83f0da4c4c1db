//! Link and route validation.
//!
//! Every resolved route in the site is registered as a claim. Defining claims
//! (doc permalinks, redirect sources) own a route; linking claims (navbar,
//! footer and sidebar targets) point at one. [`RouteValidator::validate`]
//! reports duplicates, redirect chains and loops, routes outside the base path
//! and links to routes nobody defines.

use std::collections::{HashMap, HashSet};

use docsite_config::{DiagnosticKind, Diagnostics, ReportingSeverity, Severity};

use crate::route::{check_route, route_key};

/// Origin of a route claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClaimKind {
    /// Doc page permalink.
    Page,
    /// Redirect `from` route.
    RedirectFrom,
    /// Navbar item target.
    Navbar,
    /// Footer link target.
    Footer,
    /// Internal sidebar link target.
    Sidebar,
}

impl ClaimKind {
    fn is_defining(self) -> bool {
        matches!(self, Self::Page | Self::RedirectFrom)
    }

    /// Claims of the same namespace must not share a route.
    ///
    /// Sidebar links repeat across versions, so duplicates are checked per
    /// sidebar while it is built.
    fn namespace(self) -> Option<u8> {
        match self {
            Self::Page | Self::RedirectFrom => Some(0),
            Self::Navbar => Some(1),
            Self::Footer => Some(2),
            Self::Sidebar => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Page => "doc page",
            Self::RedirectFrom => "redirect",
            Self::Navbar => "navbar item",
            Self::Footer => "footer link",
            Self::Sidebar => "sidebar link",
        }
    }
}

#[derive(Clone, Debug)]
struct Claim {
    kind: ClaimKind,
    route: String,
    origin: String,
}

#[derive(Clone, Debug)]
struct Redirect {
    from: String,
    to: String,
    origin: String,
}

/// Collects route claims and checks them in one pass.
#[derive(Debug)]
pub struct RouteValidator {
    base_url: String,
    on_broken_links: ReportingSeverity,
    claims: Vec<Claim>,
    redirects: Vec<Redirect>,
    known: Vec<String>,
}

impl RouteValidator {
    /// Create a validator for a site served under `base_url`.
    #[must_use]
    pub fn new(base_url: &str, on_broken_links: ReportingSeverity) -> Self {
        Self {
            base_url: base_url.to_owned(),
            on_broken_links,
            claims: Vec::new(),
            redirects: Vec::new(),
            known: Vec::new(),
        }
    }

    /// Register a resolved route claimed by the entry at `origin`.
    pub fn claim(
        &mut self,
        kind: ClaimKind,
        route: impl Into<String>,
        origin: impl std::fmt::Display,
    ) {
        self.claims.push(Claim {
            kind,
            route: route.into(),
            origin: origin.to_string(),
        });
    }

    /// Register a resolved redirect. The source becomes a defining claim.
    pub fn redirect(&mut self, from: &str, to: &str, origin: impl std::fmt::Display) {
        let origin = origin.to_string();
        self.claim(ClaimKind::RedirectFrom, from, &origin);
        self.redirects.push(Redirect {
            from: from.to_owned(),
            to: to.to_owned(),
            origin,
        });
    }

    /// Register a route that exists without being claimed (a version root).
    pub fn known_route(&mut self, route: impl Into<String>) {
        self.known.push(route.into());
    }

    /// Number of registered claims.
    #[must_use]
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    /// Check all registered routes, appending violations to `diagnostics`.
    pub fn validate(&self, diagnostics: &mut Diagnostics) {
        let mut first_claims: HashMap<(u8, &str), &Claim> = HashMap::new();

        for claim in &self.claims {
            if let Err(message) = check_route(&claim.route) {
                diagnostics.error(&claim.origin, message);
                continue;
            }
            if !self.within_base(&claim.route) {
                diagnostics.error(
                    &claim.origin,
                    format!(
                        "route {:?} does not begin with base path {:?}",
                        claim.route, self.base_url
                    ),
                );
            }

            let Some(namespace) = claim.kind.namespace() else {
                continue;
            };
            let key = (namespace, route_key(&claim.route));
            match first_claims.get(&key) {
                Some(first) => diagnostics.error(
                    &claim.origin,
                    format!(
                        "route {:?} is already claimed by {} at {}",
                        claim.route,
                        first.kind.describe(),
                        first.origin
                    ),
                ),
                None => {
                    first_claims.insert(key, claim);
                }
            }
        }

        // No redirect source may also be a redirect target, or redirects chain
        // and loop.
        let targets: HashSet<&str> = self
            .redirects
            .iter()
            .map(|redirect| route_key(&redirect.to))
            .collect();
        for redirect in &self.redirects {
            let from = route_key(&redirect.from);
            if from == route_key(&redirect.to) {
                diagnostics.error(
                    &redirect.origin,
                    format!("redirect from {:?} points to itself", redirect.from),
                );
            } else if targets.contains(from) {
                diagnostics.error(
                    &redirect.origin,
                    format!(
                        "redirect from {:?} is also the target of another redirect",
                        redirect.from
                    ),
                );
            }
        }

        self.check_broken_links(diagnostics);
    }

    fn within_base(&self, route: &str) -> bool {
        route.starts_with(&self.base_url) || route_key(route) == route_key(&self.base_url)
    }

    /// Report linking claims and redirect targets that match no defined route.
    fn check_broken_links(&self, diagnostics: &mut Diagnostics) {
        let severity = match self.on_broken_links {
            ReportingSeverity::Ignore => return,
            ReportingSeverity::Log | ReportingSeverity::Warn => Severity::Warning,
            ReportingSeverity::Throw => Severity::Error,
        };

        let defined: HashSet<&str> = self
            .claims
            .iter()
            .filter(|claim| claim.kind.is_defining())
            .map(|claim| route_key(&claim.route))
            .chain(self.known.iter().map(|route| route_key(route)))
            .collect();

        let targets = self
            .claims
            .iter()
            .filter(|claim| !claim.kind.is_defining())
            .map(|claim| (claim.route.as_str(), claim.origin.as_str()))
            .chain(
                self.redirects
                    .iter()
                    .map(|redirect| (redirect.to.as_str(), redirect.origin.as_str())),
            );

        for (route, origin) in targets {
            if !defined.contains(route_key(route)) {
                diagnostics.push(
                    severity,
                    DiagnosticKind::Validation,
                    origin,
                    format!("broken link: no page or redirect serves {route:?}"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn validate(validator: &RouteValidator) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        validator.validate(&mut diagnostics);
        diagnostics
    }

    fn paths(diagnostics: &Diagnostics) -> Vec<&str> {
        diagnostics.iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn test_distinct_routes_pass() {
        let mut validator = RouteValidator::new("/spawn/", ReportingSeverity::Throw);
        validator.claim(ClaimKind::Page, "/spawn/v0.50/intro", "pages[0]");
        validator.claim(ClaimKind::Page, "/spawn/v0.50/build", "pages[1]");
        validator.known_route("/spawn/v0.50/");
        validator.redirect("/spawn/", "/spawn/v0.50/", "redirects[0].from[0]");
        validator.redirect("/spawn/docs", "/spawn/v0.50/", "redirects[0].from[1]");
        validator.claim(ClaimKind::Navbar, "/spawn/v0.50/intro", "navbar.items[0]");

        assert!(validate(&validator).is_empty());
        assert_eq!(validator.claim_count(), 5);
    }

    #[test]
    fn test_duplicate_defining_claims() {
        let mut validator = RouteValidator::new("/", ReportingSeverity::Throw);
        validator.claim(ClaimKind::Page, "/intro", "pages[0]");
        validator.redirect("/intro/", "/build", "redirects[0].from[0]");
        validator.claim(ClaimKind::Page, "/build", "pages[1]");

        let diagnostics = validate(&validator);
        assert_eq!(paths(&diagnostics), vec!["redirects[0].from[0]"]);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.iter().next().unwrap().message.contains("pages[0]"));
    }

    #[test]
    fn test_duplicate_links_per_surface() {
        let mut validator = RouteValidator::new("/", ReportingSeverity::Throw);
        validator.claim(ClaimKind::Page, "/intro", "pages[0]");
        validator.claim(ClaimKind::Navbar, "/intro", "navbar.items[0]");
        validator.claim(ClaimKind::Footer, "/intro", "footer.links[0].items[0]");
        validator.claim(ClaimKind::Navbar, "/intro#top", "navbar.items[1]");

        let diagnostics = validate(&validator);
        assert_eq!(paths(&diagnostics), vec!["navbar.items[1]"]);
    }

    #[test]
    fn test_sidebar_links_repeat_across_versions() {
        let mut validator = RouteValidator::new("/spawn/", ReportingSeverity::Throw);
        validator.claim(ClaimKind::Page, "/spawn/v0.50/intro/", "pages[0]");
        validator.claim(ClaimKind::Sidebar, "/spawn/v0.50/intro", r#"sidebars["main"][0].href"#);
        validator.claim(
            ClaimKind::Sidebar,
            "/spawn/v0.50/intro",
            r#"docs.versions["v0.47.x"].sidebars["main"][0].href"#,
        );
        validator.claim(ClaimKind::Sidebar, "/spawn/nowhere", r#"sidebars["main"][1].href"#);

        let diagnostics = validate(&validator);
        assert_eq!(paths(&diagnostics), vec![r#"sidebars["main"][1].href"#]);
        assert!(diagnostics.iter().next().unwrap().message.starts_with("broken link"));
    }

    #[test]
    fn test_self_redirect() {
        let mut validator = RouteValidator::new("/", ReportingSeverity::Throw);
        validator.redirect("/docs", "/docs/", "redirects[0].from[0]");

        let diagnostics = validate(&validator);
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.iter().next().unwrap().message.contains("itself"));
    }

    #[test]
    fn test_redirect_loop() {
        let mut validator = RouteValidator::new("/spawn/", ReportingSeverity::Throw);
        validator.redirect("/spawn/a", "/spawn/b", "redirects[0].from[0]");
        validator.redirect("/spawn/b", "/spawn/a", "redirects[1].from[0]");

        let diagnostics = validate(&validator);
        assert_eq!(
            paths(&diagnostics),
            vec!["redirects[0].from[0]", "redirects[1].from[0]"]
        );
        assert!(diagnostics.iter().all(|d| d.message.contains("target of another redirect")));
    }

    #[test]
    fn test_redirect_chain() {
        let mut validator = RouteValidator::new("/", ReportingSeverity::Throw);
        validator.claim(ClaimKind::Page, "/v0.50/", "pages[0]");
        validator.redirect("/old", "/docs/", "redirects[0].from[0]");
        validator.redirect("/docs", "/v0.50/", "redirects[1].from[0]");

        let diagnostics = validate(&validator);
        assert_eq!(paths(&diagnostics), vec!["redirects[1].from[0]"]);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn test_route_outside_base() {
        let mut validator = RouteValidator::new("/spawn/", ReportingSeverity::Ignore);
        validator.claim(ClaimKind::Page, "/other/intro", "pages[0]");
        validator.claim(ClaimKind::Page, "/spawn", "pages[1]");

        assert_eq!(paths(&validate(&validator)), vec!["pages[0]"]);
    }

    #[test]
    fn test_malformed_route() {
        let mut validator = RouteValidator::new("/", ReportingSeverity::Ignore);
        validator.claim(ClaimKind::Page, "/my page", "pages[0]");

        let diagnostics = validate(&validator);
        assert!(diagnostics.iter().next().unwrap().message.contains("whitespace"));
    }

    #[test]
    fn test_broken_link_severity() {
        let build = |severity| {
            let mut validator = RouteValidator::new("/", severity);
            validator.claim(ClaimKind::Footer, "/missing", "footer.links[0].items[0]");
            validate(&validator)
        };

        assert_eq!(build(ReportingSeverity::Throw).error_count(), 1);
        assert_eq!(build(ReportingSeverity::Warn).warning_count(), 1);
        assert_eq!(build(ReportingSeverity::Log).warning_count(), 1);
        assert!(build(ReportingSeverity::Ignore).is_empty());
    }

    #[test]
    fn test_redirect_to_unknown_route_is_broken() {
        let mut validator = RouteValidator::new("/", ReportingSeverity::Throw);
        validator.redirect("/docs", "/v0.50/", "redirects[0].from[0]");

        let diagnostics = validate(&validator);
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.iter().next().unwrap().message.starts_with("broken link"));
    }
}
