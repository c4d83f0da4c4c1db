//! Documentation version resolution.
//!
//! Turns `docs.versions` and `docs.lastVersion` into an ordered list of
//! [`DocVersion`]s with routes, content directories and banners filled in.

use std::collections::HashMap;

use docsite_config::{BannerSetting, Diagnostics, DocsConfig, FieldPath};
use serde::Serialize;
use tracing::debug;

use crate::route::{check_route, join_segments};

/// Identifier of the unreleased version backed by `docs.path`.
pub const CURRENT_VERSION: &str = "current";

/// Page-level notice describing a version's maturity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    /// No banner.
    #[default]
    None,
    /// Unreleased work.
    Unreleased,
    /// Outdated version.
    Deprecated,
}

/// A resolved documentation version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocVersion {
    /// Version identifier (`current`, `v0.50.x`).
    pub id: String,
    /// Label shown in the version dropdown.
    pub label: String,
    /// Route segment below the docs route base (`""` for the latest version).
    pub path: String,
    /// Resolved route of the version root, always ending with `/`.
    pub route: String,
    /// Content directory relative to the site root.
    pub content_dir: String,
    /// Banner shown on the version's pages.
    pub banner: Banner,
    /// True for the version served by default.
    pub is_latest: bool,
}

impl DocVersion {
    /// True for the unreleased version.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.id == CURRENT_VERSION
    }

    /// Field path of this version's declaration.
    #[must_use]
    pub fn field_path(&self) -> FieldPath {
        FieldPath::new("docs").field("versions").key(&self.id)
    }
}

/// Resolves declared versions against the site base path.
#[derive(Debug)]
pub struct VersionResolver<'a> {
    docs: &'a DocsConfig,
    base_url: &'a str,
}

impl<'a> VersionResolver<'a> {
    /// Create a resolver for `docs` served under `base_url`.
    #[must_use]
    pub fn new(docs: &'a DocsConfig, base_url: &'a str) -> Self {
        Self { docs, base_url }
    }

    /// Resolve versions in output order.
    ///
    /// An unknown `lastVersion` is reported and leaves no version marked
    /// latest, so later stages can still report their own problems.
    pub fn resolve(&self, diagnostics: &mut Diagnostics) -> Vec<DocVersion> {
        if self.docs.versions.is_empty() {
            return self.resolve_unversioned(diagnostics);
        }

        let latest = self.latest_id(diagnostics);
        let mut versions: Vec<DocVersion> = self
            .docs
            .versions
            .keys()
            .map(|id| self.resolve_one(id, latest == Some(id.as_str()), diagnostics))
            .collect();

        // current first if present, else latest; stable for the rest
        let lead = if self.docs.versions.contains_key(CURRENT_VERSION) {
            Some(CURRENT_VERSION)
        } else {
            latest
        };
        if let Some(position) = lead.and_then(|lead| versions.iter().position(|v| v.id == lead)) {
            let version = versions.remove(position);
            versions.insert(0, version);
        }

        self.check_unique_routes(&versions, diagnostics);
        for version in &versions {
            debug!(
                version = %version.id,
                route = %version.route,
                latest = version.is_latest,
                "resolved version"
            );
        }
        versions
    }

    fn resolve_unversioned(&self, diagnostics: &mut Diagnostics) -> Vec<DocVersion> {
        if let Some(last) = &self.docs.last_version
            && last != CURRENT_VERSION
        {
            diagnostics.error(
                FieldPath::new("docs").field("lastVersion"),
                format!("lastVersion {last:?} is not declared in docs.versions"),
            );
            return Vec::new();
        }
        vec![DocVersion {
            id: CURRENT_VERSION.to_owned(),
            label: "Next".to_owned(),
            path: String::new(),
            route: join_segments(&[self.base_url, &self.docs.route_base_path]),
            content_dir: self.docs.path.clone(),
            banner: Banner::None,
            is_latest: true,
        }]
    }

    fn latest_id(&self, diagnostics: &mut Diagnostics) -> Option<&'a str> {
        match &self.docs.last_version {
            Some(last) => {
                let found = self.docs.versions.get_key_value(last.as_str());
                if found.is_none() {
                    diagnostics.error(
                        FieldPath::new("docs").field("lastVersion"),
                        format!("lastVersion {last:?} is not declared in docs.versions"),
                    );
                }
                found.map(|(id, _)| id.as_str())
            }
            None => self
                .docs
                .versions
                .keys()
                .find(|id| *id != CURRENT_VERSION)
                .or_else(|| self.docs.versions.keys().next())
                .map(String::as_str),
        }
    }

    fn resolve_one(&self, id: &str, is_latest: bool, diagnostics: &mut Diagnostics) -> DocVersion {
        let options = &self.docs.versions[id];
        let is_current = id == CURRENT_VERSION;
        let field = FieldPath::new("docs").field("versions").key(id);

        let path = match &options.path {
            Some(path) => {
                let path = path.trim_matches('/').to_owned();
                if !path.is_empty()
                    && let Err(message) = check_route(&format!("/{path}/"))
                {
                    diagnostics.error(field.field("path"), message);
                }
                path
            }
            None if is_latest => String::new(),
            None if is_current => "next".to_owned(),
            None => id.to_owned(),
        };

        let banner = match options.banner {
            Some(BannerSetting::None) => Banner::None,
            Some(BannerSetting::Unreleased) => Banner::Unreleased,
            Some(BannerSetting::Deprecated) => Banner::Deprecated,
            Some(BannerSetting::Unmaintained) => {
                diagnostics.deprecated(
                    field.field("banner"),
                    "banner \"unmaintained\" is deprecated, use \"deprecated\"",
                );
                Banner::Deprecated
            }
            None if is_current && !is_latest => Banner::Unreleased,
            None => Banner::None,
        };

        let label = options.label.clone().unwrap_or_else(|| {
            if is_current {
                "Next".to_owned()
            } else {
                id.to_owned()
            }
        });

        let content_dir = if is_current {
            self.docs.path.clone()
        } else {
            format!("versioned_docs/version-{id}")
        };

        DocVersion {
            id: id.to_owned(),
            label,
            route: join_segments(&[self.base_url, &self.docs.route_base_path, &path]),
            path,
            content_dir,
            banner,
            is_latest,
        }
    }

    fn check_unique_routes(&self, versions: &[DocVersion], diagnostics: &mut Diagnostics) {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for version in versions {
            if let Some(other) = seen.insert(&version.route, &version.id) {
                diagnostics.error(
                    version.field_path().field("path"),
                    format!(
                        "version route {:?} is already used by version {other:?}",
                        version.route
                    ),
                );
            }
        }
    }
}
