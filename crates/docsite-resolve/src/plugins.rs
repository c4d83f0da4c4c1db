//! Plugin registry and option validation.

use std::collections::HashSet;

use docsite_config::{Diagnostics, FieldPath, PluginEntry, RedirectEntry};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Plugin whose `redirects` option adds client-side redirects.
pub const CLIENT_REDIRECTS_PLUGIN: &str = "@docusaurus/plugin-client-redirects";

const SITEMAP_PLUGIN: &str = "@docusaurus/plugin-sitemap";

const SITEMAP_CHANGEFREQ: &[&str] = &[
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];

/// Accepted option keys per known plugin.
const REGISTRY: &[(&str, &[&str])] = &[
    (
        CLIENT_REDIRECTS_PLUGIN,
        &["redirects", "fromExtensions", "toExtensions"],
    ),
    (
        SITEMAP_PLUGIN,
        &["changefreq", "priority", "filename", "ignorePatterns", "lastmod"],
    ),
    (
        "@docusaurus/plugin-google-gtag",
        &["trackingID", "anonymizeIP"],
    ),
    (
        "@easyops-cn/docusaurus-search-local",
        &[
            "indexBlog",
            "indexDocs",
            "indexPages",
            "docsRouteBasePath",
            "highlightSearchTermsOnTargetPage",
            "hashed",
            "language",
            "searchResultLimits",
        ],
    ),
    (
        "@gracefullight/docusaurus-plugin-microsoft-clarity",
        &["projectId"],
    ),
    (
        "docusaurus-pushfeedback",
        &[
            "project",
            "buttonPosition",
            "modalPosition",
            "buttonStyle",
            "hideIcon",
            "customFont",
        ],
    ),
    ("docusaurus-tailwindcss", &[]),
];

/// Option keys accepted by a known plugin, `None` for unknown plugins.
///
/// ```
/// use docsite_resolve::plugins::accepted_keys;
///
/// assert_eq!(accepted_keys("@gracefullight/docusaurus-plugin-microsoft-clarity"), Some(&["projectId"][..]));
/// assert!(accepted_keys("left-pad").is_none());
/// ```
#[must_use]
pub fn accepted_keys(name: &str) -> Option<&'static [&'static str]> {
    REGISTRY
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, keys)| *keys)
}

/// An enabled plugin after validation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlugin {
    /// Plugin package name.
    pub name: String,
    /// Validated options.
    pub options: IndexMap<String, Value>,
    /// False when the plugin is not in the registry and its options were not checked.
    pub known: bool,
    #[serde(skip)]
    pub(crate) index: usize,
}

impl ResolvedPlugin {
    /// Field path of the plugin's declaration.
    #[must_use]
    pub fn field_path(&self) -> FieldPath {
        FieldPath::new("plugins").index(self.index)
    }
}

/// Validate plugin declarations, dropping disabled ones.
pub(crate) fn resolve_plugins(
    entries: &[PluginEntry],
    diagnostics: &mut Diagnostics,
) -> Vec<ResolvedPlugin> {
    let mut seen = HashSet::new();
    let mut plugins = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        if !entry.enabled {
            continue;
        }
        let path = FieldPath::new("plugins").index(index);
        if entry.name.trim().is_empty() {
            diagnostics.error(path.field("name"), "plugin name is empty");
            continue;
        }
        if !seen.insert(entry.name.as_str()) {
            diagnostics.error(
                path.field("name"),
                format!("plugin {:?} is declared more than once", entry.name),
            );
            continue;
        }

        let known = match accepted_keys(&entry.name) {
            Some(keys) => {
                check_options(entry, keys, &path.field("options"), diagnostics);
                true
            }
            None => {
                diagnostics.warning(
                    path.field("name"),
                    format!("unknown plugin {:?}; options are not checked", entry.name),
                );
                false
            }
        };

        plugins.push(ResolvedPlugin {
            name: entry.name.clone(),
            options: entry.options.clone(),
            known,
            index,
        });
    }
    plugins
}

fn check_options(
    entry: &PluginEntry,
    keys: &[&str],
    path: &FieldPath,
    diagnostics: &mut Diagnostics,
) {
    for (key, value) in &entry.options {
        let field = path.field(key);
        if !keys.contains(&key.as_str()) {
            diagnostics.error(
                &field,
                format!("unknown option {key:?} for plugin {:?}", entry.name),
            );
            continue;
        }
        if entry.name == SITEMAP_PLUGIN {
            check_sitemap_option(key, value, &field, diagnostics);
        }
    }
}

fn check_sitemap_option(key: &str, value: &Value, field: &FieldPath, diagnostics: &mut Diagnostics) {
    match key {
        "priority" => {
            if !value.as_f64().is_some_and(|p| (0.0..=1.0).contains(&p)) {
                diagnostics.error(field, "priority must be a number between 0 and 1");
            }
        }
        "changefreq" => {
            if !value.as_str().is_some_and(|f| SITEMAP_CHANGEFREQ.contains(&f)) {
                diagnostics.error(
                    field,
                    format!("changefreq must be one of {}", SITEMAP_CHANGEFREQ.join(", ")),
                );
            }
        }
        _ => {}
    }
}

/// Redirects declared through the client-redirects plugin, with the field
/// path of their list.
pub(crate) fn plugin_redirects(
    plugins: &[ResolvedPlugin],
    diagnostics: &mut Diagnostics,
) -> Vec<(FieldPath, Vec<RedirectEntry>)> {
    plugins
        .iter()
        .filter(|plugin| plugin.name == CLIENT_REDIRECTS_PLUGIN)
        .filter_map(|plugin| {
            let value = plugin.options.get("redirects")?;
            let path = plugin.field_path().field("options").field("redirects");
            match serde_json::from_value::<Vec<RedirectEntry>>(value.clone()) {
                Ok(redirects) => Some((path, redirects)),
                Err(e) => {
                    diagnostics.error(&path, format!("invalid redirects: {e}"));
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(value: serde_json::Value) -> Vec<PluginEntry> {
        serde_json::from_value(value).unwrap()
    }

    fn resolve(value: serde_json::Value) -> (Vec<ResolvedPlugin>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let plugins = resolve_plugins(&entries(value), &mut diagnostics);
        (plugins, diagnostics)
    }

    #[test]
    fn test_known_plugins_pass() {
        let (plugins, diagnostics) = resolve(serde_json::json!([
            "docusaurus-tailwindcss",
            {"name": "@gracefullight/docusaurus-plugin-microsoft-clarity", "options": {"projectId": "idk9udvhuu"}},
            {"name": "@docusaurus/plugin-sitemap", "options": {"changefreq": "weekly", "priority": 0.5}},
            {"name": "docusaurus-pushfeedback", "options": {"project": "6c5e8d6o0x", "buttonPosition": "bottom-right", "hideIcon": false}}
        ]));

        assert!(diagnostics.is_empty());
        assert_eq!(plugins.len(), 4);
        assert!(plugins.iter().all(|p| p.known));
        assert_eq!(plugins[1].field_path().to_string(), "plugins[1]");
    }

    #[test]
    fn test_unknown_option_is_error() {
        let (_, diagnostics) = resolve(serde_json::json!([
            {"name": "@docusaurus/plugin-google-gtag", "options": {"trackingID": "G-1", "anonymize": true}}
        ]));

        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().path,
            "plugins[0].options.anonymize"
        );
    }

    #[test]
    fn test_unknown_plugin_is_warning() {
        let (plugins, diagnostics) = resolve(serde_json::json!([
            {"name": "docusaurus-plugin-sass", "options": {"anything": 1}}
        ]));

        assert_eq!(diagnostics.warning_count(), 1);
        assert!(!diagnostics.has_errors());
        assert!(!plugins[0].known);
    }

    #[test]
    fn test_disabled_plugins_are_dropped() {
        let (plugins, diagnostics) = resolve(serde_json::json!([
            {"name": "docusaurus-tailwindcss", "enabled": false},
            {"name": "left-pad", "enabled": false, "options": {"bogus": true}},
            "docusaurus-tailwindcss"
        ]));

        assert!(diagnostics.is_empty());
        assert_eq!(plugins.len(), 1);
        assert_eq!(plugins[0].field_path().to_string(), "plugins[2]");
    }

    #[test]
    fn test_duplicate_plugin() {
        let (plugins, diagnostics) = resolve(serde_json::json!([
            "docusaurus-tailwindcss",
            "docusaurus-tailwindcss"
        ]));

        assert_eq!(plugins.len(), 1);
        assert_eq!(diagnostics.iter().next().unwrap().path, "plugins[1].name");
    }

    #[test]
    fn test_sitemap_option_values() {
        let (_, diagnostics) = resolve(serde_json::json!([
            {"name": "@docusaurus/plugin-sitemap", "options": {"changefreq": "sometimes", "priority": 2}}
        ]));

        assert_eq!(diagnostics.error_count(), 2);
    }

    #[test]
    fn test_plugin_redirects() {
        let mut diagnostics = Diagnostics::new();
        let plugins = resolve_plugins(
            &entries(serde_json::json!([
                "docusaurus-tailwindcss",
                {
                    "name": CLIENT_REDIRECTS_PLUGIN,
                    "options": {"redirects": [{"from": "/old", "to": "/new"}]}
                }
            ])),
            &mut diagnostics,
        );
        let redirects = plugin_redirects(&plugins, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(redirects.len(), 1);
        assert_eq!(redirects[0].0.to_string(), "plugins[1].options.redirects");
        assert_eq!(redirects[0].1[0].from, vec!["/old".to_owned()]);
    }

    #[test]
    fn test_malformed_plugin_redirects() {
        let mut diagnostics = Diagnostics::new();
        let plugins = resolve_plugins(
            &entries(serde_json::json!([
                {"name": CLIENT_REDIRECTS_PLUGIN, "options": {"redirects": [{"to": "/new"}]}}
            ])),
            &mut diagnostics,
        );

        assert!(plugin_redirects(&plugins, &mut diagnostics).is_empty());
        assert_eq!(diagnostics.error_count(), 1);
    }
}
