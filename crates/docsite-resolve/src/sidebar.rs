//! Sidebar tree building.
//!
//! Resolves declared sidebar items against one version's discovered docs.
//! Doc references become leaves with permalinks, autogenerated items are
//! expanded from the content tree, and categories keep their declared order.
//! The resolved tree never contains an autogenerated marker.

use docsite_config::{Diagnostics, FieldPath, SidebarItem, SidebarItemDecl, SidebarsDocument};
use indexmap::IndexMap;
use serde::Serialize;

use crate::docs::{DirNode, MAX_DEPTH, PageLink, TreeEntry, VersionContent};
use crate::route::{check_route, check_url, join_route};
use crate::version::DocVersion;

/// A resolved sidebar node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarNode {
    /// Doc leaf.
    Doc {
        /// Doc id.
        id: String,
        /// Display text.
        label: String,
        /// Resolved route of the doc.
        permalink: String,
    },
    /// Labelled group.
    Category {
        /// Display text.
        label: String,
        /// Whether the category starts collapsed.
        collapsed: bool,
        /// Whether the category can be collapsed.
        collapsible: bool,
        /// Doc opened when clicking the category label.
        #[serde(skip_serializing_if = "Option::is_none")]
        link: Option<CategoryLink>,
        /// Children in order.
        items: Vec<SidebarNode>,
    },
    /// External or internal link.
    Link {
        /// Display text.
        label: String,
        /// Target.
        href: String,
    },
}

/// Doc linked from a category label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryLink {
    /// Doc id.
    pub id: String,
    /// Resolved route of the doc.
    pub permalink: String,
}

/// Sidebar id → root nodes.
pub type Sidebars = IndexMap<String, Vec<SidebarNode>>;

/// Internal link target of a sidebar, resolved against the base path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SidebarLink {
    /// Declaration path of the sidebar holding the link.
    pub sidebar: FieldPath,
    pub route: String,
    pub origin: FieldPath,
}

/// Builds the sidebars of one version.
pub(crate) struct SidebarTreeBuilder<'a> {
    content: &'a VersionContent,
    version: &'a DocVersion,
    base_url: &'a str,
}

impl<'a> SidebarTreeBuilder<'a> {
    pub fn new(content: &'a VersionContent, version: &'a DocVersion, base_url: &'a str) -> Self {
        Self {
            content,
            version,
            base_url,
        }
    }

    /// Build every sidebar of `declared`. `origin` names where the
    /// declaration came from (`sidebars`, or a sidebar file path).
    ///
    /// Internal link items are appended to `links` for route validation.
    pub fn build(
        &self,
        declared: &SidebarsDocument,
        origin: &FieldPath,
        links: &mut Vec<SidebarLink>,
        diagnostics: &mut Diagnostics,
    ) -> Sidebars {
        declared
            .iter()
            .map(|(id, items)| {
                let sidebar = origin.key(id);
                let nodes = self.build_items(items, &sidebar, &sidebar, 1, links, diagnostics);
                (id.clone(), nodes)
            })
            .collect()
    }

    fn build_items(
        &self,
        items: &[SidebarItemDecl],
        sidebar: &FieldPath,
        path: &FieldPath,
        depth: usize,
        links: &mut Vec<SidebarLink>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<SidebarNode> {
        let mut nodes = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            match item {
                SidebarItemDecl::DocId(id) => {
                    nodes.extend(self.doc_leaf(id, None, &item_path, diagnostics));
                }
                SidebarItemDecl::Item(SidebarItem::Doc { id, label }) => {
                    nodes.extend(self.doc_leaf(id, label.as_deref(), &item_path, diagnostics));
                }
                SidebarItemDecl::Item(SidebarItem::Category {
                    label,
                    items,
                    collapsed,
                    collapsible,
                }) => {
                    if depth > MAX_DEPTH {
                        diagnostics.error(
                            &item_path,
                            format!("sidebar nesting exceeds {MAX_DEPTH} levels"),
                        );
                        continue;
                    }
                    if label.trim().is_empty() {
                        diagnostics.error(item_path.field("label"), "category label is empty");
                    }
                    if items.is_empty() {
                        diagnostics.warning(&item_path, format!("category {label:?} has no items"));
                    }
                    let children = self.build_items(
                        items,
                        sidebar,
                        &item_path.field("items"),
                        depth + 1,
                        links,
                        diagnostics,
                    );
                    nodes.push(SidebarNode::Category {
                        label: label.clone(),
                        collapsed: collapsed.unwrap_or(true),
                        collapsible: collapsible.unwrap_or(true),
                        link: None,
                        items: children,
                    });
                }
                SidebarItemDecl::Item(SidebarItem::Link { label, href }) => {
                    let href_path = item_path.field("href");
                    let href = if href.starts_with('/') {
                        match check_route(href) {
                            Ok(()) => {
                                let route = join_route(self.base_url, href);
                                links.push(SidebarLink {
                                    sidebar: sidebar.clone(),
                                    route: route.clone(),
                                    origin: href_path,
                                });
                                route
                            }
                            Err(message) => {
                                diagnostics.error(href_path, message);
                                href.clone()
                            }
                        }
                    } else {
                        if let Err(message) = check_url(href) {
                            diagnostics.error(href_path, message);
                        }
                        href.clone()
                    };
                    nodes.push(SidebarNode::Link {
                        label: label.clone(),
                        href,
                    });
                }
                SidebarItemDecl::Item(SidebarItem::Autogenerated { dir_name }) => {
                    nodes.extend(self.autogenerated(dir_name, &item_path, diagnostics));
                }
            }
        }
        nodes
    }

    fn doc_leaf(
        &self,
        id: &str,
        label: Option<&str>,
        path: &FieldPath,
        diagnostics: &mut Diagnostics,
    ) -> Option<SidebarNode> {
        let Some((_, doc)) = self.content.doc(id) else {
            diagnostics.error(
                path,
                format!("doc id {id:?} not found in version {:?}", self.version.id),
            );
            return None;
        };
        Some(SidebarNode::Doc {
            id: doc.page.id.clone(),
            label: label.unwrap_or_else(|| doc.page.label()).to_owned(),
            permalink: doc.page.permalink.clone(),
        })
    }

    fn autogenerated(
        &self,
        dir_name: &str,
        path: &FieldPath,
        diagnostics: &mut Diagnostics,
    ) -> Vec<SidebarNode> {
        // A missing content root is reported by discovery.
        if self.content.root.is_none() {
            return Vec::new();
        }
        match self.content.dir(dir_name) {
            Some(dir) => self.expand_dir(dir),
            None => {
                diagnostics.filesystem_error(
                    path.field("dirName"),
                    format!(
                        "directory {dir_name:?} not found in {} (version {:?})",
                        self.version.content_dir, self.version.id
                    ),
                );
                Vec::new()
            }
        }
    }

    fn expand_dir(&self, dir: &DirNode) -> Vec<SidebarNode> {
        dir.children
            .iter()
            .filter_map(|child| match child {
                TreeEntry::Doc(index) => {
                    let page = &self.content.docs[*index].page;
                    Some(SidebarNode::Doc {
                        id: page.id.clone(),
                        label: page.label().to_owned(),
                        permalink: page.permalink.clone(),
                    })
                }
                TreeEntry::Dir(sub) => self.category_from_dir(sub),
            })
            .collect()
    }

    /// Category for a sub-directory. Directories without docs yield nothing.
    fn category_from_dir(&self, dir: &DirNode) -> Option<SidebarNode> {
        let items = self.expand_dir(dir);
        let link = dir.index_doc.map(|index| {
            let page = &self.content.docs[index].page;
            CategoryLink {
                id: page.id.clone(),
                permalink: page.permalink.clone(),
            }
        });
        if items.is_empty() && link.is_none() {
            return None;
        }
        Some(SidebarNode::Category {
            label: dir.label(),
            collapsed: dir.meta.collapsed.unwrap_or(true),
            collapsible: dir.meta.collapsible.unwrap_or(true),
            link,
            items,
        })
    }
}

/// Doc references of a sidebar in traversal order: (doc id, label, permalink).
fn flatten<'s>(nodes: &'s [SidebarNode], out: &mut Vec<(&'s str, &'s str, &'s str)>) {
    for node in nodes {
        match node {
            SidebarNode::Doc {
                id,
                label,
                permalink,
            } => out.push((id.as_str(), label.as_str(), permalink.as_str())),
            SidebarNode::Category {
                label, link, items, ..
            } => {
                if let Some(link) = link {
                    out.push((link.id.as_str(), label.as_str(), link.permalink.as_str()));
                }
                flatten(items, out);
            }
            SidebarNode::Link { .. } => {}
        }
    }
}

/// First doc of a sidebar in traversal order: (doc id, permalink).
pub(crate) fn first_doc(nodes: &[SidebarNode]) -> Option<(&str, &str)> {
    let mut order = Vec::new();
    flatten(nodes, &mut order);
    order.first().map(|&(id, _, permalink)| (id, permalink))
}

/// Assign each page the sidebar it first appears in and its neighbours there.
pub(crate) fn link_pages(sidebars: &Sidebars, content: &mut VersionContent) {
    for (sidebar_id, nodes) in sidebars {
        let mut order = Vec::new();
        flatten(nodes, &mut order);

        for (i, (doc_id, _, _)) in order.iter().enumerate() {
            let Some((index, doc)) = content.doc(doc_id) else {
                continue;
            };
            if doc.page.sidebar.is_some() {
                continue;
            }
            let neighbour = |j: Option<usize>| {
                j.and_then(|j| order.get(j)).map(|(_, label, permalink)| PageLink {
                    title: (*label).to_owned(),
                    permalink: (*permalink).to_owned(),
                })
            };
            let previous = neighbour(i.checked_sub(1));
            let next = neighbour(Some(i + 1));

            let page = &mut content.docs[index].page;
            page.sidebar = Some(sidebar_id.clone());
            page.previous = previous;
            page.next = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use docsite_config::{DiagnosticKind, default_sidebars};
    use docsite_source::MockSource;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::route::TrailingSlash;
    use crate::version::Banner;

    fn version() -> DocVersion {
        DocVersion {
            id: "v0.50.x".to_owned(),
            label: "v0.50.x".to_owned(),
            path: "v0.50".to_owned(),
            route: "/spawn/v0.50/".to_owned(),
            content_dir: "versioned_docs/version-v0.50.x".to_owned(),
            banner: Banner::None,
            is_latest: true,
        }
    }

    fn spawn_source() -> MockSource {
        MockSource::new()
            .with_file("versioned_docs/version-v0.50.x/01-intro.md", "# Introduction")
            .with_file(
                "versioned_docs/version-v0.50.x/02-build/01-setup.md",
                "---\nsidebar_label: Setup\n---\n# Setting up",
            )
            .with_file("versioned_docs/version-v0.50.x/02-build/02-testnet.md", "# Testnet")
            .with_file(
                "versioned_docs/version-v0.50.x/02-build/_category_.json",
                r#"{"label": "Build", "collapsed": false}"#,
            )
            .with_file("versioned_docs/version-v0.50.x/03-demos/README.md", "# Demos")
            .with_file("versioned_docs/version-v0.50.x/03-demos/ibc.md", "# IBC")
            .with_dir("versioned_docs/version-v0.50.x/04-empty")
            .with_file("versioned_docs/version-v0.50.x/10-bonus.md", "# Bonus")
    }

    fn build(
        source: &MockSource,
        declared: &SidebarsDocument,
    ) -> (Sidebars, VersionContent, Diagnostics) {
        let (sidebars, content, _, diagnostics) = build_with_links(source, declared);
        (sidebars, content, diagnostics)
    }

    fn build_with_links(
        source: &MockSource,
        declared: &SidebarsDocument,
    ) -> (Sidebars, VersionContent, Vec<SidebarLink>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let version = version();
        let mut content = VersionContent::discover(
            source,
            &version,
            &[],
            TrailingSlash::Preserve,
            &mut diagnostics,
        );
        let mut links = Vec::new();
        let sidebars = SidebarTreeBuilder::new(&content, &version, "/spawn/").build(
            declared,
            &FieldPath::new("sidebars"),
            &mut links,
            &mut diagnostics,
        );
        link_pages(&sidebars, &mut content);
        (sidebars, content, links, diagnostics)
    }

    fn doc(id: &str, label: &str, permalink: &str) -> SidebarNode {
        SidebarNode::Doc {
            id: id.to_owned(),
            label: label.to_owned(),
            permalink: permalink.to_owned(),
        }
    }

    fn declared(value: serde_json::Value) -> SidebarsDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_autogenerated_root() {
        let (sidebars, _, diagnostics) = build(&spawn_source(), &default_sidebars());

        assert!(diagnostics.is_empty());
        assert_eq!(
            sidebars["defaultSidebar"],
            vec![
                doc("intro", "Introduction", "/spawn/v0.50/intro"),
                SidebarNode::Category {
                    label: "Build".to_owned(),
                    collapsed: false,
                    collapsible: true,
                    link: None,
                    items: vec![
                        doc("build/setup", "Setup", "/spawn/v0.50/build/setup"),
                        doc("build/testnet", "Testnet", "/spawn/v0.50/build/testnet"),
                    ],
                },
                SidebarNode::Category {
                    label: "demos".to_owned(),
                    collapsed: true,
                    collapsible: true,
                    link: Some(CategoryLink {
                        id: "demos/README".to_owned(),
                        permalink: "/spawn/v0.50/demos".to_owned(),
                    }),
                    items: vec![doc("demos/ibc", "IBC", "/spawn/v0.50/demos/ibc")],
                },
                doc("bonus", "Bonus", "/spawn/v0.50/bonus"),
            ]
        );
    }

    #[test]
    fn test_build_is_stable() {
        let source = spawn_source();
        let (first, _, _) = build(&source, &default_sidebars());
        let (second, _, _) = build(&source, &default_sidebars());
        assert_eq!(first, second);
    }

    #[test]
    fn test_explicit_items() {
        let declared = declared(serde_json::json!({
            "guide": [
                "intro",
                {"type": "doc", "id": "bonus", "label": "Extra"},
                {"type": "category", "label": "Demos", "items": [{"type": "autogenerated", "dirName": "03-demos"}]},
                {"type": "link", "label": "IBC", "href": "https://ibc.cosmos.network/v8"}
            ]
        }));
        let (sidebars, _, diagnostics) = build(&spawn_source(), &declared);

        assert!(diagnostics.is_empty());
        let guide = &sidebars["guide"];
        assert_eq!(guide[1], doc("bonus", "Extra", "/spawn/v0.50/bonus"));
        assert_eq!(
            guide[2],
            SidebarNode::Category {
                label: "Demos".to_owned(),
                collapsed: true,
                collapsible: true,
                link: None,
                items: vec![doc("demos/ibc", "IBC", "/spawn/v0.50/demos/ibc")],
            }
        );
        assert_eq!(
            guide[3],
            SidebarNode::Link {
                label: "IBC".to_owned(),
                href: "https://ibc.cosmos.network/v8".to_owned(),
            }
        );
    }

    #[test]
    fn test_unknown_doc_id() {
        let declared = declared(serde_json::json!({"guide": ["intro", "missing"]}));
        let (sidebars, _, diagnostics) = build(&spawn_source(), &declared);

        assert_eq!(sidebars["guide"].len(), 1);
        assert_eq!(diagnostics.error_count(), 1);
        let error = diagnostics.iter().next().unwrap();
        assert_eq!(error.path, r#"sidebars["guide"][1]"#);
        assert!(error.message.contains("v0.50.x"));
    }

    #[test]
    fn test_missing_autogenerated_dir() {
        let declared = declared(serde_json::json!({
            "guide": [{"type": "autogenerated", "dirName": "reference"}]
        }));
        let (_, _, diagnostics) = build(&spawn_source(), &declared);

        let error = diagnostics.iter().next().unwrap();
        assert_eq!(error.kind, DiagnosticKind::Filesystem);
        assert_eq!(error.path, r#"sidebars["guide"][0].dirName"#);
    }

    #[test]
    fn test_invalid_link_and_empty_category() {
        let declared = declared(serde_json::json!({
            "guide": [
                {"type": "link", "label": "Bad", "href": "ibc.cosmos.network"},
                {"type": "category", "label": "Empty", "items": []}
            ]
        }));
        let (_, _, diagnostics) = build(&spawn_source(), &declared);

        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(
            diagnostics.errors().next().unwrap().path,
            r#"sidebars["guide"][0].href"#
        );
    }

    #[test]
    fn test_internal_links_are_resolved_and_collected() {
        let declared = declared(serde_json::json!({
            "guide": [
                "intro",
                {"type": "link", "label": "Bonus", "href": "/v0.50/bonus"},
                {"type": "category", "label": "More", "items": [
                    {"type": "link", "label": "Gone", "href": "/nowhere"}
                ]}
            ]
        }));
        let (sidebars, _, links, diagnostics) = build_with_links(&spawn_source(), &declared);

        assert!(diagnostics.is_empty());
        assert_eq!(
            sidebars["guide"][1],
            SidebarNode::Link {
                label: "Bonus".to_owned(),
                href: "/spawn/v0.50/bonus".to_owned(),
            }
        );
        assert!(links.iter().all(|link| link.sidebar.as_str() == r#"sidebars["guide"]"#));
        let collected: Vec<_> = links
            .iter()
            .map(|link| (link.route.as_str(), link.origin.to_string()))
            .collect();
        assert_eq!(
            collected,
            vec![
                ("/spawn/v0.50/bonus", r#"sidebars["guide"][1].href"#.to_owned()),
                ("/spawn/nowhere", r#"sidebars["guide"][2].items[0].href"#.to_owned()),
            ]
        );
    }

    #[test]
    fn test_category_nesting_limit() {
        let mut item = serde_json::json!("intro");
        for _ in 0..=MAX_DEPTH {
            item = serde_json::json!({"type": "category", "label": "Nested", "items": [item]});
        }
        let declared = declared(serde_json::json!({"deep": [item]}));
        let (_, _, diagnostics) = build(&spawn_source(), &declared);

        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.errors().next().unwrap().message.contains("nesting"));
    }

    #[test]
    fn test_first_doc() {
        let (sidebars, _, _) = build(&spawn_source(), &default_sidebars());
        assert_eq!(
            first_doc(&sidebars["defaultSidebar"]),
            Some(("intro", "/spawn/v0.50/intro"))
        );
        assert_eq!(first_doc(&[]), None);
    }

    #[test]
    fn test_previous_next_links() {
        let declared = declared(serde_json::json!({
            "first": [{"type": "autogenerated", "dirName": "."}],
            "second": ["bonus", "intro"]
        }));
        let (_, content, _) = build(&spawn_source(), &declared);

        let (_, intro) = content.doc("intro").unwrap();
        assert_eq!(intro.page.sidebar.as_deref(), Some("first"));
        assert!(intro.page.previous.is_none());
        assert_eq!(
            intro.page.next,
            Some(PageLink {
                title: "Setup".to_owned(),
                permalink: "/spawn/v0.50/build/setup".to_owned(),
            })
        );

        let (_, readme) = content.doc("demos/README").unwrap();
        assert_eq!(
            readme.page.previous.as_ref().map(|l| l.title.as_str()),
            Some("Testnet")
        );
        assert_eq!(
            readme.page.next.as_ref().map(|l| l.title.as_str()),
            Some("IBC")
        );

        let (_, bonus) = content.doc("bonus").unwrap();
        assert_eq!(bonus.page.sidebar.as_deref(), Some("first"));
        assert!(bonus.page.next.is_none());
    }
}
