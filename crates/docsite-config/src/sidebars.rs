//! Sidebar declaration schema.
//!
//! A sidebars document maps sidebar ids to ordered item lists. Items are doc
//! ids (shorthand), or objects tagged by `type`:
//!
//! ```yaml
//! defaultSidebar:
//!   - intro
//!   - type: category
//!     label: Guides
//!     items: [guides/install]
//!   - type: autogenerated
//!     dirName: reference
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sidebar id → ordered items.
pub type SidebarsDocument = IndexMap<String, Vec<SidebarItemDecl>>;

/// Name of the sidebar used when none is declared.
pub const DEFAULT_SIDEBAR_ID: &str = "defaultSidebar";

/// Sidebar declaration used when no sidebars are configured: the whole docs
/// directory, autogenerated.
#[must_use]
pub fn default_sidebars() -> SidebarsDocument {
    let mut sidebars = SidebarsDocument::new();
    sidebars.insert(
        DEFAULT_SIDEBAR_ID.to_owned(),
        vec![SidebarItemDecl::Item(SidebarItem::Autogenerated {
            dir_name: ".".to_owned(),
        })],
    );
    sidebars
}

/// One declared sidebar item.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SidebarItemDecl {
    /// Shorthand doc reference.
    DocId(String),
    /// Typed item.
    Item(SidebarItem),
}

/// Typed sidebar item.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    /// Reference to a doc by id.
    Doc {
        /// Doc id.
        id: String,
        /// Label overriding the doc's sidebar label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Labelled group of items.
    Category {
        /// Display text.
        label: String,
        /// Children in declaration order.
        #[serde(default)]
        items: Vec<SidebarItemDecl>,
        /// Whether the category starts collapsed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collapsed: Option<bool>,
        /// Whether the category can be collapsed at all.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collapsible: Option<bool>,
    },
    /// External link.
    Link {
        /// Display text.
        label: String,
        /// Target URL.
        href: String,
    },
    /// Items generated from a docs directory.
    Autogenerated {
        /// Directory relative to the version's docs root (`.` for the root).
        #[serde(rename = "dirName")]
        dir_name: String,
    },
}
