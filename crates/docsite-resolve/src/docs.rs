//! Doc discovery.
//!
//! Walks one version's content directory through a [`DocSource`] and builds
//! two views of it:
//!
//! - a flat catalog of [`DocPage`]s keyed by doc id, used to resolve explicit
//!   sidebar references and navbar `doc` items;
//! - a directory tree with ordering hints and `_category_` metadata, used to
//!   expand autogenerated sidebar items.
//!
//! Each directory is listed exactly once.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use docsite_config::{Diagnostics, FieldPath, Format};
use docsite_source::{DocSource, join_path};
use glob::{MatchOptions, Pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::route::{TrailingSlash, join_route};
use crate::version::DocVersion;

/// Maximum directory and category nesting depth.
pub const MAX_DEPTH: usize = 32;

/// Markdown extensions recognized as docs.
const DOC_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Category metadata filenames, in lookup order.
const CATEGORY_FILES: &[&str] = &["_category_.json", "_category_.yml", "_category_.yaml"];

/// `01-intro` → (1, `intro`). The remainder must not start with a separator.
static NUMBER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*[-_.]+\s*([^-_.\s].*)$").unwrap());

static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A doc page with its resolved permalink and sidebar neighbours.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocPage {
    /// Doc id, unique within its version (`build-your-application/testnet`).
    pub id: String,
    /// Version the page belongs to.
    pub version: String,
    /// Page title.
    pub title: String,
    /// Label used in sidebars, if different from the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_label: Option<String>,
    /// Explicit ordering hint from front matter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<f64>,
    /// Source file relative to the site root.
    pub source: String,
    /// Resolved route.
    pub permalink: String,
    /// Sidebar the page first appears in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    /// Previous page in sidebar order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageLink>,
    /// Next page in sidebar order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

impl DocPage {
    /// Label shown in sidebars.
    #[must_use]
    pub fn label(&self) -> &str {
        self.sidebar_label.as_deref().unwrap_or(&self.title)
    }
}

/// Link to a neighbouring page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Sidebar label of the target.
    pub title: String,
    /// Resolved route of the target.
    pub permalink: String,
}

/// Front matter fields that affect resolution. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    id: Option<String>,
    title: Option<String>,
    sidebar_label: Option<String>,
    sidebar_position: Option<f64>,
    slug: Option<String>,
}

/// Contents of a `_category_` file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct CategoryMeta {
    pub label: Option<String>,
    pub position: Option<f64>,
    pub collapsed: Option<bool>,
    pub collapsible: Option<bool>,
}

/// A directory of a version's content tree.
#[derive(Clone, Debug, Default)]
pub(crate) struct DirNode {
    /// Raw directory name (`02-build`).
    pub name: String,
    /// Ordering hint.
    pub hint: Option<f64>,
    /// Metadata from `_category_`.
    pub meta: CategoryMeta,
    /// `index`/`README` doc linked from the category.
    pub index_doc: Option<usize>,
    /// Ordered children.
    pub children: Vec<TreeEntry>,
}

impl DirNode {
    /// Category label: `_category_` label, else the name without its number prefix.
    pub fn label(&self) -> String {
        self.meta
            .label
            .clone()
            .unwrap_or_else(|| strip_number_prefix(&self.name).1.to_owned())
    }
}

#[derive(Clone, Debug)]
pub(crate) enum TreeEntry {
    /// Index into [`VersionContent::docs`].
    Doc(usize),
    Dir(DirNode),
}

/// A discovered doc with its ordering data.
#[derive(Clone, Debug)]
pub(crate) struct DiscoveredDoc {
    pub page: DocPage,
    pub hint: Option<f64>,
}

/// Everything discovered for one version.
#[derive(Debug, Default)]
pub(crate) struct VersionContent {
    pub docs: Vec<DiscoveredDoc>,
    by_id: HashMap<String, usize>,
    /// `None` when the content directory could not be listed.
    pub root: Option<DirNode>,
}

impl VersionContent {
    /// Discover all docs of `version`.
    pub fn discover(
        source: &dyn DocSource,
        version: &DocVersion,
        excludes: &[Pattern],
        trailing_slash: TrailingSlash,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut walker = Walker {
            source,
            version,
            excludes,
            trailing_slash,
            content: Self::default(),
        };
        let root = walker.walk_dir("", String::new(), 0, diagnostics);
        let mut content = walker.content;
        content.root = root;
        debug!(
            version = %version.id,
            docs = content.docs.len(),
            "discovered docs"
        );
        content
    }

    /// Look up a doc by id.
    pub fn doc(&self, id: &str) -> Option<(usize, &DiscoveredDoc)> {
        self.by_id.get(id).map(|&index| (index, &self.docs[index]))
    }

    /// Find a directory node by path relative to the content root.
    pub fn dir(&self, rel_path: &str) -> Option<&DirNode> {
        let mut node = self.root.as_ref()?;
        for segment in rel_path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            node = node.children.iter().find_map(|child| match child {
                TreeEntry::Dir(dir) if dir.name == segment => Some(dir),
                _ => None,
            })?;
        }
        Some(node)
    }

    /// Consume into the page list.
    pub fn into_pages(self) -> Vec<DocPage> {
        self.docs.into_iter().map(|doc| doc.page).collect()
    }
}

struct Walker<'a> {
    source: &'a dyn DocSource,
    version: &'a DocVersion,
    excludes: &'a [Pattern],
    trailing_slash: TrailingSlash,
    content: VersionContent,
}

impl Walker<'_> {
    fn walk_dir(
        &mut self,
        rel_path: &str,
        name: String,
        depth: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<DirNode> {
        let dir = join_path(&self.version.content_dir, rel_path);
        if depth > MAX_DEPTH {
            diagnostics.filesystem_error(
                &dir,
                format!("directory nesting exceeds {MAX_DEPTH} levels"),
            );
            return None;
        }

        let entries = match self.source.list(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                let origin = if rel_path.is_empty() {
                    content_dir_field(self.version)
                } else {
                    FieldPath::new(&dir)
                };
                diagnostics.filesystem_error(
                    origin,
                    format!("cannot list docs of version {:?}: {err}", self.version.id),
                );
                return None;
            }
        };

        let mut node = DirNode {
            hint: strip_number_prefix(&name).0,
            name,
            ..DirNode::default()
        };
        if let Some(meta) = self.read_category(&dir, &entries, diagnostics) {
            node.hint = meta.position.or(node.hint);
            node.meta = meta;
        }

        let mut children: Vec<(Option<f64>, String, TreeEntry)> = Vec::new();
        for entry in entries {
            if entry.name.starts_with('.') || entry.name.starts_with('_') {
                continue;
            }
            let child_rel = join_path(rel_path, &entry.name);
            if entry.is_dir() {
                if let Some(child) =
                    self.walk_dir(&child_rel, entry.name.clone(), depth + 1, diagnostics)
                {
                    children.push((child.hint, entry.name, TreeEntry::Dir(child)));
                }
                continue;
            }
            if !is_doc_file(&entry.name) || self.is_excluded(&child_rel) {
                continue;
            }
            let Some(index) = self.add_doc(rel_path, &entry.name, diagnostics) else {
                continue;
            };
            if !rel_path.is_empty()
                && node.index_doc.is_none()
                && is_index_name(file_stem(&entry.name))
            {
                node.index_doc = Some(index);
                continue;
            }
            let hint = self.content.docs[index].hint;
            children.push((hint, entry.name, TreeEntry::Doc(index)));
        }

        children.sort_by(|a, b| compare_hints((a.0, &a.1), (b.0, &b.1)));
        node.children = children.into_iter().map(|(_, _, entry)| entry).collect();
        Some(node)
    }

    fn read_category(
        &self,
        dir: &str,
        entries: &[docsite_source::SourceEntry],
        diagnostics: &mut Diagnostics,
    ) -> Option<CategoryMeta> {
        let file = CATEGORY_FILES
            .iter()
            .find(|name| entries.iter().any(|e| !e.is_dir() && e.name == **name))?;
        let path = join_path(dir, file);
        let format = Format::from_path(Path::new(file))?;
        let parsed = self
            .source
            .read(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                docsite_config::parse_str::<CategoryMeta>(&content, format)
                    .map_err(|e| e.to_string())
            });
        match parsed {
            Ok(meta) => Some(meta),
            Err(message) => {
                diagnostics.warning(&path, format!("ignoring category metadata: {message}"));
                None
            }
        }
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_with(rel_path, EXCLUDE_OPTIONS))
    }

    fn add_doc(
        &mut self,
        dir_rel: &str,
        file_name: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<usize> {
        let source_path = join_path(&self.version.content_dir, &join_path(dir_rel, file_name));
        let content = match self.source.read(&source_path) {
            Ok(content) => content,
            Err(err) => {
                diagnostics.filesystem_error(&source_path, format!("cannot read doc: {err}"));
                return None;
            }
        };

        let (front_matter, body) = split_front_matter(&content);
        let front_matter = match front_matter.map(parse_front_matter).transpose() {
            Ok(front_matter) => front_matter.unwrap_or_default(),
            Err(message) => {
                diagnostics.warning(&source_path, format!("ignoring front matter: {message}"));
                FrontMatter::default()
            }
        };

        let FrontMatter {
            id: declared_id,
            title,
            sidebar_label,
            sidebar_position,
            slug,
        } = front_matter;

        let stem = file_stem(file_name);
        let (prefix_hint, stem_name) = strip_number_prefix(stem);
        let dir_id = dir_rel
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| strip_number_prefix(segment).1)
            .collect::<Vec<_>>()
            .join("/");
        let last_segment = declared_id.as_deref().unwrap_or(stem_name);
        let id = join_path(&dir_id, last_segment);

        let title = title
            .or_else(|| H1_RE.captures(body).map(|caps| caps[1].trim().to_owned()))
            .unwrap_or_else(|| titlecase_from_slug(last_segment));

        let slug_path = match slug.as_deref() {
            Some(slug) if slug.starts_with('/') => slug.to_owned(),
            Some(slug) => join_path(&dir_id, slug),
            None if is_index_name(stem) => dir_id.clone(),
            None => id.clone(),
        };
        let permalink = self
            .trailing_slash
            .apply(&join_route(&self.version.route, &slug_path));

        if let Some(&existing) = self.content.by_id.get(&id) {
            diagnostics.error(
                &source_path,
                format!(
                    "doc id {id:?} is already used by {}",
                    self.content.docs[existing].page.source
                ),
            );
            return None;
        }

        let page = DocPage {
            id: id.clone(),
            version: self.version.id.clone(),
            title,
            sidebar_label,
            sidebar_position,
            source: source_path,
            permalink,
            sidebar: None,
            previous: None,
            next: None,
        };
        let index = self.content.docs.len();
        self.content.docs.push(DiscoveredDoc {
            hint: page.sidebar_position.or(prefix_hint),
            page,
        });
        self.content.by_id.insert(id, index);
        Some(index)
    }
}

/// Field path naming a version's content directory.
pub(crate) fn content_dir_field(version: &DocVersion) -> FieldPath {
    if version.is_current() {
        FieldPath::new("docs").field("path")
    } else {
        version.field_path()
    }
}

/// Compile `docs.exclude` patterns, reporting invalid ones.
pub(crate) fn compile_excludes(patterns: &[String], diagnostics: &mut Diagnostics) -> Vec<Pattern> {
    let field = FieldPath::new("docs").field("exclude");
    patterns
        .iter()
        .enumerate()
        .filter_map(|(i, pattern)| {
            Pattern::new(pattern)
                .inspect_err(|e| {
                    diagnostics.error(field.index(i), format!("invalid glob {pattern:?}: {e}"));
                })
                .ok()
        })
        .collect()
}

/// Order by ascending hint; entries without hint last; ties by raw name.
pub(crate) fn compare_hints(a: (Option<f64>, &str), b: (Option<f64>, &str)) -> Ordering {
    match (a.0, b.0) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.1.cmp(b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(b.1),
    }
}

/// Split a leading number prefix off a name: `02-build` gives `(Some(2.0), "build")`.
pub(crate) fn strip_number_prefix(name: &str) -> (Option<f64>, &str) {
    let Some(caps) = NUMBER_PREFIX_RE.captures(name) else {
        return (None, name);
    };
    let number = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
    match (number, caps.get(2)) {
        (Some(number), Some(rest)) => (Some(f64::from(number)), rest.as_str()),
        _ => (None, name),
    }
}

fn is_doc_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOC_EXTENSIONS.contains(&ext))
}

fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

fn is_index_name(stem: &str) -> bool {
    let name = strip_number_prefix(stem).1;
    name.eq_ignore_ascii_case("index") || name.eq_ignore_ascii_case("readme")
}

/// Split `---` delimited YAML front matter from the body.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

fn parse_front_matter(yaml: &str) -> Result<FrontMatter, String> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(trimmed).map_err(|e| format!("Invalid YAML: {e}"))
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
