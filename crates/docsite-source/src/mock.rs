//! Mock source implementation for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};

use crate::source::{DocSource, EntryKind, SourceEntry, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Normalize a source path: strip `./`, leading and trailing separators.
fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Mock source for testing.
///
/// Stores files in memory. Directories are implied by file paths; empty
/// directories can be added with [`MockSource::with_dir`]. Use the builder
/// methods to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use docsite_source::{DocSource, MockSource};
///
/// let source = MockSource::new()
///     .with_file("docs/01-intro.md", "# Intro")
///     .with_file("docs/02-build.md", "# Build");
///
/// let entries = source.list("docs").unwrap();
/// ```
#[derive(Debug, Default, Clone)]
pub struct MockSource {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
    unreadable: BTreeSet<String>,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.files.insert(normalize(path), content.into());
        self
    }

    /// Add an (empty) directory.
    #[must_use]
    pub fn with_dir(mut self, path: &str) -> Self {
        self.dirs.insert(normalize(path));
        self
    }

    /// Make listing or reading a path fail with a permission error.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(normalize(path));
        self
    }

    fn is_dir(&self, path: &str) -> bool {
        if path.is_empty() || self.dirs.contains(path) {
            return true;
        }
        let prefix = format!("{path}/");
        self.files.keys().any(|f| f.starts_with(&prefix))
            || self.dirs.iter().any(|d| d.starts_with(&prefix))
    }

    fn check_readable(&self, path: &str) -> Result<(), SourceError> {
        if self.unreadable.contains(path) {
            return Err(SourceError::new(SourceErrorKind::PermissionDenied)
                .with_backend(BACKEND)
                .with_path(path));
        }
        Ok(())
    }
}

impl DocSource for MockSource {
    fn list(&self, dir: &str) -> Result<Vec<SourceEntry>, SourceError> {
        let dir = normalize(dir);
        self.check_readable(&dir)?;
        if self.files.contains_key(&dir) {
            return Err(SourceError::new(SourceErrorKind::NotADirectory)
                .with_backend(BACKEND)
                .with_path(dir));
        }
        if !self.is_dir(&dir) {
            return Err(SourceError::not_found(dir).with_backend(BACKEND));
        }

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        // BTreeMap keeps names sorted and deduplicated
        let mut entries: BTreeMap<String, EntryKind> = BTreeMap::new();
        let candidates = self
            .files
            .keys()
            .map(|p| (p, false))
            .chain(self.dirs.iter().map(|p| (p, true)));
        for (path, is_dir_entry) in candidates {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let kind = match rest.split_once('/') {
                Some((child, _)) => {
                    entries.insert(child.to_owned(), EntryKind::Dir);
                    continue;
                }
                None if is_dir_entry => EntryKind::Dir,
                None => EntryKind::File,
            };
            entries.entry(rest.to_owned()).or_insert(kind);
        }

        Ok(entries
            .into_iter()
            .filter(|(name, _)| !name.starts_with('.'))
            .map(|(name, kind)| SourceEntry { name, kind })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        let path = normalize(path);
        self.check_readable(&path)?;
        self.files
            .get(&path)
            .cloned()
            .ok_or_else(|| SourceError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        let path = normalize(path);
        self.files.contains_key(&path) || self.is_dir(&path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_derives_directories() {
        let source = MockSource::new()
            .with_file("docs/01-intro.md", "# Intro")
            .with_file("docs/02-build/01-setup.md", "# Setup")
            .with_file("docs/02-build/02-run.md", "# Run")
            .with_dir("docs/03-empty");

        assert_eq!(
            source.list("docs").unwrap(),
            vec![
                SourceEntry::file("01-intro.md"),
                SourceEntry::dir("02-build"),
                SourceEntry::dir("03-empty"),
            ]
        );
        assert_eq!(source.list("docs/03-empty").unwrap(), vec![]);
    }

    #[test]
    fn test_list_root() {
        let source = MockSource::new()
            .with_file("docsite.toml", "")
            .with_file("docs/intro.md", "# Intro");

        assert_eq!(
            source.list(".").unwrap(),
            vec![SourceEntry::dir("docs"), SourceEntry::file("docsite.toml")]
        );
    }

    #[test]
    fn test_list_missing_dir() {
        let source = MockSource::new().with_file("docs/intro.md", "# Intro");

        let err = source.list("versioned_docs").unwrap_err();
        assert_eq!(err.kind(), &SourceErrorKind::NotFound);
        assert_eq!(err.to_string(), "[Mock] Not found (path: versioned_docs)");
    }

    #[test]
    fn test_list_file_is_not_a_directory() {
        let source = MockSource::new().with_file("docs/intro.md", "# Intro");

        let err = source.list("docs/intro.md").unwrap_err();
        assert_eq!(err.kind(), &SourceErrorKind::NotADirectory);
    }

    #[test]
    fn test_unreadable_dir() {
        let source = MockSource::new()
            .with_file("docs/intro.md", "# Intro")
            .with_unreadable("docs");

        let err = source.list("./docs/").unwrap_err();
        assert_eq!(err.kind(), &SourceErrorKind::PermissionDenied);
    }

    #[test]
    fn test_read_and_exists() {
        let source = MockSource::new().with_file("sidebars.json", "{}");

        assert_eq!(source.read("./sidebars.json").unwrap(), "{}");
        assert!(source.exists("sidebars.json"));
        assert!(!source.exists("sidebars.yaml"));
        assert!(source.read("sidebars.yaml").is_err());
    }
}
