//! Source trait and error types.
//!
//! Provides the core [`DocSource`] trait for abstracting directory listing and
//! file reading, along with [`SourceError`] for unified error handling across
//! backends.
//!
//! # Path Convention
//!
//! All path parameters are `/`-separated paths relative to the site root:
//! - `""` or `"."` - the site root
//! - `"docs"` - a directory
//! - `"versioned_docs/version-v0.50.x/01-intro.md"` - a file
//!
//! Absolute paths and `..` components are rejected with
//! [`SourceErrorKind::InvalidPath`].

/// Kind of a listed entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEntry {
    /// File or directory name (no path separators).
    pub name: String,
    /// Entry kind.
    pub kind: EntryKind,
}

impl SourceEntry {
    /// Create a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry.
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }

    /// True for directories.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Path escapes the root or is otherwise unusable.
    InvalidPath,
    /// Path exists but has the wrong kind (file vs directory).
    NotADirectory,
    /// Other/unknown error category.
    Other,
}

/// Source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    kind: SourceErrorKind,
    path: Option<String>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::NotFound).with_path(path)
    }

    /// Create a source error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => SourceErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::NotADirectory => SourceErrorKind::NotADirectory,
            _ => SourceErrorKind::Other,
        };
        Self::new(kind).with_source(err).with_path(path)
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> &SourceErrorKind {
        &self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: docs/intro.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidPath => "Invalid path",
            SourceErrorKind::NotADirectory => "Not a directory",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only view of the site directory tree.
///
/// Implementations must be deterministic: repeated calls against the same
/// snapshot return identical results. Listings never include hidden entries
/// (leading `.`) and never descend through symbolic links to directories, so
/// the visible tree is acyclic.
pub trait DocSource: Send + Sync {
    /// List a directory, sorted by entry name.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the directory does not exist, is a file, or
    /// cannot be read.
    fn list(&self, dir: &str) -> Result<Vec<SourceEntry>, SourceError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file doesn't exist or can't be read.
    fn read(&self, path: &str) -> Result<String, SourceError>;

    /// Check whether a file or directory exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &str) -> bool;
}

/// Join a relative directory and an entry name with `/`.
///
/// The root (`""` or `"."`) is elided.
///
/// ```
/// use docsite_source::join_path;
///
/// assert_eq!(join_path("", "docs"), "docs");
/// assert_eq!(join_path(".", "intro.md"), "intro.md");
/// assert_eq!(join_path("docs/guides", "install.md"), "docs/guides/install.md");
/// ```
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        name.to_owned()
    } else if name.is_empty() || name == "." {
        dir.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}
