//! Diagnostics collected while loading and resolving a site configuration.
//!
//! Validation problems are accumulated into a [`Diagnostics`] report instead of
//! aborting on the first one, so a single pass surfaces every issue. Each entry
//! carries a human-readable field path built with [`FieldPath`], for example
//! `docs.versions["v0.50.x"].path` or `navbar.items[1].href`.

use std::fmt;

use serde::Serialize;

/// Diagnostic severity.
///
/// Only [`Severity::Error`] blocks resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, does not block resolution.
    Warning,
    /// Blocks resolution.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Semantic violation in the configuration document.
    Validation,
    /// Directory or file needed for resolution is missing or unreadable.
    Filesystem,
    /// Field or value that is still accepted but slated for removal.
    Deprecation,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => f.write_str("validation"),
            Self::Filesystem => f.write_str("filesystem"),
            Self::Deprecation => f.write_str("deprecation"),
        }
    }
}

/// A single reported problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity of the problem.
    pub severity: Severity,
    /// Problem category.
    pub kind: DiagnosticKind,
    /// Field path of the offending value.
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.kind, self.path, self.message
        )
    }
}

/// Ordered collection of diagnostics.
///
/// Entries keep insertion order so reports are stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validation error.
    pub fn error(&mut self, path: impl fmt::Display, message: impl Into<String>) {
        self.push(Severity::Error, DiagnosticKind::Validation, path, message);
    }

    /// Record a validation warning.
    pub fn warning(&mut self, path: impl fmt::Display, message: impl Into<String>) {
        self.push(Severity::Warning, DiagnosticKind::Validation, path, message);
    }

    /// Record a filesystem error.
    pub fn filesystem_error(&mut self, path: impl fmt::Display, message: impl Into<String>) {
        self.push(Severity::Error, DiagnosticKind::Filesystem, path, message);
    }

    /// Record a deprecation warning.
    pub fn deprecated(&mut self, path: impl fmt::Display, message: impl Into<String>) {
        self.push(Severity::Warning, DiagnosticKind::Deprecation, path, message);
    }

    /// Record a diagnostic with explicit severity and kind.
    pub fn push(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        path: impl fmt::Display,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            severity,
            kind,
            path: path.to_string(),
            message: message.into(),
        });
    }

    /// Append all entries of another report.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// True if any entry has error severity.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Number of error-severity entries.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning-severity entries.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True if the report has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Entries with error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Dotted field path into the configuration document.
///
/// ```
/// use docsite_config::FieldPath;
///
/// let path = FieldPath::new("docs").field("versions").key("v0.50.x").field("path");
/// assert_eq!(path.to_string(), r#"docs.versions["v0.50.x"].path"#);
/// assert_eq!(FieldPath::new("navbar").field("items").index(2).to_string(), "navbar.items[2]");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// Start a path at a top-level key.
    #[must_use]
    pub fn new(root: &str) -> Self {
        Self(root.to_owned())
    }

    /// Descend into a named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Descend into a list element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Descend into a mapping entry with an arbitrary key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{key:?}]", self.0))
    }

    /// Path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
