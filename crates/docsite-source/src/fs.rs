//! Filesystem-backed document source.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::source::{DocSource, EntryKind, SourceEntry, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Document source reading from a directory on disk.
///
/// All paths are resolved below `root`. Hidden entries are skipped and
/// symbolic links to directories are not listed, so traversal cannot loop.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative source path to a filesystem path below the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(SourceError::new(SourceErrorKind::InvalidPath)
                        .with_backend(BACKEND)
                        .with_path(path));
                }
            }
        }
        Ok(resolved)
    }
}

impl DocSource for FsSource {
    fn list(&self, dir: &str) -> Result<Vec<SourceEntry>, SourceError> {
        let dir_path = self.resolve(dir)?;
        debug!(dir = %dir_path.display(), "listing directory");

        let read_dir =
            fs::read_dir(&dir_path).map_err(|e| SourceError::io(e, dir).with_backend(BACKEND))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| SourceError::io(e, dir).with_backend(BACKEND))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip hidden files/dirs
            if name.starts_with('.') {
                continue;
            }

            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_symlink() && entry.path().is_file() {
                // Symlinked files are readable; symlinked directories are not followed
                EntryKind::File
            } else {
                continue;
            };
            entries.push(SourceEntry { name, kind });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String, SourceError> {
        let file_path = self.resolve(path)?;
        fs::read_to_string(&file_path).map_err(|e| SourceError::io(e, path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }
}
