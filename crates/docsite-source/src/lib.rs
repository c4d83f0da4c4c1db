//! Read-only document source abstraction for docsite.
//!
//! This crate provides a [`DocSource`] trait for listing directories and reading
//! files below a site root. The resolver only talks to this trait, which keeps
//! resolution independent of the real filesystem:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Deterministic snapshots**: listings are sorted by name
//! - **Clean separation** between sidebar generation and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`DocSource`] trait with `list()`, `read()`, and `exists()` methods
//! - [`FsSource`] implementation backed by a directory on disk
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docsite_source::{DocSource, FsSource};
//!
//! let source = FsSource::new(PathBuf::from("website"));
//! for entry in source.list("docs")? {
//!     println!("{} ({:?})", entry.name, entry.kind);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::{DocSource, EntryKind, SourceEntry, SourceError, SourceErrorKind, join_path};
