//! Site resolution for docsite.
//!
//! This crate turns a parsed [`docsite_config::SiteDocument`] into an
//! immutable [`ResolvedSite`]:
//! - [`VersionResolver`]: documentation versions, their paths and banners
//! - Sidebar tree building from declarations and the docs directory layout
//! - [`RouteValidator`]: route syntax, duplicates, redirects and broken links
//! - [`SiteAssembler`]: runs everything and returns [`Resolved`] or [`Rejected`]
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use docsite_config::SiteDocument;
//! use docsite_resolve::SiteAssembler;
//!
//! let loaded = SiteDocument::load(Some(Path::new("website/docsite.toml")), None)?;
//! match SiteAssembler::from_loaded(loaded).assemble() {
//!     Ok(resolved) => println!("{}", resolved.site().to_json()?),
//!     Err(rejected) => {
//!         for diagnostic in rejected.diagnostics().iter() {
//!             eprintln!("{diagnostic}");
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod assemble;
mod docs;
mod links;
pub mod plugins;
pub mod route;
mod sidebar;
mod validate;
mod version;

pub use assemble::{
    Rejected, Resolved, ResolvedRedirect, ResolvedSite, RouteEntry, RouteKind, SiteAssembler,
};
pub use docs::{DocPage, MAX_DEPTH, PageLink};
pub use links::{FooterLink, FooterSection, NavEntry, NavKind};
pub use plugins::ResolvedPlugin;
pub use route::TrailingSlash;
pub use sidebar::{CategoryLink, SidebarNode, Sidebars};
pub use validate::{ClaimKind, RouteValidator};
pub use version::{Banner, CURRENT_VERSION, DocVersion, VersionResolver};
