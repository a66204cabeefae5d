//! Snapshot build pass and publication.
//!
//! A [`NetworkDefinition`] is validated and turned into an immutable
//! [`TransitSnapshot`]; a [`SnapshotHandle`] shares the current snapshot
//! and swaps in new ones.

mod build;
mod config;
pub mod def;
mod error;
mod handle;
mod issue;
mod load;

pub use build::{PatternEntry, TransitSnapshot};
pub use config::BuildConfig;
pub use def::NetworkDefinition;
pub use error::{BuildError, LoadError};
pub use handle::SnapshotHandle;
pub use issue::ImportIssue;
pub use load::load_definition;
