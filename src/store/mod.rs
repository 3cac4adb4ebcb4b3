//! Asset store abstraction
//!
//! The surrounding content host (asset database, importer records,
//! interactive dialogs) is modelled as the [`AssetStore`] trait so the
//! probing and classification logic stays independent of any one host.
//! This module contains:
//! - the trait and its error type (this file)
//! - shared data structures (data.rs)
//! - a filesystem store with JSON sidecar records (fs.rs)
//! - an in-memory store for tests and non-interactive embedding (memory.rs)

pub mod data;
pub mod fs;
pub mod memory;

pub use data::{ImportSettings, TextureKind};

use thiserror::Error;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No asset exists at the given path
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A persisted settings record failed to serialize or parse
    #[error("invalid import record for {path}: {source}")]
    InvalidRecord {
        path: String,
        source: serde_json::Error,
    },
}

/// The host-side collaborator every batch operation runs against.
///
/// Asset paths are `/`-separated strings, unique within a project. Writes
/// are staged via [`set_settings`](AssetStore::set_settings) and
/// [`mark_dirty`](AssetStore::mark_dirty), then flushed by a single
/// [`commit`](AssetStore::commit) per batch operation.
pub trait AssetStore {
    /// Recursively list the image assets under a folder identifier.
    fn list_images(&self, root: &str) -> Result<Vec<String>, StoreError>;

    /// Host-assigned kind for a path. `None` means the path is not a
    /// manageable image (no importer record); callers skip it silently.
    fn kind(&self, path: &str) -> Option<TextureKind>;

    /// Current import settings for a path, staged edits included. `None`
    /// mirrors [`kind`](AssetStore::kind) returning `None`.
    fn settings(&self, path: &str) -> Option<ImportSettings>;

    /// Stage new settings for a path. Not persisted until
    /// [`commit`](AssetStore::commit).
    fn set_settings(&mut self, path: &str, settings: ImportSettings);

    /// Raw file bytes for an asset. [`StoreError::NotFound`] when the file
    /// is missing at its expected location.
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Mark an asset's staged record for the next commit.
    fn mark_dirty(&mut self, path: &str);

    /// Flush every dirty staged record. Called at most once per batch
    /// operation.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Interactive yes/no gate. Non-interactive stores may answer with a
    /// fixed policy.
    fn confirm(&mut self, message: &str) -> bool;

    /// Append a line to the audit trail.
    fn log(&mut self, text: &str);
}
