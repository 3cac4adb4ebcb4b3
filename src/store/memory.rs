//! In-memory asset store
//!
//! A deterministic store for tests and non-interactive embedding: ordered
//! entries, a canned answer for the confirmation gate, captured log lines
//! and a commit counter. Staging semantics match the filesystem store.

use std::collections::{BTreeMap, BTreeSet};

use super::{AssetStore, ImportSettings, StoreError, TextureKind};

/// One asset held by the store.
#[derive(Debug, Clone)]
struct MemoryAsset {
    /// File bytes; `None` simulates a listed asset whose file is missing
    bytes: Option<Vec<u8>>,
    /// Importer record; `None` simulates an asset with no importer
    importer: Option<(TextureKind, ImportSettings)>,
}

/// Asset store backed by plain maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    assets: BTreeMap<String, MemoryAsset>,
    dirty: BTreeSet<String>,
    confirm_answer: bool,
    confirm_prompts: Vec<String>,
    log_lines: Vec<String>,
    commit_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the answer returned by the confirmation gate.
    pub fn confirm_with(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    /// Add an image with default settings.
    pub fn insert(&mut self, path: &str, kind: TextureKind, bytes: Vec<u8>) {
        self.insert_with_settings(path, kind, bytes, ImportSettings::default());
    }

    /// Add an image with explicit settings.
    pub fn insert_with_settings(
        &mut self,
        path: &str,
        kind: TextureKind,
        bytes: Vec<u8>,
        settings: ImportSettings,
    ) {
        self.assets.insert(
            path.to_string(),
            MemoryAsset {
                bytes: Some(bytes),
                importer: Some((kind, settings)),
            },
        );
    }

    /// Add a listed asset that has no importer record.
    pub fn insert_unmanaged(&mut self, path: &str, bytes: Vec<u8>) {
        self.assets.insert(
            path.to_string(),
            MemoryAsset {
                bytes: Some(bytes),
                importer: None,
            },
        );
    }

    /// Add an image whose file is missing at its expected location.
    pub fn insert_missing_file(&mut self, path: &str, kind: TextureKind) {
        self.assets.insert(
            path.to_string(),
            MemoryAsset {
                bytes: None,
                importer: Some((kind, ImportSettings::default())),
            },
        );
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log_lines
    }

    pub fn confirm_prompts(&self) -> &[String] {
        &self.confirm_prompts
    }

    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.dirty.contains(path)
    }
}

impl AssetStore for MemoryStore {
    fn list_images(&self, root: &str) -> Result<Vec<String>, StoreError> {
        let prefix = if root.is_empty() || root == "." {
            String::new()
        } else {
            format!("{root}/")
        };

        Ok(self
            .assets
            .keys()
            .filter(|path| path.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn kind(&self, path: &str) -> Option<TextureKind> {
        self.assets
            .get(path)
            .and_then(|asset| asset.importer)
            .map(|(kind, _)| kind)
    }

    fn settings(&self, path: &str) -> Option<ImportSettings> {
        self.assets
            .get(path)
            .and_then(|asset| asset.importer)
            .map(|(_, settings)| settings)
    }

    fn set_settings(&mut self, path: &str, settings: ImportSettings) {
        if let Some(asset) = self.assets.get_mut(path) {
            if let Some((kind, _)) = asset.importer {
                asset.importer = Some((kind, settings));
            }
        }
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.assets
            .get(path)
            .and_then(|asset| asset.bytes.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn mark_dirty(&mut self, path: &str) {
        self.dirty.insert(path.to_string());
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.commit_count += 1;
        self.dirty.clear();
        Ok(())
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirm_prompts.push(message.to_string());
        self.confirm_answer
    }

    fn log(&mut self, text: &str) {
        self.log_lines.push(text.to_string());
    }
}
