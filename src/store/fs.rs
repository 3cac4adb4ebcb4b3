//! Filesystem-backed asset store
//!
//! Treats a project directory as the asset database: image files are the
//! assets, and each one's import record lives in a JSON sidecar next to it
//! (`rock.png` -> `rock.png.import.json`). A missing sidecar yields a
//! default record whose kind follows the project's file naming convention,
//! so a fresh tree is immediately scannable. Writes are staged in memory
//! and flushed to the sidecars by a single `commit` per batch.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::{AssetStore, ImportSettings, StoreError, TextureKind};

/// File extensions treated as importable images
const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "bmp", "gif", "tga", "tif", "tiff", "webp",
];

/// Suffix appended to an image path to form its sidecar path
const SIDECAR_SUFFIX: &str = ".import.json";

/// Audit log file, created in the project root
const AUDIT_LOG_FILE: &str = "texture-crunch.log";

/// The record persisted in a sidecar: the host-assigned kind plus the
/// import settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
struct ImportRecord {
    kind: TextureKind,
    settings: ImportSettings,
}

/// Asset store rooted at a project directory on disk.
pub struct FsStore {
    base: PathBuf,
    staged: BTreeMap<String, ImportRecord>,
    dirty: BTreeSet<String>,
    assume_yes: bool,
}

impl FsStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            staged: BTreeMap::new(),
            dirty: BTreeSet::new(),
            assume_yes: false,
        }
    }

    /// Answer every confirmation prompt with yes, for non-interactive runs.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.base.join(path)
    }

    fn sidecar_path(&self, path: &str) -> PathBuf {
        self.base.join(format!("{path}{SIDECAR_SUFFIX}"))
    }

    fn is_image(path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                IMAGE_EXTENSIONS.contains(&ext.as_str())
            }
            None => false,
        }
    }

    /// Kind assigned to an image with no sidecar, from the file naming
    /// convention: `_n`/`_nrm`/`_normal` stems are normal maps,
    /// `_ramp`/`_lut`/`_mask` stems are single-channel data textures.
    fn default_kind(path: &str) -> TextureKind {
        let stem = Path::new(path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if ["_n", "_nrm", "_normal"].iter().any(|s| stem.ends_with(s)) {
            TextureKind::NormalMap
        } else if ["_ramp", "_lut", "_mask"].iter().any(|s| stem.ends_with(s)) {
            TextureKind::SingleChannel
        } else {
            TextureKind::Default
        }
    }

    /// Current record for a path: staged edits win, then the on-disk
    /// sidecar, then a defaulted record for recognized images. `None` for
    /// anything that is not a manageable image.
    fn load_record(&self, path: &str) -> Option<ImportRecord> {
        if let Some(record) = self.staged.get(path) {
            return Some(*record);
        }

        let sidecar = self.sidecar_path(path);
        if sidecar.is_file() {
            match fs::read_to_string(&sidecar) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(record) => return Some(record),
                    Err(e) => {
                        eprintln!("⚠️  Ignoring corrupt sidecar for {path}: {e}");
                    }
                },
                Err(e) => {
                    eprintln!("⚠️  Could not read sidecar for {path}: {e}");
                }
            }
        }

        if Self::is_image(&self.absolute(path)) {
            return Some(ImportRecord {
                kind: Self::default_kind(path),
                settings: ImportSettings::default(),
            });
        }

        None
    }
}

impl AssetStore for FsStore {
    fn list_images(&self, root: &str) -> Result<Vec<String>, StoreError> {
        let root = if root.is_empty() { "." } else { root };
        let dir = self.base.join(root);
        if !dir.is_dir() {
            return Err(StoreError::NotFound(root.to_string()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !Self::is_image(path) {
                continue;
            }

            if let Ok(rel) = path.strip_prefix(&self.base) {
                paths.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }

        Ok(paths)
    }

    fn kind(&self, path: &str) -> Option<TextureKind> {
        self.load_record(path).map(|record| record.kind)
    }

    fn settings(&self, path: &str) -> Option<ImportSettings> {
        self.load_record(path).map(|record| record.settings)
    }

    fn set_settings(&mut self, path: &str, settings: ImportSettings) {
        let Some(mut record) = self.load_record(path) else {
            return;
        };
        record.settings = settings;
        self.staged.insert(path.to_string(), record);
    }

    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        fs::read(self.absolute(path)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_string())
            } else {
                StoreError::Io(e)
            }
        })
    }

    fn mark_dirty(&mut self, path: &str) {
        self.dirty.insert(path.to_string());
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let mut written = 0usize;
        for path in &self.dirty {
            let Some(record) = self.staged.get(path) else {
                continue;
            };

            let json = serde_json::to_string_pretty(record).map_err(|source| {
                StoreError::InvalidRecord {
                    path: path.clone(),
                    source,
                }
            })?;
            fs::write(self.sidecar_path(path), json)?;
            written += 1;
        }

        self.dirty.clear();
        if written > 0 {
            println!("💾 Saved {written} import record(s)");
        }

        Ok(())
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            println!("{message}\n(auto-confirmed)");
            return true;
        }

        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn log(&mut self, text: &str) {
        println!("{text}");

        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.base.join(AUDIT_LOG_FILE))
            .and_then(|mut file| writeln!(file, "[{stamp}] {text}"));

        // The audit file is best effort; a failed write never aborts a batch.
        if let Err(e) = result {
            eprintln!("⚠️  Could not write audit log: {e}");
        }
    }
}
