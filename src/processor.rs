//! Import-time texture processing
//!
//! `preprocess_texture` is the per-image hook a host invokes synchronously
//! while importing an asset: probe the bytes, classify, stage the resulting
//! settings before the import is finalized. `apply_crunch` is the manual
//! batch counterpart, running the same hook over whole folders and
//! committing once at the end.

use crate::policy::Classifier;
use crate::probe;
use crate::store::{AssetStore, ImportSettings, StoreError};

/// Aggregate result of one manual crunch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied_count: usize,
    pub log: Vec<String>,
}

/// Apply the import policy to a single texture.
///
/// Returns the staged settings, or `None` when the path has no importer
/// record or its kind is not a classification target. Probe failures are
/// absorbed into the classifier's fallback; any policy warnings are logged
/// through the store paired with the asset path. The caller owns
/// persistence; for the automatic import path the host commits as part of
/// its own pipeline.
pub fn preprocess_texture<S: AssetStore>(
    store: &mut S,
    classifier: &Classifier,
    path: &str,
) -> Option<ImportSettings> {
    let kind = store.kind(path)?;
    if !classifier.targets(kind) {
        return None;
    }
    let mut settings = store.settings(path)?;

    let metrics = store
        .read_bytes(path)
        .ok()
        .and_then(|bytes| probe::probe(&bytes).ok());
    let has_alpha = metrics.map(|m| m.has_alpha).unwrap_or(false);

    for note in classifier.classify(path, kind, metrics, has_alpha, &mut settings) {
        store.log(&note.describe(path));
    }

    store.set_settings(path, settings);
    Some(settings)
}

/// Run the import policy over every texture under the given folders.
///
/// Each applied asset is staged and marked dirty; one commit flushes the
/// whole batch. Zero applicable textures is an informational outcome, not
/// an error.
pub fn apply_crunch<S: AssetStore>(
    store: &mut S,
    classifier: &Classifier,
    roots: &[String],
) -> Result<ApplyReport, StoreError> {
    let mut report = ApplyReport::default();
    report.log.push("=== Crunch compression pass ===".to_string());

    for root in roots {
        for path in store.list_images(root)? {
            let Some(settings) = preprocess_texture(store, classifier, &path) else {
                continue;
            };

            store.mark_dirty(&path);
            report.applied_count += 1;
            report.log.push(format!(
                "[Crunched] {path} (quality {}, max size {})",
                settings.compression_quality, settings.max_texture_size
            ));
        }
    }

    store.commit()?;
    store.log(&report.log.join("\n"));
    Ok(report)
}
