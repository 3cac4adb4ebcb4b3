//! Metadata sniffing over a project tree
//!
//! The batch side of the pipeline: `scan` walks the selected folders and
//! reports textures grouped by kind, flagging `Default` textures that carry
//! real transparency without the alpha flag set. `fix` re-walks the same
//! folders and repairs exactly those flags, staging every write and
//! committing once. `sniff_and_fix` chains the two behind the store's
//! interactive confirmation gate.
//!
//! Both passes re-derive everything from current pixel and path state, so
//! running them twice over an unchanged tree changes nothing the second
//! time.

use crate::probe;
use crate::store::{AssetStore, StoreError, TextureKind};

/// Aggregate result of one scan invocation. Built fresh per scan and
/// immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Every image that had an importer record, whatever its kind
    pub scanned: usize,
    pub normal_count: usize,
    pub single_channel_count: usize,
    pub default_count: usize,
    /// Default textures with real transparency but no alpha flag
    pub alpha_missing_count: usize,
    pub log: Vec<String>,
}

impl ScanReport {
    /// One-line summary for dialogs and CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Scan result: {} normal maps, {} color ramps, {} textures missing the alpha flag.",
            self.normal_count, self.single_channel_count, self.alpha_missing_count
        )
    }

    /// True when no textures were found under the selected folders.
    pub fn is_empty(&self) -> bool {
        self.scanned == 0
    }
}

/// Aggregate result of one fix invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    pub fixed_count: usize,
    pub log: Vec<String>,
}

/// True when the stored bytes carry non-opaque pixels.
///
/// Missing files and undecodable payloads count as opaque: a texture we
/// cannot probe is never flagged or fixed.
fn has_alpha<S: AssetStore + ?Sized>(store: &S, path: &str) -> bool {
    store
        .read_bytes(path)
        .ok()
        .and_then(|bytes| probe::probe_alpha(&bytes).ok())
        .unwrap_or(false)
}

/// Scan every image under the given folders and report by kind.
///
/// Never mutates an asset. Assets without an importer record are skipped
/// silently; enumeration order is whatever the store yields. The assembled
/// log is also emitted through the store's audit sink.
pub fn scan<S: AssetStore>(store: &mut S, roots: &[String]) -> Result<ScanReport, StoreError> {
    let mut report = ScanReport::default();
    report.log.push("=== Texture metadata scan ===".to_string());

    for root in roots {
        for path in store.list_images(root)? {
            let Some(kind) = store.kind(&path) else {
                continue;
            };
            let Some(settings) = store.settings(&path) else {
                continue;
            };
            report.scanned += 1;

            match kind {
                TextureKind::NormalMap => {
                    report.normal_count += 1;
                    report.log.push(format!("[Normal Map] {path}"));
                }
                TextureKind::SingleChannel => {
                    report.single_channel_count += 1;
                    report.log.push(format!("[Color Ramp] {path}"));
                }
                TextureKind::Default => {
                    if has_alpha(store, &path) && !settings.alpha_is_transparency {
                        report.alpha_missing_count += 1;
                        report.log.push(format!("[Alpha Missing] {path}"));
                    } else {
                        report.default_count += 1;
                        report.log.push(format!("[Default] {path}"));
                    }
                }
                _ => {}
            }
        }
    }

    store.log(&report.log.join("\n"));
    Ok(report)
}

/// Set the alpha-transparency flag on every `Default` texture that uses
/// transparency but does not have it set.
///
/// Writes are staged per asset and flushed by one commit at the end of the
/// batch. Running fix twice over an unchanged tree fixes nothing the second
/// time.
pub fn fix<S: AssetStore>(store: &mut S, roots: &[String]) -> Result<FixReport, StoreError> {
    let mut report = FixReport::default();
    report.log.push("=== Texture metadata fix ===".to_string());

    for root in roots {
        for path in store.list_images(root)? {
            let Some(kind) = store.kind(&path) else {
                continue;
            };
            let Some(mut settings) = store.settings(&path) else {
                continue;
            };

            if kind != TextureKind::Default
                || settings.alpha_is_transparency
                || !has_alpha(store, &path)
            {
                continue;
            }

            settings.alpha_is_transparency = true;
            store.set_settings(&path, settings);
            store.mark_dirty(&path);
            report.fixed_count += 1;
            report.log.push(format!("[Fixed] {path}"));
        }
    }

    store.commit()?;
    store.log(&report.log.join("\n"));
    Ok(report)
}

/// Scan, surface the report, then fix behind the store's confirmation gate.
///
/// The report is always produced first; the fix pass only runs when the
/// store's `confirm` answers yes. An empty selection short-circuits with an
/// informational log line and never asks.
pub fn sniff_and_fix<S: AssetStore>(
    store: &mut S,
    roots: &[String],
) -> Result<(ScanReport, Option<FixReport>), StoreError> {
    let scan_report = scan(store, roots)?;

    if scan_report.is_empty() {
        store.log("No textures found under the selected folders.");
        return Ok((scan_report, None));
    }

    let message = format!(
        "{}\n\nFix textures with missing alpha flags?",
        scan_report.summary()
    );
    if !store.confirm(&message) {
        return Ok((scan_report, None));
    }

    let fix_report = fix(store, roots)?;
    Ok((scan_report, Some(fix_report)))
}
