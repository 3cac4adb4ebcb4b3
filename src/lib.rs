//! Texture import preprocessing
//!
//! This crate inspects raw pixel data to derive correct texture import
//! settings and applies them across a project tree:
//! - `probe` decodes an image payload into dimensions and sampled alpha usage
//! - `policy` assigns max size and crunch compression quality from the
//!   probed dimensions and the asset's naming convention
//! - `sniffer` scans a folder tree for metadata issues and fixes missing
//!   alpha-transparency flags in an idempotent batch pass
//! - `processor` hosts the per-import hook and the manual crunch pass
//!
//! The surrounding content host (asset database, importer records, editor
//! menus) is abstracted behind the [`store::AssetStore`] trait. Two stores
//! ship with the crate: a filesystem store with JSON sidecar records and an
//! in-memory store for tests and non-interactive embedding.

pub mod policy;
pub mod probe;
pub mod processor;
pub mod sniffer;
pub mod store;

pub use policy::{Classifier, PolicyConfig, PolicyNote};
pub use probe::{probe, probe_alpha, ImageMetrics, ProbeError};
pub use processor::{apply_crunch, preprocess_texture, ApplyReport};
pub use sniffer::{fix, scan, sniff_and_fix, FixReport, ScanReport};
pub use store::{AssetStore, ImportSettings, StoreError, TextureKind};
