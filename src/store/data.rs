//! Shared data structures for the asset store layer
//!
//! These structs represent the per-texture record that flows between the
//! store implementations and the classification logic.

use serde::{Deserialize, Serialize};

/// Host-assigned texture kind.
///
/// The kind is read from the store, never inferred from pixel content. Only
/// `Default`, `NormalMap` and `SingleChannel` take part in classification;
/// every other kind passes through the pipeline untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Ordinary color texture
    Default,
    /// Tangent-space normal map; its alpha channel carries data, not
    /// transparency
    NormalMap,
    /// Single-channel data texture (lookup ramps, masks)
    SingleChannel,
    Sprite,
    Cursor,
    Lightmap,
}

/// Per-texture import settings.
///
/// This is the record the pipeline reads, modifies and stages back into the
/// store. The pipeline never caches it across invocations: every run
/// re-derives policy from current pixel and path state, which is what makes
/// the batch operations idempotent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    /// Upper bound on the imported resolution, always a power of two
    pub max_texture_size: u32,
    /// Whether crunched compression is enabled for this texture
    pub crunched_compression: bool,
    /// Crunch compression quality (0-100)
    pub compression_quality: u8,
    /// Whether mipmap generation is enabled
    pub mipmap_enabled: bool,
    /// Whether mipmap levels are loaded on demand rather than all at once
    pub streaming_mipmaps: bool,
    /// Streaming priority; the pipeline always resets this to 0
    pub streaming_mipmaps_priority: i32,
    /// Whether the alpha channel is treated as transparency
    pub alpha_is_transparency: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_texture_size: 2048,
            crunched_compression: false,
            compression_quality: 50,
            mipmap_enabled: true,
            streaming_mipmaps: false,
            streaming_mipmaps_priority: 0,
            alpha_is_transparency: false,
        }
    }
}

impl ImportSettings {
    /// Convert to JSON for sidecar storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON sidecar record
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
