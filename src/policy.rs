//! Compression policy classification
//!
//! Turns probed dimensions plus the asset's naming convention into concrete
//! import settings: max texture size, crunch compression quality, mipmap
//! flags and the alpha-transparency flag. The quality rules are explicit
//! string-matching heuristics ("ramp", "matcap"): a naming convention, not
//! content analysis, and intentionally kept that way.

use serde::{Deserialize, Serialize};

use crate::probe::ImageMetrics;
use crate::store::{ImportSettings, TextureKind};

/// Texture kinds eligible for classification. Everything else passes
/// through untouched.
const TARGET_KINDS: [TextureKind; 3] = [
    TextureKind::Default,
    TextureKind::NormalMap,
    TextureKind::SingleChannel,
];

/// Named constants driving classification.
///
/// Constructed once and handed to [`Classifier::new`]; there are no mutable
/// globals. Serializable so a project can keep its own tuning in a JSON
/// file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Crunch quality for ordinary textures
    pub default_quality: u8,
    /// Crunch quality for textures whose path matches a quality hint
    pub ramp_matcap_quality: u8,
    /// Case-insensitive path substrings that select the higher quality tier
    pub quality_hints: Vec<String>,
    /// Max texture size applied when the source image cannot be read
    pub fallback_max_size: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default_quality: 50,
            ramp_matcap_quality: 75,
            quality_hints: vec!["ramp".to_string(), "matcap".to_string()],
            fallback_max_size: 2048,
        }
    }
}

impl PolicyConfig {
    /// Convert to JSON for storage in a project config file
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON config file
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Warnings raised while classifying a texture.
///
/// Notes are informational signals, never errors: classification always
/// completes. Callers pair each note with the asset path when logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyNote {
    /// The source image could not be read or decoded, so the fallback max
    /// size was applied instead of the native resolution
    FallbackMaxSize,
    /// Mipmaps were disabled before classification forced them on
    MipmapsWereDisabled,
}

impl PolicyNote {
    /// Render the note as an audit log line for the given asset path.
    pub fn describe(&self, path: &str) -> String {
        match self {
            PolicyNote::FallbackMaxSize => {
                format!("warning: could not read size for {path}, using fallback max size")
            }
            PolicyNote::MipmapsWereDisabled => {
                format!("warning: texture missing mipmaps: {path}")
            }
        }
    }
}

/// Assigns import settings from path and probed metrics.
pub struct Classifier {
    config: PolicyConfig,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl Classifier {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Whether a texture kind takes part in classification.
    pub fn targets(&self, kind: TextureKind) -> bool {
        TARGET_KINDS.contains(&kind)
    }

    /// Quality tier for a path, by case-insensitive substring match against
    /// the configured hints.
    pub fn quality_for(&self, path: &str) -> u8 {
        let lower = path.to_ascii_lowercase();
        let hinted = self
            .config
            .quality_hints
            .iter()
            .any(|hint| lower.contains(&hint.to_ascii_lowercase()));

        if hinted {
            self.config.ramp_matcap_quality
        } else {
            self.config.default_quality
        }
    }

    /// Rewrite `settings` with the policy for this texture.
    ///
    /// Untargeted kinds return immediately with the settings untouched.
    /// Absent metrics (a failed probe) select the fallback max size and
    /// raise a note; that is an expected, handled case, not an error path.
    ///
    /// The alpha-transparency flag is only ever set here, never cleared,
    /// and only for `Default` textures: a normal map's alpha channel
    /// encodes non-color data, and single-channel ramps have no real
    /// transparency either.
    pub fn classify(
        &self,
        path: &str,
        kind: TextureKind,
        metrics: Option<ImageMetrics>,
        has_alpha: bool,
        settings: &mut ImportSettings,
    ) -> Vec<PolicyNote> {
        if !self.targets(kind) {
            return Vec::new();
        }

        let mut notes = Vec::new();

        settings.max_texture_size = match metrics {
            Some(m) => m.width.max(m.height).next_power_of_two(),
            None => {
                notes.push(PolicyNote::FallbackMaxSize);
                self.config.fallback_max_size
            }
        };

        if !settings.mipmap_enabled {
            notes.push(PolicyNote::MipmapsWereDisabled);
        }

        settings.mipmap_enabled = true;
        settings.streaming_mipmaps = true;
        settings.streaming_mipmaps_priority = 0;
        settings.crunched_compression = true;
        settings.compression_quality = self.quality_for(path);

        if kind == TextureKind::Default && has_alpha {
            settings.alpha_is_transparency = true;
        }

        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32, height: u32, has_alpha: bool) -> ImageMetrics {
        ImageMetrics {
            width,
            height,
            has_alpha,
        }
    }

    #[test]
    fn test_max_size_is_next_power_of_two() {
        let classifier = Classifier::default();

        for (w, h, expected) in [
            (300, 150, 512),
            (1024, 1024, 1024),
            (1, 1, 1),
            (513, 100, 1024),
            (100, 2049, 4096),
        ] {
            let mut settings = ImportSettings::default();
            classifier.classify(
                "a.png",
                TextureKind::Default,
                Some(metrics(w, h, false)),
                false,
                &mut settings,
            );
            assert_eq!(settings.max_texture_size, expected, "for {w}x{h}");

            // Powers of two are fixed points of the rounding
            assert_eq!(
                settings.max_texture_size.next_power_of_two(),
                settings.max_texture_size
            );
        }
    }

    #[test]
    fn test_quality_hints_match_any_casing() {
        let classifier = Classifier::default();

        assert_eq!(classifier.quality_for("Textures/RockMatCap.png"), 75);
        assert_eq!(classifier.quality_for("Assets/sky_RAMP.tga"), 75);
        assert_eq!(classifier.quality_for("Textures/brick.png"), 50);
        assert_eq!(classifier.quality_for("MATCAP/steel.png"), 75);
    }

    #[test]
    fn test_fallback_emits_exactly_one_note() {
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();

        let notes = classifier.classify("broken.png", TextureKind::Default, None, false, &mut settings);

        assert_eq!(settings.max_texture_size, 2048);
        assert_eq!(notes, vec![PolicyNote::FallbackMaxSize]);
    }

    #[test]
    fn test_disabled_mipmaps_raise_a_note_before_forcing() {
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();
        settings.mipmap_enabled = false;

        let notes = classifier.classify(
            "a.png",
            TextureKind::Default,
            Some(metrics(64, 64, false)),
            false,
            &mut settings,
        );

        assert!(notes.contains(&PolicyNote::MipmapsWereDisabled));
        assert!(settings.mipmap_enabled);
        assert!(settings.streaming_mipmaps);
        assert_eq!(settings.streaming_mipmaps_priority, 0);
    }

    #[test]
    fn test_normal_map_is_never_alpha_flagged() {
        // "Textures/skin_n.png", 1024x1024, alpha present: the flag stays
        // untouched because a normal map's alpha is data, not transparency.
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();

        classifier.classify(
            "Textures/skin_n.png",
            TextureKind::NormalMap,
            Some(metrics(1024, 1024, true)),
            true,
            &mut settings,
        );

        assert!(!settings.alpha_is_transparency);
        assert_eq!(settings.compression_quality, 50);
        assert_eq!(settings.max_texture_size, 1024);
    }

    #[test]
    fn test_single_channel_is_never_alpha_flagged() {
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();

        classifier.classify(
            "Textures/heat_lut.png",
            TextureKind::SingleChannel,
            Some(metrics(256, 8, true)),
            true,
            &mut settings,
        );

        assert!(!settings.alpha_is_transparency);
    }

    #[test]
    fn test_untargeted_kind_passes_through_untouched() {
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();
        let before = settings;

        let notes = classifier.classify(
            "ui/icon.png",
            TextureKind::Sprite,
            Some(metrics(333, 333, true)),
            true,
            &mut settings,
        );

        assert_eq!(settings, before);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_rockmatcap_scenario() {
        // 300x150 opaque matcap: pow-two ceiling 512, hinted quality,
        // mipmaps and crunch forced, no alpha flag.
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();

        let notes = classifier.classify(
            "Textures/rockmatcap.png",
            TextureKind::Default,
            Some(metrics(300, 150, false)),
            false,
            &mut settings,
        );

        assert_eq!(settings.max_texture_size, 512);
        assert_eq!(settings.compression_quality, 75);
        assert!(settings.crunched_compression);
        assert!(settings.mipmap_enabled);
        assert!(settings.streaming_mipmaps);
        assert!(!settings.alpha_is_transparency);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_default_with_alpha_gets_flagged() {
        let classifier = Classifier::default();
        let mut settings = ImportSettings::default();

        classifier.classify(
            "Textures/leaf.png",
            TextureKind::Default,
            Some(metrics(128, 128, true)),
            true,
            &mut settings,
        );

        assert!(settings.alpha_is_transparency);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let mut config = PolicyConfig::default();
        config.default_quality = 40;
        config.quality_hints.push("gradient".to_string());

        let json = config.to_json().unwrap();
        let restored = PolicyConfig::from_json(&json).unwrap();

        assert_eq!(config, restored);
    }
}
