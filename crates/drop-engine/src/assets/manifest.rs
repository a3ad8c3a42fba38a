use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Asset manifest describing the sprite images and sound cues of a game.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Named sprite lookup: name → image path + render index.
    #[serde(default)]
    pub sprites: HashMap<String, SpriteDescriptor>,
    /// Named sound cues.
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a single sprite image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// Relative path to the image (e.g., "imgs_webp/1.webp").
    pub path: String,
    /// Index written into render instances for this sprite.
    pub index: u32,
    /// Source image side length in pixels (default: 128).
    #[serde(default = "default_source_size")]
    pub source_size: u32,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Numeric event ID that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
}

fn default_source_size() -> u32 {
    128
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sounds that Rust can trigger, as `(event_id, path)`. Sounds without an id are skipped.
    pub fn cues(&self) -> impl Iterator<Item = (u32, &str)> {
        self.sounds
            .values()
            .filter_map(|s| Some((s.event_id?, s.path.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_sounds() {
        let json = r#"{
            "sounds": {
                "click": { "path": "sounds/click.mp3", "event_id": 0 },
                "bread": { "path": "sounds/bread.mp3", "event_id": 9 },
                "theme": { "path": "sounds/theme.ogg" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sounds.len(), 3);
        let mut cues: Vec<(u32, &str)> = manifest.cues().collect();
        cues.sort();
        assert_eq!(cues, vec![(0, "sounds/click.mp3"), (9, "sounds/bread.mp3")]);
        assert_eq!(manifest.sounds["theme"].event_id, None);
    }

    #[test]
    fn parse_sprites_with_default_size() {
        let json = r#"{
            "sprites": {
                "tier_0": { "path": "imgs_webp/1.webp", "index": 0 },
                "tier_10": { "path": "imgs_webp/11.webp", "index": 10, "source_size": 256 }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sprites["tier_0"].source_size, 128);
        assert_eq!(manifest.sprites["tier_10"].source_size, 256);
        assert!(manifest.sounds.is_empty());
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(AssetManifest::from_json("{ \"sprites\": 3 }").is_err());
    }
}
