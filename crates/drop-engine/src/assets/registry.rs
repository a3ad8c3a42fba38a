use std::collections::HashMap;
use crate::assets::manifest::AssetManifest;
use crate::components::sprite::{SpriteComponent, SpriteId};

/// Registry of named sprites, built from an AssetManifest.
/// Provides name-based sprite lookup for game code.
pub struct SpriteRegistry {
    sprites: HashMap<String, SpriteComponent>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
        }
    }

    /// Build a registry from a parsed AssetManifest.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let sprites = manifest
            .sprites
            .iter()
            .map(|(name, desc)| (name.clone(), SpriteComponent::new(SpriteId(desc.index))))
            .collect();
        Self { sprites }
    }

    /// Look up a sprite by name. Returns None if not found.
    pub fn get(&self, name: &str) -> Option<&SpriteComponent> {
        self.sprites.get(name)
    }

    /// Look up `name`, falling back to `fallback` when it is missing.
    pub fn get_or(&self, name: &str, fallback: &str) -> Option<&SpriteComponent> {
        self.get(name).or_else(|| self.get(fallback))
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

impl Default for SpriteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_manifest() {
        let json = r#"{
            "sprites": {
                "tier_3": { "path": "imgs_webp/4.webp", "index": 3 }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        let reg = SpriteRegistry::from_manifest(&manifest);

        let sprite = reg.get("tier_3").expect("tier_3 should exist");
        assert_eq!(sprite.id, SpriteId(3));
        assert_eq!(sprite.alpha, 1.0);
    }

    #[test]
    fn fallback_is_used_for_missing_names() {
        let json = r#"{ "sprites": { "tier_10": { "path": "11.webp", "index": 10 } } }"#;
        let reg = SpriteRegistry::from_manifest(&AssetManifest::from_json(json).unwrap());
        assert_eq!(reg.get_or("tier_11", "tier_10").map(|s| s.id), Some(SpriteId(10)));
        assert!(reg.get_or("nope", "also_nope").is_none());
    }
}
