use std::collections::HashMap;

use drop_engine::AssetManifest;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

/// Preloaded sound cues keyed by `SoundEvent` id.
///
/// Every play restarts its cue from time zero; nothing waits on playback.
pub struct AudioBank {
    cues: HashMap<u32, HtmlAudioElement>,
    on_rejected: Closure<dyn FnMut(JsValue)>,
}

impl AudioBank {
    /// Create one audio element per manifest sound that carries an `event_id`.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut cues = HashMap::with_capacity(manifest.sounds.len());
        for (event_id, path) in manifest.cues() {
            match HtmlAudioElement::new_with_src(path) {
                Ok(element) => {
                    element.set_preload("auto");
                    cues.insert(event_id, element);
                }
                Err(err) => log::warn!("audio: could not create cue '{}': {:?}", path, err),
            }
        }

        let on_rejected = Closure::new(|err: JsValue| {
            // Autoplay policies reject play() before the first user gesture.
            log::debug!("audio: play() rejected: {:?}", err);
        });

        Self { cues, on_rejected }
    }

    /// Restart and play the cue bound to `event_id`. Unknown ids are skipped.
    pub fn play(&self, event_id: u32) {
        let Some(cue) = self.cues.get(&event_id) else {
            log::debug!("audio: no cue bound to sound {}", event_id);
            return;
        };
        cue.set_current_time(0.0);
        match cue.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.on_rejected);
            }
            Err(err) => log::warn!("audio: play() failed for sound {}: {:?}", event_id, err),
        }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
