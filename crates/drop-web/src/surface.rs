use std::collections::HashMap;
use std::f64::consts::TAU;

use drop_engine::{AssetManifest, DisplaySurface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// A `<canvas>` element used as a small square display surface (the drop preview).
///
/// Sprite images are preloaded from the asset manifest and drawn by name.
/// Images that failed or have not finished loading are skipped.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasSurface {
    /// Look up a canvas by element id and grab its 2D context.
    pub fn from_element_id(element_id: &str) -> Option<Self> {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("surface: no document available");
            return None;
        };
        let Some(element) = document.get_element_by_id(element_id) else {
            log::warn!("surface: no element with id '{}'", element_id);
            return None;
        };
        let canvas: HtmlCanvasElement = match element.dyn_into() {
            Ok(canvas) => canvas,
            Err(_) => {
                log::warn!("surface: '{}' is not a canvas", element_id);
                return None;
            }
        };
        let context = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::warn!("surface: '{}' returned a non-2D context", element_id);
                    return None;
                }
            },
            _ => {
                log::warn!("surface: '{}' has no 2D context", element_id);
                return None;
            }
        };

        Some(Self {
            canvas,
            context,
            images: HashMap::new(),
        })
    }

    /// Start loading every manifest sprite so later draws find them ready.
    pub fn preload(&mut self, manifest: &AssetManifest) {
        for (name, desc) in &manifest.sprites {
            if self.images.contains_key(name) {
                continue;
            }
            match HtmlImageElement::new() {
                Ok(image) => {
                    image.set_src(&desc.path);
                    self.images.insert(name.clone(), image);
                }
                Err(err) => log::warn!("surface: could not create image '{}': {:?}", name, err),
            }
        }
    }
}

impl DisplaySurface for CanvasSurface {
    fn side(&self) -> u32 {
        self.canvas.width()
    }

    fn resize(&mut self, side: u32) {
        self.canvas.set_width(side);
        self.canvas.set_height(side);
    }

    fn set_left(&mut self, x: f32) {
        if let Err(err) = self.canvas.style().set_property("left", &format!("{}px", x)) {
            log::warn!("surface: could not move canvas: {:?}", err);
        }
    }

    fn clear(&mut self) {
        let side = self.canvas.width() as f64;
        self.context.clear_rect(0.0, 0.0, side, side);
    }

    fn draw_clipped_circle(&mut self, sprite: &str, radius: f32) -> bool {
        let Some(image) = self.images.get(sprite) else {
            log::debug!("surface: sprite '{}' is not in the manifest", sprite);
            return false;
        };
        if !image.complete() || image.natural_width() == 0 {
            log::debug!("surface: sprite '{}' not loaded yet", sprite);
            return false;
        }

        let r = radius as f64;
        let size = r * 2.0;
        self.context.save();
        self.context.begin_path();
        let drawn = self
            .context
            .arc(r, r, r, 0.0, TAU)
            .and_then(|_| {
                self.context.clip();
                self.context
                    .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, size, size)
            });
        self.context.restore();

        if let Err(err) = &drawn {
            log::warn!("surface: drawing '{}' failed: {:?}", sprite, err);
        }
        drawn.is_ok()
    }
}
