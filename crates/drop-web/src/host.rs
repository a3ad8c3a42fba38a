/// What the browser tells a game before it is constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostInfo {
    /// Viewport width in CSS pixels (the world is one unit per pixel).
    pub viewport_width: f32,
    /// Viewport height in CSS pixels.
    pub viewport_height: f32,
    /// Time-derived seed for game RNGs.
    pub seed: u64,
}

impl HostInfo {
    const FALLBACK_WIDTH: f32 = 800.0;
    const FALLBACK_HEIGHT: f32 = 600.0;

    /// Read the viewport size from `window` and derive a seed from the current time.
    /// Falls back to an 800x600 world when the window cannot be queried.
    pub fn detect() -> Self {
        let seed = js_sys::Date::now() as u64;
        let size = web_sys::window().and_then(|w| {
            let width = w.inner_width().ok()?.as_f64()?;
            let height = w.inner_height().ok()?.as_f64()?;
            Some((width as f32, height as f32))
        });

        let (viewport_width, viewport_height) = match size {
            Some((w, h)) if w > 0.0 && h > 0.0 => (w, h),
            _ => {
                log::warn!(
                    "host: viewport size unavailable, using {}x{}",
                    Self::FALLBACK_WIDTH,
                    Self::FALLBACK_HEIGHT
                );
                (Self::FALLBACK_WIDTH, Self::FALLBACK_HEIGHT)
            }
        };

        Self {
            viewport_width,
            viewport_height,
            seed,
        }
    }
}
