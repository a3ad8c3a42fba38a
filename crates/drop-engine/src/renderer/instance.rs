use bytemuck::{Pod, Zeroable};

/// Per-instance render data read by the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// World-space rendered size (diameter for pieces).
    pub size: f32,
    /// Sprite index from the asset manifest.
    pub sprite: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    _pad: [f32; 2],
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(x: f32, y: f32, rotation: f32, size: f32, sprite: u32, alpha: f32) -> Self {
        Self {
            x,
            y,
            rotation,
            size,
            sprite: sprite as f32,
            alpha,
            _pad: [0.0; 2],
        }
    }
}

/// Render buffer containing all sprite instances for one frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host-side reads out of WASM memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), RenderInstance::STRIDE_BYTES);
        let inst = RenderInstance::new(1.0, 2.0, 0.0, 60.0, 4, 1.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&inst));
        assert_eq!(floats.len(), RenderInstance::FLOATS);
        assert_eq!(floats[4], 4.0);
    }

    #[test]
    fn render_buffer_push_and_count() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::default());
        buf.push(RenderInstance::default());
        assert_eq!(buf.instance_count(), 2);
        buf.clear();
        assert_eq!(buf.instance_count(), 0);
    }
}
