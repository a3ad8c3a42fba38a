pub mod instance;
pub mod surface;

pub use instance::{RenderInstance, RenderBuffer};
pub use surface::DisplaySurface;
