pub mod render;
#[cfg(feature = "vectors")]
pub mod overlay;
