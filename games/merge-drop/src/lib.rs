use wasm_bindgen::prelude::*;
use drop_engine::InputEvent;

pub mod config;
pub mod drop;
pub mod fail;
pub mod game;
pub mod levels;
pub mod merge;
pub mod piece;
pub mod preview;
pub mod session;
pub mod spawn;

pub use config::{ConfigError, MergeConfig};
pub use game::MergeDrop;

#[cfg(feature = "vectors")]
drop_web::export_game!(MergeDrop, "merge-drop", host = MergeDrop::from_host, vectors);
#[cfg(not(feature = "vectors"))]
drop_web::export_game!(MergeDrop, "merge-drop", host = MergeDrop::from_host);
