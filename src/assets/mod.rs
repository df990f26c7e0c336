//! Static data loaded once before the simulation starts
//!
//! - `map_layout`: base map in the tile-editor JSON schema
//! - `sprite_sheet`: sprite frames and named animations
//!
//! Malformed data is a startup failure; nothing here is consulted mid-game.

pub mod error;
pub mod map_layout;
pub mod sprite_sheet;

pub use error::AssetError;
pub use map_layout::{load_layout, parse_layout};
pub use sprite_sheet::{FrameRect, SpriteSheet};
