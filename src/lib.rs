//! Tile Bomber - simulation core of a tile-based bomb-laying arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world, level generation, collisions, bombs, actors)
//! - `assets`: Static map layout and sprite-sheet metadata
//! - `platform`: Input source abstraction
//! - `renderer`: Draw-call interface consumed by an external renderer
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{PerkPolicy, Tuning};

use glam::{UVec2, Vec2};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// World position of tile (0, 0)
    pub const MAP_ORIGIN: Vec2 = Vec2::new(-48.0, -32.5);
    /// Scale applied to every sprite quad
    pub const SPRITE_SCALE: Vec2 = Vec2::new(2.0, 2.0);
    /// Empirical correction for the padding baked into the sprite sheets
    pub const TILE_SIZE_MODIFIER: f32 = 1.985;

    /// Collision box margins, one per collision type (map < bomb < perk < door)
    pub const MARGIN_MAP: f32 = 0.25;
    pub const MARGIN_BOMB: f32 = 1.0;
    pub const MARGIN_PERK: f32 = 2.0;
    pub const MARGIN_DOOR: f32 = 4.0;

    /// Fraction of the half-extent past which a blocked actor slides around the corner
    pub const NUDGE_THRESHOLD: f32 = 0.8;
}

/// Distance between the origins of two adjacent tiles
#[inline]
pub fn tile_stride() -> Vec2 {
    consts::SPRITE_SCALE * consts::TILE_SIZE_MODIFIER
}

/// World position (bottom-left corner of the sprite) of a tile
#[inline]
pub fn position_of_tile(tile: UVec2) -> Vec2 {
    consts::MAP_ORIGIN + tile.as_vec2() * tile_stride()
}

/// Tile under the visual center of a sprite placed at `position`
///
/// Components are truncated toward zero; positions left of or below the map
/// origin land on row/column 0.
#[inline]
pub fn tile_of_position(position: Vec2) -> UVec2 {
    let local = (sprite_center(position) - consts::MAP_ORIGIN) / tile_stride();
    UVec2::new(local.x as u32, local.y as u32)
}

/// Visual center of a sprite placed at `position`
#[inline]
pub fn sprite_center(position: Vec2) -> Vec2 {
    position + tile_stride() / 2.0
}

/// Half-size of one tile-sized sprite
#[inline]
pub fn sprite_extents() -> Vec2 {
    tile_stride() / 2.0
}
