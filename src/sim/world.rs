//! Tile grid: background layer, blocks layer and the special tiles
//!
//! Tile (0, 0) is the bottom-left corner. Every accessor asserts that the
//! coordinate is inside the grid; an out-of-bounds tile is a programming error.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::anim::{AnimSpec, AnimationClock};
use crate::{position_of_tile, tile_of_position};

/// Sprite index of the door in the props sheet
pub const DOOR_SPRITE_ID: u8 = 2;

/// Contents of the blocks layer. Raw values are props-sheet sprite index + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockKind {
    #[default]
    None = 0,
    Door = 3,
    SoftBlock = 10,
    SolidBlock = 17,
}

impl BlockKind {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(BlockKind::None),
            3 => Some(BlockKind::Door),
            10 => Some(BlockKind::SoftBlock),
            17 => Some(BlockKind::SolidBlock),
            _ => None,
        }
    }

    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Blocks movement and blasts
    pub fn is_obstacle(self) -> bool {
        matches!(self, BlockKind::SoftBlock | BlockKind::SolidBlock)
    }

    /// Props-sheet sprite index, if the tile draws anything
    pub fn sprite_index(self) -> Option<u32> {
        match self {
            BlockKind::None => None,
            kind => Some(u32::from(kind.raw()) - 1),
        }
    }
}

/// A tile carrying a sprite id (perk or door)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTile {
    pub tile: UVec2,
    pub sprite_id: u8,
}

/// Map as loaded from static data, before generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseLayout {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Decorative raw sprite values, never collided with
    pub background: Vec<u8>,
    pub blocks: Vec<BlockKind>,
    /// Tiles generation must leave empty; the first one is the player spawn
    pub restricted: Vec<UVec2>,
}

impl BaseLayout {
    /// Empty arena enclosed by solid walls with a single restricted spawn tile
    pub fn bordered(width: u32, height: u32, spawn: UVec2) -> Self {
        let mut blocks = vec![BlockKind::None; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    blocks[(y * width + x) as usize] = BlockKind::SolidBlock;
                }
            }
        }
        Self {
            width,
            height,
            tile_width: 16,
            tile_height: 16,
            background: vec![0; (width * height) as usize],
            blocks,
            restricted: vec![spawn],
        }
    }

    /// The classic 31x13 arena: solid border, solid pillars on even interior
    /// coordinates, spawn in the top-left corner
    pub fn classic() -> Self {
        let (width, height) = (31, 13);
        let spawn = UVec2::new(1, height - 2);
        let mut layout = Self::bordered(width, height, spawn);
        for y in (2..height - 1).step_by(2) {
            for x in (2..width - 1).step_by(2) {
                layout.blocks[(y * width + x) as usize] = BlockKind::SolidBlock;
            }
        }
        layout.restricted.push(UVec2::new(spawn.x + 1, spawn.y));
        layout.restricted.push(UVec2::new(spawn.x, spawn.y - 1));
        layout
    }

    pub fn spawn(&self) -> UVec2 {
        self.restricted[0]
    }

    pub fn in_bounds(&self, tile: UVec2) -> bool {
        tile.x < self.width && tile.y < self.height
    }

    pub fn block_at(&self, tile: UVec2) -> BlockKind {
        self.blocks[self.index(tile)]
    }

    pub fn set_block(&mut self, tile: UVec2, kind: BlockKind) {
        let idx = self.index(tile);
        self.blocks[idx] = kind;
    }

    pub fn is_restricted(&self, tile: UVec2) -> bool {
        self.restricted.contains(&tile)
    }

    fn index(&self, tile: UVec2) -> usize {
        assert!(
            self.in_bounds(tile),
            "tile {} outside {}x{} map",
            tile,
            self.width,
            self.height
        );
        (tile.y * self.width + tile.x) as usize
    }
}

/// A destroyed soft block playing its fade-out animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadingBlock {
    pub tile: UVec2,
    pub anim: AnimationClock,
}

/// The generated level, mutated in place while it is played
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    layout: BaseLayout,
    pub perk: SpecialTile,
    pub door: SpecialTile,
    perk_consumed: bool,
    pub fading: Vec<FadingBlock>,
}

impl World {
    pub fn new(layout: BaseLayout, perk: SpecialTile, door: SpecialTile) -> Self {
        Self {
            layout,
            perk,
            door,
            perk_consumed: false,
            fading: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.layout.width
    }

    pub fn height(&self) -> u32 {
        self.layout.height
    }

    pub fn layout(&self) -> &BaseLayout {
        &self.layout
    }

    pub fn spawn(&self) -> UVec2 {
        self.layout.spawn()
    }

    pub fn restricted(&self) -> &[UVec2] {
        &self.layout.restricted
    }

    pub fn in_bounds(&self, tile: UVec2) -> bool {
        self.layout.in_bounds(tile)
    }

    pub fn tile_at(&self, tile: UVec2) -> BlockKind {
        self.layout.block_at(tile)
    }

    pub fn background_at(&self, tile: UVec2) -> u8 {
        self.layout.background[self.layout.index(tile)]
    }

    /// Overwrite a blocks-layer tile. Fade feedback is not triggered here.
    pub fn set_tile(&mut self, tile: UVec2, kind: BlockKind) {
        self.layout.set_block(tile, kind);
    }

    pub fn world_position_of(&self, tile: UVec2) -> Vec2 {
        position_of_tile(tile)
    }

    pub fn tile_of(&self, position: Vec2) -> UVec2 {
        tile_of_position(position)
    }

    /// Destroy the soft block at `tile` and start its fade-out.
    /// Returns false (and changes nothing) if the tile is not a soft block.
    pub fn fade_block(&mut self, tile: UVec2, fade: AnimSpec) -> bool {
        if self.tile_at(tile) != BlockKind::SoftBlock {
            return false;
        }
        self.set_tile(tile, BlockKind::None);
        self.fading.push(FadingBlock {
            tile,
            anim: AnimationClock::new(fade),
        });
        true
    }

    /// Advance fading blocks and drop the finished ones
    pub fn update_fading(&mut self, dt: f32) {
        for block in &mut self.fading {
            block.anim.advance_once(dt);
        }
        self.fading.retain(|b| !b.anim.ended);
    }

    /// The perk's covering block is gone and nobody has taken it yet
    pub fn perk_available(&self) -> bool {
        !self.perk_consumed && self.tile_at(self.perk.tile) == BlockKind::None
    }

    pub fn perk_consumed(&self) -> bool {
        self.perk_consumed
    }

    /// Mark the perk taken; true only the first time
    pub fn consume_perk(&mut self) -> bool {
        if self.perk_consumed {
            return false;
        }
        self.perk_consumed = true;
        true
    }

    pub fn door_revealed(&self) -> bool {
        self.tile_at(self.door.tile) == BlockKind::None
    }

    /// Iterate every tile coordinate, row by row from the bottom
    pub fn tiles(&self) -> impl Iterator<Item = UVec2> + '_ {
        let width = self.width();
        (0..self.height()).flat_map(move |y| (0..width).map(move |x| UVec2::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let mut layout = BaseLayout::bordered(7, 7, UVec2::new(1, 5));
        layout.set_block(UVec2::new(3, 3), BlockKind::SoftBlock);
        layout.set_block(UVec2::new(4, 3), BlockKind::SoftBlock);
        World::new(
            layout,
            SpecialTile {
                tile: UVec2::new(3, 3),
                sprite_id: 3,
            },
            SpecialTile {
                tile: UVec2::new(4, 3),
                sprite_id: DOOR_SPRITE_ID,
            },
        )
    }

    #[test]
    fn test_block_kind_raw_values() {
        for kind in [
            BlockKind::None,
            BlockKind::Door,
            BlockKind::SoftBlock,
            BlockKind::SolidBlock,
        ] {
            assert_eq!(BlockKind::from_raw(kind.raw()), Some(kind));
        }
        assert_eq!(BlockKind::from_raw(5), None);
        assert_eq!(BlockKind::SoftBlock.sprite_index(), Some(9));
        assert_eq!(BlockKind::None.sprite_index(), None);
    }

    #[test]
    fn test_bordered_layout() {
        let layout = BaseLayout::bordered(5, 4, UVec2::new(1, 2));
        assert_eq!(layout.block_at(UVec2::new(0, 0)), BlockKind::SolidBlock);
        assert_eq!(layout.block_at(UVec2::new(4, 3)), BlockKind::SolidBlock);
        assert_eq!(layout.block_at(UVec2::new(2, 1)), BlockKind::None);
        assert_eq!(layout.spawn(), UVec2::new(1, 2));
    }

    #[test]
    fn test_classic_layout() {
        let layout = BaseLayout::classic();
        assert_eq!((layout.width, layout.height), (31, 13));
        assert_eq!(layout.spawn(), UVec2::new(1, 11));
        assert_eq!(layout.block_at(UVec2::new(2, 2)), BlockKind::SolidBlock);
        assert_eq!(layout.block_at(UVec2::new(3, 2)), BlockKind::None);
        for tile in &layout.restricted {
            assert_eq!(layout.block_at(*tile), BlockKind::None);
        }
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let w = world();
        w.tile_at(UVec2::new(7, 0));
    }

    #[test]
    fn test_fade_block() {
        let mut w = world();
        let fade = AnimSpec::new(2, 0.1);
        assert!(w.fade_block(UVec2::new(3, 3), fade));
        assert_eq!(w.tile_at(UVec2::new(3, 3)), BlockKind::None);
        assert_eq!(w.fading.len(), 1);
        // Solid and empty tiles are left alone
        assert!(!w.fade_block(UVec2::new(0, 0), fade));
        assert!(!w.fade_block(UVec2::new(3, 3), fade));

        for _ in 0..3 {
            w.update_fading(0.11);
        }
        assert!(w.fading.is_empty());
    }

    #[test]
    fn test_set_tile_has_no_fade_side_effect() {
        let mut w = world();
        w.set_tile(UVec2::new(3, 3), BlockKind::None);
        assert!(w.fading.is_empty());
    }

    #[test]
    fn test_perk_reveal_and_consume() {
        let mut w = world();
        assert!(!w.perk_available());
        w.set_tile(UVec2::new(3, 3), BlockKind::None);
        assert!(w.perk_available());
        assert!(w.consume_perk());
        assert!(!w.consume_perk());
        assert!(!w.perk_available());
        assert!(!w.door_revealed());
    }

    #[test]
    fn test_tiles_iteration_covers_grid() {
        let w = world();
        assert_eq!(w.tiles().count(), 49);
        assert_eq!(w.tiles().next(), Some(UVec2::ZERO));
    }
}
