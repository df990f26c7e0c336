//! Procedural level generation
//!
//! Scatters soft blocks over a base layout, hides one perk and the exit door
//! under two of them. Sampling is retry-until-valid, so the inputs are checked
//! up front: a layout that cannot hold the requested blocks is an error rather
//! than an endless loop.

use std::fmt;

use glam::UVec2;

use super::perks::PerkKind;
use super::rng::GameRng;
use super::world::{BaseLayout, BlockKind, DOOR_SPRITE_ID, SpecialTile, World};
use crate::tuning::{PerkPolicy, Tuning};

/// Why a layout could not be turned into a level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The sampling window has fewer free tiles than the soft-block target
    NotEnoughTiles { requested: u32, available: u32 },
    /// Perk and door need at least two soft blocks to hide under
    TooFewSoftBlocks { min: u32 },
    /// `min_soft_blocks` is larger than `max_soft_blocks`
    InvalidRange { min: u32, max: u32 },
    /// The window above the spawn row leaves the map
    WindowOutOfBounds { spawn: UVec2, width: u32, height: u32 },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::NotEnoughTiles {
                requested,
                available,
            } => write!(
                f,
                "cannot place {} soft blocks, only {} free tiles",
                requested, available
            ),
            GenerationError::TooFewSoftBlocks { min } => {
                write!(f, "at least 2 soft blocks are required, minimum is {}", min)
            }
            GenerationError::InvalidRange { min, max } => {
                write!(f, "soft block range {}..={} is empty", min, max)
            }
            GenerationError::WindowOutOfBounds {
                spawn,
                width,
                height,
            } => write!(
                f,
                "spawn tile {} leaves no sampling window in a {}x{} map",
                spawn, width, height
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Turns base layouts into playable levels
pub struct LevelGenerator {
    min_soft_blocks: u32,
    max_soft_blocks: u32,
    perk_policy: PerkPolicy,
}

impl LevelGenerator {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            min_soft_blocks: tuning.min_soft_blocks,
            max_soft_blocks: tuning.max_soft_blocks,
            perk_policy: tuning.perk_policy,
        }
    }

    pub fn generate(&self, mut layout: BaseLayout, rng: &mut GameRng) -> Result<World, GenerationError> {
        if self.min_soft_blocks > self.max_soft_blocks {
            return Err(GenerationError::InvalidRange {
                min: self.min_soft_blocks,
                max: self.max_soft_blocks,
            });
        }
        if self.min_soft_blocks < 2 {
            return Err(GenerationError::TooFewSoftBlocks {
                min: self.min_soft_blocks,
            });
        }

        let window = SampleWindow::for_layout(&layout)?;
        let target: u32 = rng.ranged(self.min_soft_blocks, self.max_soft_blocks);
        let available = window.free_tiles(&layout);
        if target > available {
            return Err(GenerationError::NotEnoughTiles {
                requested: target,
                available,
            });
        }

        self.place_soft_blocks(&mut layout, &window, target, rng);
        let perk = self.place_perk(&layout, &window, rng);
        let door = Self::place_door(&layout, &window, perk.tile, rng);

        log::info!(
            "Generated level: {} soft blocks, perk {:?} at {}, door at {}",
            target,
            PerkKind::from_sprite_id(perk.sprite_id),
            perk.tile,
            door.tile
        );

        Ok(World::new(layout, perk, door))
    }

    fn place_soft_blocks(&self, layout: &mut BaseLayout, window: &SampleWindow, target: u32, rng: &mut GameRng) {
        let mut remaining = target;
        while remaining > 0 {
            let tile = window.sample(rng);
            if layout.block_at(tile) == BlockKind::None && !layout.is_restricted(tile) {
                layout.set_block(tile, BlockKind::SoftBlock);
                remaining -= 1;
            }
        }
    }

    fn place_perk(&self, layout: &BaseLayout, window: &SampleWindow, rng: &mut GameRng) -> SpecialTile {
        let tile = loop {
            let tile = window.sample(rng);
            if layout.block_at(tile) == BlockKind::SoftBlock {
                break tile;
            }
        };
        let kind = match self.perk_policy {
            PerkPolicy::Fixed(kind) => kind,
            PerkPolicy::Random => {
                let last = PerkKind::ALL.len() - 1;
                PerkKind::ALL[rng.ranged(0, last)]
            }
        };
        SpecialTile {
            tile,
            sprite_id: kind.sprite_id(),
        }
    }

    fn place_door(layout: &BaseLayout, window: &SampleWindow, perk_tile: UVec2, rng: &mut GameRng) -> SpecialTile {
        let tile = loop {
            let tile = window.sample(rng);
            if tile != perk_tile && layout.block_at(tile) == BlockKind::SoftBlock {
                break tile;
            }
        };
        SpecialTile {
            tile,
            sprite_id: DOOR_SPRITE_ID,
        }
    }
}

/// Inclusive rectangle tiles are drawn from: `[spawn.x, width-1] x [1, spawn.y+1]`
struct SampleWindow {
    min: UVec2,
    max: UVec2,
}

impl SampleWindow {
    fn for_layout(layout: &BaseLayout) -> Result<Self, GenerationError> {
        let spawn = layout.spawn();
        if spawn.x >= layout.width || spawn.y + 1 >= layout.height {
            return Err(GenerationError::WindowOutOfBounds {
                spawn,
                width: layout.width,
                height: layout.height,
            });
        }
        Ok(Self {
            min: UVec2::new(spawn.x, 1),
            max: UVec2::new(layout.width - 1, spawn.y + 1),
        })
    }

    fn sample(&self, rng: &mut GameRng) -> UVec2 {
        UVec2::new(
            rng.ranged(self.min.x, self.max.x),
            rng.ranged(self.min.y, self.max.y),
        )
    }

    fn free_tiles(&self, layout: &BaseLayout) -> u32 {
        let mut count = 0;
        for y in self.min.y..=self.max.y {
            for x in self.min.x..=self.max.x {
                let tile = UVec2::new(x, y);
                if layout.block_at(tile) == BlockKind::None && !layout.is_restricted(tile) {
                    count += 1;
                }
            }
        }
        count
    }
}
