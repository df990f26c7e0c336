//! Permanent actor upgrades granted by the level's perk tile

use serde::{Deserialize, Serialize};

/// Perk types, identified in map data by their props-sheet sprite id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerkKind {
    BombUp,
    Fire,
    PassBomb,
    PassSoftBlock,
    Remote,
    Skate,
}

impl PerkKind {
    pub const ALL: [PerkKind; 6] = [
        PerkKind::BombUp,
        PerkKind::Fire,
        PerkKind::PassBomb,
        PerkKind::PassSoftBlock,
        PerkKind::Remote,
        PerkKind::Skate,
    ];

    pub fn sprite_id(self) -> u8 {
        match self {
            PerkKind::BombUp => 1,
            PerkKind::Fire => 3,
            PerkKind::PassBomb => 5,
            PerkKind::PassSoftBlock => 6,
            PerkKind::Remote => 7,
            PerkKind::Skate => 8,
        }
    }

    pub fn from_sprite_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.sprite_id() == id)
    }
}

/// Upgrade counters and unlocks held by one actor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perks {
    /// Extra simultaneous bombs
    pub bomb_up: u8,
    /// Blast range
    pub fire: u8,
    /// Speed tier
    pub skate: u8,
    pub remote: bool,
    pub pass_bomb: bool,
    pub pass_soft_blocks: bool,
}

impl Perks {
    /// Apply the perk drawn with `sprite_id`. Unknown ids change nothing.
    pub fn apply(&mut self, sprite_id: u8) -> Option<PerkKind> {
        let kind = PerkKind::from_sprite_id(sprite_id)?;
        match kind {
            PerkKind::BombUp => self.bomb_up = self.bomb_up.saturating_add(1),
            PerkKind::Fire => self.fire = self.fire.saturating_add(1),
            PerkKind::Skate => self.skate = self.skate.saturating_add(1),
            PerkKind::Remote => self.remote = true,
            PerkKind::PassBomb => self.pass_bomb = true,
            PerkKind::PassSoftBlock => self.pass_soft_blocks = true,
        }
        Some(kind)
    }
}
