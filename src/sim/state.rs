//! Game state and events
//!
//! Everything a running level needs lives here, owned in one place and passed
//! by reference to the systems that read or mutate it.

use glam::UVec2;
use serde::{Deserialize, Serialize};

use super::anim::AnimationLibrary;
use super::bomb::{ActorId, BombId, BombSystem};
use super::level_gen::{GenerationError, LevelGenerator};
use super::perks::PerkKind;
use super::player::Player;
use super::rng::RngState;
use super::world::{BaseLayout, World};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Simulation frozen until unpaused
    Paused,
    /// An actor left through the door
    Cleared,
    /// Every actor is dead
    GameOver,
}

/// Things that happened during a tick, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BombPlaced {
        bomb: BombId,
        owner: ActorId,
        tile: UVec2,
    },
    BombExploded {
        bomb: BombId,
        tile: UVec2,
        segments: usize,
    },
    BlockDestroyed {
        tile: UVec2,
    },
    BombVanished {
        bomb: BombId,
    },
    PerkCollected {
        actor: ActorId,
        perk: PerkKind,
    },
    PlayerDied {
        actor: ActorId,
    },
    LevelCleared {
        actor: ActorId,
    },
}

/// Complete state of one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub rng_state: RngState,
    pub phase: GamePhase,
    /// Ticks simulated while playing
    pub time_ticks: u64,
    pub tuning: Tuning,
    pub world: World,
    pub players: Vec<Player>,
    pub bombs: BombSystem,
    pub library: AnimationLibrary,
}

impl GameState {
    /// Generate a level from `layout` with the given seed and spawn one actor
    pub fn new(
        seed: u64,
        tuning: Tuning,
        layout: BaseLayout,
        library: AnimationLibrary,
    ) -> Result<Self, GenerationError> {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let world = LevelGenerator::new(&tuning).generate(layout, &mut rng)?;
        log::info!("Level ready (seed {})", seed);

        let mut state = Self::with_world(world, tuning, library);
        state.rng_state = rng_state;
        Ok(state)
    }

    /// Wrap an already built world, with one actor on its spawn tile
    pub fn with_world(world: World, tuning: Tuning, library: AnimationLibrary) -> Self {
        let player = Player::new(1, world.spawn(), &library);
        Self {
            rng_state: RngState::new(0),
            phase: GamePhase::Playing,
            time_ticks: 0,
            bombs: BombSystem::new(tuning.fuse_seconds),
            tuning,
            world,
            players: vec![player],
            library,
        }
    }

    pub fn player(&self, id: ActorId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Cleared | GamePhase::GameOver)
    }
}
