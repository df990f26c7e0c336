//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (placement order / actor id)
//! - No rendering or platform dependencies

pub mod anim;
pub mod bomb;
pub mod collision;
pub mod level_gen;
pub mod perks;
pub mod player;
pub mod rng;
pub mod state;
pub mod tick;
pub mod world;

pub use anim::{AnimSpec, AnimationClock, AnimationLibrary};
pub use bomb::{ActorId, BlastRegistry, BlastSegment, BlastShape, Bomb, BombId, BombOwners, BombState, BombSystem};
pub use collision::{Aabb, CollisionOutcome, CollisionResolver, Passability, VelocityRestriction};
pub use level_gen::{GenerationError, LevelGenerator};
pub use perks::{PerkKind, Perks};
pub use player::{Facing, Player, PlayerCommand, PlayerState};
pub use rng::{GameRng, RngState};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use world::{BaseLayout, BlockKind, DOOR_SPRITE_ID, FadingBlock, SpecialTile, World};
