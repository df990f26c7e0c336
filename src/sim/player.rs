//! The player-controlled actor
//!
//! Each tick: latch the held directions, turn them into a velocity, ask the
//! collision resolver what is allowed, move (sliding around corners when
//! nudged), then react to whatever the actor now overlaps. Bomb actions come
//! back to the caller as commands, since they touch systems the actor does not own.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::anim::{AnimationClock, AnimationLibrary, names};
use super::bomb::{ActorId, BombId, BombOwners};
use super::collision::{CollisionResolver, Passability};
use super::perks::Perks;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::position_of_tile;
use crate::tuning::Tuning;

/// Actor lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Moving,
    /// Death animation playing
    Dying,
    /// Terminal: killed, or left through the door
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    Up,
    #[default]
    Down,
}

impl Facing {
    fn idle_anim(self) -> &'static str {
        match self {
            Facing::Left => names::IDLE_LEFT,
            Facing::Right => names::IDLE_RIGHT,
            Facing::Up => names::IDLE_UP,
            Facing::Down => names::IDLE_DOWN,
        }
    }

    fn walk_anim(self) -> &'static str {
        match self {
            Facing::Left => names::WALKING_LEFT,
            Facing::Right => names::WALKING_RIGHT,
            Facing::Up => names::WALKING_UP,
            Facing::Down => names::WALKING_DOWN,
        }
    }
}

/// Requests the tick applies after the actor update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    PlaceBomb { tile: UVec2 },
    DetonateRemote,
    CollectPerk,
}

/// A player actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: ActorId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub state: PlayerState,
    pub perks: Perks,
    /// Latched direction per axis, -1, 0 or 1
    pub movement: Vec2,
    pub facing: Facing,
    pub anim_name: String,
    pub anim: AnimationClock,
    /// Bombs placed and not yet detonated
    pub active_bombs: Vec<BombId>,
    pub visible: bool,
}

impl Player {
    pub fn new(id: ActorId, spawn: UVec2, library: &AnimationLibrary) -> Self {
        let facing = Facing::default();
        Self {
            id,
            position: position_of_tile(spawn),
            velocity: Vec2::ZERO,
            state: PlayerState::Idle,
            perks: Perks::default(),
            movement: Vec2::ZERO,
            facing,
            anim_name: facing.idle_anim().to_string(),
            anim: AnimationClock::new(library.spec(facing.idle_anim())),
            active_bombs: Vec::new(),
            visible: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.state, PlayerState::Idle | PlayerState::Moving)
    }

    /// Capacity allows one more bomb than the bomb-up level
    pub fn can_place_bomb(&self) -> bool {
        self.active_bombs.len() <= usize::from(self.perks.bomb_up)
    }

    pub fn passability(&self) -> Passability {
        Passability {
            bombs: self.perks.pass_bomb,
            soft_blocks: self.perks.pass_soft_blocks,
        }
    }

    /// Advance one tick
    pub fn update(
        &mut self,
        input: &TickInput,
        dt: f32,
        resolver: &CollisionResolver,
        tuning: &Tuning,
        library: &AnimationLibrary,
        events: &mut Vec<GameEvent>,
    ) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();

        match self.state {
            PlayerState::Dead => return commands,
            PlayerState::Dying => {
                if self.anim.advance_once(dt) {
                    self.visible = false;
                    self.state = PlayerState::Dead;
                    log::info!("Actor {} died", self.id);
                    events.push(GameEvent::PlayerDied { actor: self.id });
                }
                return commands;
            }
            PlayerState::Idle | PlayerState::Moving => {}
        }

        self.latch_movement(input);
        let speed = tuning.speed_for_tier(self.perks.skate);
        self.velocity = self.movement * speed;
        self.step(dt, speed, resolver);
        self.update_animation(dt, library);

        let tile = resolver.world.tile_of(self.position);
        if input.place_bomb {
            commands.push(PlayerCommand::PlaceBomb { tile });
        }
        if input.detonate && self.perks.remote {
            commands.push(PlayerCommand::DetonateRemote);
        }

        if resolver.check_blast_overlap(self.position) {
            self.start_dying(library);
        } else if resolver.check_perk_overlap(self.position) {
            commands.push(PlayerCommand::CollectPerk);
        } else if resolver.check_door_overlap(self.position) && resolver.world.perk_consumed() {
            self.state = PlayerState::Dead;
            self.velocity = Vec2::ZERO;
            log::info!("Actor {} reached the door", self.id);
            events.push(GameEvent::LevelCleared { actor: self.id });
        }

        commands
    }

    /// Resolve the held directions into a per-axis direction. Opposite keys
    /// held together keep whatever that axis was doing before.
    fn latch_movement(&mut self, input: &TickInput) {
        self.movement.x = latch_axis(input.left, input.right, self.movement.x);
        self.movement.y = latch_axis(input.down, input.up, self.movement.y);
    }

    fn step(&mut self, dt: f32, speed: Vec2, resolver: &CollisionResolver) {
        let frame_velocity = self.velocity * dt;
        let outcome = resolver.resolve(self.position, frame_velocity, self.passability());
        let r = outcome.restriction;

        let mut step = Vec2::new(
            if r.can_move_x { frame_velocity.x } else { 0.0 },
            if r.can_move_y { frame_velocity.y } else { 0.0 },
        );
        if !r.can_move_x && slides(r.nudge.y, frame_velocity.y) {
            step.y = r.nudge.y.signum() * speed.y * dt;
        }
        if !r.can_move_y && slides(r.nudge.x, frame_velocity.x) {
            step.x = r.nudge.x.signum() * speed.x * dt;
        }

        self.position += step;
        self.state = if self.movement == Vec2::ZERO {
            PlayerState::Idle
        } else {
            PlayerState::Moving
        };
    }

    fn update_animation(&mut self, dt: f32, library: &AnimationLibrary) {
        let facing = if self.movement.x < 0.0 {
            Facing::Left
        } else if self.movement.x > 0.0 {
            Facing::Right
        } else if self.movement.y > 0.0 {
            Facing::Up
        } else if self.movement.y < 0.0 {
            Facing::Down
        } else {
            self.facing
        };
        self.facing = facing;

        let name = match self.state {
            PlayerState::Moving => facing.walk_anim(),
            _ => facing.idle_anim(),
        };
        if self.anim_name != name {
            self.set_anim(name, library);
        } else {
            self.anim.advance_looping(dt);
        }
    }

    fn start_dying(&mut self, library: &AnimationLibrary) {
        self.state = PlayerState::Dying;
        self.velocity = Vec2::ZERO;
        self.movement = Vec2::ZERO;
        self.set_anim(names::DEATH, library);
        log::debug!("Actor {} caught in a blast", self.id);
    }

    fn set_anim(&mut self, name: &str, library: &AnimationLibrary) {
        self.anim_name = name.to_string();
        self.anim = AnimationClock::new(library.spec(name));
    }
}

fn latch_axis(negative: bool, positive: bool, previous: f32) -> f32 {
    match (negative, positive) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        (false, false) => 0.0,
        (true, true) => previous,
    }
}

/// A nudge applies when there is one and the actor is not pushing against it
fn slides(nudge: f32, velocity: f32) -> bool {
    nudge != 0.0 && (velocity == 0.0 || velocity.signum() == nudge.signum())
}

impl BombOwners for [Player] {
    fn blast_range(&self, owner: ActorId) -> u32 {
        self.iter()
            .find(|p| p.id == owner)
            .map_or(0, |p| u32::from(p.perks.fire))
    }

    fn release_bomb(&mut self, owner: ActorId, bomb: BombId) {
        if let Some(player) = self.iter_mut().find(|p| p.id == owner) {
            player.active_bombs.retain(|b| *b != bomb);
        }
    }
}
