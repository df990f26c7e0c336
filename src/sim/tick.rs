//! Fixed timestep simulation tick
//!
//! Order within a tick: pause handling, actors (input, collision, movement,
//! overlap reactions, bomb commands), bombs, fading blocks, then bombs placed
//! during the tick join the live list.

use super::collision::CollisionResolver;
use super::player::{PlayerCommand, PlayerState};
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single tick (deterministic)
///
/// Directions are held states; bomb actions and pause are edges, true only on
/// the tick the key went down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub place_bomb: bool,
    pub detonate: bool,
    /// Pause toggle
    pub pause: bool,
    /// Leave the game loop
    pub exit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return events;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    update_players(state, input, dt, &mut events);

    // Same dt for every bomb and segment
    let bomb_events = state.bombs.update(
        dt,
        &mut state.world,
        state.players.as_mut_slice(),
        &state.library,
    );
    events.extend(bomb_events);
    state.world.update_fading(dt);
    state.bombs.flush();

    update_phase(state, &events);
    events
}

fn update_players(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    let bomb_tiles = state.bombs.bomb_tiles();
    let blast_tiles = state.bombs.registry().tiles().to_vec();

    for i in 0..state.players.len() {
        let commands = {
            let resolver = CollisionResolver::new(&state.world, &bomb_tiles, &blast_tiles);
            state.players[i].update(input, dt, &resolver, &state.tuning, &state.library, events)
        };
        for command in commands {
            apply_command(state, i, command, events);
        }
    }
}

fn apply_command(state: &mut GameState, index: usize, command: PlayerCommand, events: &mut Vec<GameEvent>) {
    match command {
        PlayerCommand::PlaceBomb { tile } => {
            let player = &state.players[index];
            if !player.can_place_bomb() {
                return;
            }
            let (owner, remote) = (player.id, player.perks.remote);
            if let Some(bomb) = state
                .bombs
                .place(owner, tile, &state.world, remote, &state.library)
            {
                state.players[index].active_bombs.push(bomb);
                events.push(GameEvent::BombPlaced { bomb, owner, tile });
            }
        }
        PlayerCommand::DetonateRemote => {
            let owner = state.players[index].id;
            let owners: &mut [_] = state.players.as_mut_slice();
            events.extend(
                state
                    .bombs
                    .detonate_remote(owner, &mut state.world, owners, &state.library),
            );
        }
        PlayerCommand::CollectPerk => {
            if !state.world.consume_perk() {
                return;
            }
            let player = &mut state.players[index];
            if let Some(perk) = player.perks.apply(state.world.perk.sprite_id) {
                log::info!("Actor {} collected {:?}", player.id, perk);
                events.push(GameEvent::PerkCollected {
                    actor: player.id,
                    perk,
                });
            }
        }
    }
}

fn update_phase(state: &mut GameState, events: &[GameEvent]) {
    if events
        .iter()
        .any(|e| matches!(e, GameEvent::LevelCleared { .. }))
    {
        state.phase = GamePhase::Cleared;
        log::info!("Level cleared after {} ticks", state.time_ticks);
    } else if state.players.iter().all(|p| p.state == PlayerState::Dead) {
        state.phase = GamePhase::GameOver;
        log::info!("Game over after {} ticks", state.time_ticks);
    }
}
