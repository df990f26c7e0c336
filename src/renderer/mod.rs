//! Rendering interface
//!
//! The game never touches GPU resources. Each visible entity turns itself into
//! sprite draw calls (sheet, sprite or animation frame, world position) and hands
//! them to whatever implements [`Renderer`].

pub mod draw_list;

pub use draw_list::DrawList;

use glam::Vec2;

use crate::consts::SPRITE_SCALE;
use crate::sim::anim::names;
use crate::sim::{Bomb, BombState, GameState, Player, World};

/// Sprite sheets the game draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    /// Background tiles
    Map,
    /// Blocks, door and perks
    Props,
    Bomb,
    Player,
}

/// What to draw from a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteRef {
    /// Fixed sprite by index
    Sprite(u32),
    /// Current frame of a named animation
    Animation { name: String, frame: u32 },
}

/// One sprite draw call in world space
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub sheet: Sheet,
    pub sprite: SpriteRef,
    /// Bottom-left corner of the sprite
    pub position: Vec2,
    pub scale: Vec2,
}

impl SpriteDraw {
    pub fn sprite(sheet: Sheet, index: u32, position: Vec2) -> Self {
        Self {
            sheet,
            sprite: SpriteRef::Sprite(index),
            position,
            scale: SPRITE_SCALE,
        }
    }

    pub fn animation(sheet: Sheet, name: &str, frame: u32, position: Vec2) -> Self {
        Self {
            sheet,
            sprite: SpriteRef::Animation {
                name: name.to_string(),
                frame,
            },
            position,
            scale: SPRITE_SCALE,
        }
    }
}

/// Receives draw calls in back-to-front order
pub trait Renderer {
    fn draw_sprite(&mut self, draw: SpriteDraw);
}

/// Something that can describe itself as sprites
pub trait Drawable {
    fn draw(&self, renderer: &mut dyn Renderer);
}

impl Drawable for World {
    /// Background, door, unconsumed perk, blocks, then fading blocks
    fn draw(&self, renderer: &mut dyn Renderer) {
        for tile in self.tiles() {
            let raw = self.background_at(tile);
            if raw > 0 {
                renderer.draw_sprite(SpriteDraw::sprite(
                    Sheet::Map,
                    u32::from(raw) - 1,
                    self.world_position_of(tile),
                ));
            }
        }

        // The door sits under its block and shows once the block is gone
        renderer.draw_sprite(SpriteDraw::sprite(
            Sheet::Props,
            u32::from(self.door.sprite_id),
            self.world_position_of(self.door.tile),
        ));
        if !self.perk_consumed() {
            renderer.draw_sprite(SpriteDraw::sprite(
                Sheet::Props,
                u32::from(self.perk.sprite_id),
                self.world_position_of(self.perk.tile),
            ));
        }

        for tile in self.tiles() {
            if let Some(index) = self.tile_at(tile).sprite_index() {
                renderer.draw_sprite(SpriteDraw::sprite(
                    Sheet::Props,
                    index,
                    self.world_position_of(tile),
                ));
            }
        }

        for block in &self.fading {
            renderer.draw_sprite(SpriteDraw::animation(
                Sheet::Props,
                names::SOFT_BLOCK_FADING,
                block.anim.frame,
                self.world_position_of(block.tile),
            ));
        }
    }
}

impl Drawable for Bomb {
    fn draw(&self, renderer: &mut dyn Renderer) {
        match self.state {
            BombState::Ticking => renderer.draw_sprite(SpriteDraw::animation(
                Sheet::Bomb,
                names::BOMB_TICKING,
                self.anim.frame,
                self.position,
            )),
            BombState::Exploding => {
                for segment in self.segments.iter().filter(|s| !s.ended()) {
                    renderer.draw_sprite(SpriteDraw::animation(
                        Sheet::Bomb,
                        segment.shape.anim_name(),
                        segment.anim.frame,
                        crate::position_of_tile(segment.tile),
                    ));
                }
            }
            BombState::Vanished => {}
        }
    }
}

impl Drawable for Player {
    fn draw(&self, renderer: &mut dyn Renderer) {
        if !self.visible {
            return;
        }
        renderer.draw_sprite(SpriteDraw::animation(
            Sheet::Player,
            &self.anim_name,
            self.anim.frame,
            self.position,
        ));
    }
}

/// Draw a whole frame: world, then bombs and blasts, then actors
pub fn render_frame(state: &GameState, renderer: &mut dyn Renderer) {
    state.world.draw(renderer);
    for bomb in state.bombs.iter() {
        bomb.draw(renderer);
    }
    for player in &state.players {
        player.draw(renderer);
    }
}
