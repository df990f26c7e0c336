//! Collision detection and response on the tile grid
//!
//! The tricky part is staying forgiving: actor boxes are shrunk by a margin per
//! collision type, a block only stops the axis it actually faces, and an actor
//! that is mostly past a corner gets nudged around it instead of stopping dead.

use glam::{IVec2, UVec2, Vec2};

use super::world::{BlockKind, World};
use crate::consts::{MARGIN_BOMB, MARGIN_DOOR, MARGIN_MAP, MARGIN_PERK, NUDGE_THRESHOLD};
use crate::{position_of_tile, sprite_center, sprite_extents};

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    /// Full box of one tile
    pub fn tile(tile: UVec2) -> Self {
        Self {
            center: sprite_center(position_of_tile(tile)),
            half: sprite_extents(),
        }
    }

    /// Box of an actor sprite at `position`, shrunk by `margin` on every side.
    /// A margin wider than the sprite collapses the box to its center point.
    pub fn actor(position: Vec2, margin: f32) -> Self {
        Self {
            center: sprite_center(position),
            half: (sprite_extents() - Vec2::splat(margin)).max(Vec2::ZERO),
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

/// Per-frame movement permissions for one actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityRestriction {
    pub can_move_x: bool,
    pub can_move_y: bool,
    /// Signed slide velocity on the free axis when the other one is blocked
    /// near a corner; zero when no slide applies
    pub nudge: Vec2,
}

impl VelocityRestriction {
    pub fn free() -> Self {
        Self {
            can_move_x: true,
            can_move_y: true,
            nudge: Vec2::ZERO,
        }
    }
}

impl Default for VelocityRestriction {
    fn default() -> Self {
        Self::free()
    }
}

/// Result of a movement check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionOutcome {
    pub blocked: bool,
    pub restriction: VelocityRestriction,
}

impl CollisionOutcome {
    fn free() -> Self {
        Self {
            blocked: false,
            restriction: VelocityRestriction::free(),
        }
    }
}

/// Obstacles an actor may walk through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Passability {
    pub bombs: bool,
    pub soft_blocks: bool,
}

/// Read-only view of everything an actor can collide with this frame
pub struct CollisionResolver<'a> {
    pub world: &'a World,
    /// Tiles of ticking bombs
    pub bomb_tiles: &'a [UVec2],
    /// Tiles covered by live blast segments
    pub blast_tiles: &'a [UVec2],
}

impl<'a> CollisionResolver<'a> {
    pub fn new(world: &'a World, bomb_tiles: &'a [UVec2], blast_tiles: &'a [UVec2]) -> Self {
        Self {
            world,
            bomb_tiles,
            blast_tiles,
        }
    }

    /// Check an attempted move of `frame_velocity` (already scaled by dt)
    pub fn resolve(&self, position: Vec2, frame_velocity: Vec2, pass: Passability) -> CollisionOutcome {
        if frame_velocity == Vec2::ZERO {
            return CollisionOutcome::free();
        }

        let tile = self.world.tile_of(position);
        let obstacles = self.obstacles_around(tile, frame_velocity, pass);

        let extents = sprite_extents();
        let projected = position + frame_velocity;
        let projected_center = sprite_center(projected);

        let mut hits = 0;
        let mut can_move_x = true;
        let mut can_move_y = true;
        // Signed perpendicular offset and tile of the widest box blocking each axis
        let mut x_block = (0.0f32, tile);
        let mut y_block = (0.0f32, tile);

        for (obstacle_tile, obstacle, margin) in &obstacles {
            let actor = Aabb::actor(projected, *margin);
            if !actor.intersects(obstacle) {
                continue;
            }
            hits += 1;
            let d = obstacle.center - projected_center;

            if frame_velocity.x != 0.0
                && d.x.signum() == frame_velocity.x.signum()
                && d.y.abs() < extents.y
            {
                can_move_x = false;
                if d.y.abs() > x_block.0.abs() {
                    x_block = (d.y, *obstacle_tile);
                }
            }
            if frame_velocity.y != 0.0
                && d.y.signum() == frame_velocity.y.signum()
                && d.x.abs() < extents.x
            {
                can_move_y = false;
                if d.x.abs() > y_block.0.abs() {
                    y_block = (d.x, *obstacle_tile);
                }
            }
        }

        if hits == 0 {
            return CollisionOutcome::free();
        }
        // Ambiguous multi-box overlaps resolve in favour of moving
        if hits > 2 || (hits > 1 && can_move_x && can_move_y) {
            return CollisionOutcome::free();
        }

        // Slide only toward a side where the tile next to the blocker is open
        let mut nudge = Vec2::ZERO;
        let (offset, blocker) = x_block;
        if !can_move_x && offset.abs() > NUDGE_THRESHOLD * extents.y {
            let side = -offset.signum();
            if self.is_open(blocker.as_ivec2() + IVec2::new(0, side as i32), pass) {
                nudge.y = side * frame_velocity.x.abs();
            }
        }
        let (offset, blocker) = y_block;
        if !can_move_y && offset.abs() > NUDGE_THRESHOLD * extents.x {
            let side = -offset.signum();
            if self.is_open(blocker.as_ivec2() + IVec2::new(side as i32, 0), pass) {
                nudge.x = side * frame_velocity.y.abs();
            }
        }

        CollisionOutcome {
            blocked: !(can_move_x && can_move_y),
            restriction: VelocityRestriction {
                can_move_x,
                can_move_y,
                nudge,
            },
        }
    }

    /// Actor box overlaps any live blast segment
    pub fn check_blast_overlap(&self, position: Vec2) -> bool {
        let actor = Aabb::actor(position, MARGIN_BOMB);
        self.blast_tiles
            .iter()
            .any(|tile| actor.intersects(&Aabb::tile(*tile)))
    }

    /// Actor box overlaps the revealed, unconsumed perk
    pub fn check_perk_overlap(&self, position: Vec2) -> bool {
        self.world.perk_available()
            && Aabb::actor(position, MARGIN_PERK).intersects(&Aabb::tile(self.world.perk.tile))
    }

    /// Actor box overlaps the revealed door
    pub fn check_door_overlap(&self, position: Vec2) -> bool {
        self.world.door_revealed()
            && Aabb::actor(position, MARGIN_DOOR).intersects(&Aabb::tile(self.world.door.tile))
    }

    /// In-bounds tile with no block or bomb the actor would collide with
    fn is_open(&self, tile: IVec2, pass: Passability) -> bool {
        if tile.x < 0 || tile.y < 0 {
            return false;
        }
        let tile = tile.as_uvec2();
        if !self.world.in_bounds(tile) {
            return false;
        }
        let block_open = match self.world.tile_at(tile) {
            BlockKind::SolidBlock => false,
            BlockKind::SoftBlock => pass.soft_blocks,
            _ => true,
        };
        block_open && (pass.bombs || !self.bomb_tiles.contains(&tile))
    }

    /// Boxes (tile, box, actor margin to use against it) that can stop a move
    fn obstacles_around(&self, tile: UVec2, frame_velocity: Vec2, pass: Passability) -> Vec<(UVec2, Aabb, f32)> {
        let mut obstacles = Vec::new();

        for neighbor in self.neighbors(tile) {
            match self.world.tile_at(neighbor) {
                BlockKind::SolidBlock => obstacles.push((neighbor, Aabb::tile(neighbor), MARGIN_MAP)),
                BlockKind::SoftBlock if !pass.soft_blocks => {
                    obstacles.push((neighbor, Aabb::tile(neighbor), MARGIN_MAP))
                }
                _ => {}
            }
        }

        if !pass.bombs {
            let behind = behind_tiles(tile, frame_velocity);
            for bomb in self.bomb_tiles {
                let bomb_tile = bomb.as_ivec2();
                if *bomb == tile || behind.contains(&bomb_tile) {
                    continue;
                }
                obstacles.push((*bomb, Aabb::tile(*bomb), MARGIN_BOMB));
            }
        }

        obstacles
    }

    /// The up to eight in-bounds tiles around `tile`
    fn neighbors(&self, tile: UVec2) -> impl Iterator<Item = UVec2> + '_ {
        let center = tile.as_ivec2();
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| IVec2::new(dx, dy)))
            .filter(|offset| *offset != IVec2::ZERO)
            .filter_map(move |offset| {
                let n = center + offset;
                if n.x < 0 || n.y < 0 {
                    return None;
                }
                let n = n.as_uvec2();
                self.world.in_bounds(n).then_some(n)
            })
    }
}

/// Tiles on the far side of the actor from where it is heading.
/// Bombs there never block, so an actor can always walk off a bomb it just placed.
fn behind_tiles(tile: UVec2, frame_velocity: Vec2) -> Vec<IVec2> {
    let t = tile.as_ivec2();
    let s = IVec2::new(
        frame_velocity.x.signum() as i32 * i32::from(frame_velocity.x != 0.0),
        frame_velocity.y.signum() as i32 * i32::from(frame_velocity.y != 0.0),
    );
    match (s.x, s.y) {
        (0, 0) => Vec::new(),
        (sx, 0) => (-1..=1).map(|dy| IVec2::new(t.x - sx, t.y + dy)).collect(),
        (0, sy) => (-1..=1).map(|dx| IVec2::new(t.x + dx, t.y - sy)).collect(),
        (sx, sy) => vec![
            IVec2::new(t.x - sx, t.y),
            IVec2::new(t.x, t.y - sy),
            IVec2::new(t.x - sx, t.y - sy),
        ],
    }
}
