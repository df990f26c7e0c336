//! Bombs: fuse, detonation, blast propagation and cleanup
//!
//! A bomb goes Ticking -> Exploding -> Vanished. The blast is a center segment
//! plus straight segments walked outward in the four cardinal directions, each
//! direction stopping at the first soft or solid block. A direction that runs
//! its full reach gets a tip segment one tile further out.

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::anim::{AnimationClock, AnimationLibrary, names};
use super::state::GameEvent;
use super::world::World;

pub type BombId = u32;
pub type ActorId = u32;

/// Bomb lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombState {
    Ticking,
    Exploding,
    Vanished,
}

/// Sprite shape of one blast segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastShape {
    Center,
    Horizontal,
    Vertical,
    TipLeft,
    TipRight,
    TipTop,
    TipBottom,
}

impl BlastShape {
    pub fn anim_name(self) -> &'static str {
        match self {
            BlastShape::Center => names::BLAST_CENTER,
            BlastShape::Horizontal => names::BLAST_HORIZ,
            BlastShape::Vertical => names::BLAST_VERT,
            BlastShape::TipLeft => names::BLAST_LEFT,
            BlastShape::TipRight => names::BLAST_RIGHT,
            BlastShape::TipTop => names::BLAST_TOP,
            BlastShape::TipBottom => names::BLAST_BOTTOM,
        }
    }
}

/// One flame tile of an exploded bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastSegment {
    pub tile: UVec2,
    pub shape: BlastShape,
    pub anim: AnimationClock,
}

impl BlastSegment {
    fn new(tile: UVec2, shape: BlastShape, library: &AnimationLibrary) -> Self {
        Self {
            tile,
            shape,
            anim: AnimationClock::new(library.spec(shape.anim_name())),
        }
    }

    pub fn ended(&self) -> bool {
        self.anim.ended
    }
}

/// Direction walked by the blast, with the shapes it uses
struct Arm {
    step: IVec2,
    straight: BlastShape,
    tip: BlastShape,
}

const ARMS: [Arm; 4] = [
    Arm {
        step: IVec2::new(-1, 0),
        straight: BlastShape::Horizontal,
        tip: BlastShape::TipLeft,
    },
    Arm {
        step: IVec2::new(1, 0),
        straight: BlastShape::Horizontal,
        tip: BlastShape::TipRight,
    },
    Arm {
        step: IVec2::new(0, 1),
        straight: BlastShape::Vertical,
        tip: BlastShape::TipTop,
    },
    Arm {
        step: IVec2::new(0, -1),
        straight: BlastShape::Vertical,
        tip: BlastShape::TipBottom,
    },
];

/// A bomb entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub id: BombId,
    pub owner: ActorId,
    pub tile: UVec2,
    /// Tile-snapped world position
    pub position: Vec2,
    pub state: BombState,
    /// Seconds spent ticking (never advances on remote bombs)
    pub fuse_elapsed: f32,
    /// Detonates only on an explicit remote trigger
    pub remote: bool,
    pub anim: AnimationClock,
    /// Empty until the bomb explodes; the first entry is the center
    pub segments: Vec<BlastSegment>,
}

impl Bomb {
    /// Center segment finished its animation
    pub fn center_ended(&self) -> bool {
        self.segments.first().is_some_and(|s| s.ended())
    }

    /// Build the blast and switch to Exploding. Returns the soft blocks destroyed.
    fn explode(&mut self, range: u32, world: &mut World, library: &AnimationLibrary) -> Vec<UVec2> {
        let mut destroyed = Vec::new();
        let fade = library.spec(names::SOFT_BLOCK_FADING);

        self.segments.clear();
        self.segments
            .push(BlastSegment::new(self.tile, BlastShape::Center, library));

        for arm in &ARMS {
            let mut truncated = false;
            for distance in 1..=range {
                let Some(tile) = offset_tile(world, self.tile, arm.step, distance) else {
                    truncated = true;
                    break;
                };
                if world.tile_at(tile).is_obstacle() {
                    if world.fade_block(tile, fade) {
                        destroyed.push(tile);
                    }
                    truncated = true;
                    break;
                }
                self.segments
                    .push(BlastSegment::new(tile, arm.straight, library));
            }

            if truncated {
                continue;
            }
            if let Some(tile) = offset_tile(world, self.tile, arm.step, range + 1) {
                if world.tile_at(tile).is_obstacle() {
                    if world.fade_block(tile, fade) {
                        destroyed.push(tile);
                    }
                } else {
                    self.segments.push(BlastSegment::new(tile, arm.tip, library));
                }
            }
        }

        self.state = BombState::Exploding;
        destroyed
    }

    /// Advance every segment; true once the center has ended
    fn advance_segments(&mut self, dt: f32) -> bool {
        for segment in &mut self.segments {
            segment.anim.advance_once(dt);
        }
        self.center_ended()
    }

    /// Exploding -> Vanished transition. Runs its side effects exactly once.
    fn vanish(&mut self, registry: &mut BlastRegistry) {
        if self.state != BombState::Exploding {
            return;
        }
        for segment in &self.segments {
            registry.remove(segment.tile);
        }
        self.state = BombState::Vanished;
    }
}

/// Tile `distance` steps from `origin`, or None if that leaves the map
fn offset_tile(world: &World, origin: UVec2, step: IVec2, distance: u32) -> Option<UVec2> {
    let t = origin.as_ivec2() + step * distance as i32;
    if t.x < 0 || t.y < 0 {
        return None;
    }
    let t = t.as_uvec2();
    world.in_bounds(t).then_some(t)
}

/// Tiles currently covered by blast segments. A tile covered by two blasts
/// appears twice and stays lethal until both are gone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlastRegistry {
    tiles: Vec<UVec2>,
}

impl BlastRegistry {
    pub fn add(&mut self, tile: UVec2) {
        self.tiles.push(tile);
    }

    /// Remove one registration of `tile`
    pub fn remove(&mut self, tile: UVec2) {
        if let Some(idx) = self.tiles.iter().position(|t| *t == tile) {
            self.tiles.remove(idx);
        }
    }

    pub fn contains(&self, tile: UVec2) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn tiles(&self) -> &[UVec2] {
        &self.tiles
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Lookup from a bomb's owner id to the actor data bombs need
pub trait BombOwners {
    /// Blast reach of the owner right now
    fn blast_range(&self, owner: ActorId) -> u32;
    /// Free the owner's bomb slot held by `bomb`
    fn release_bomb(&mut self, owner: ActorId, bomb: BombId);
}

/// All bombs in the level plus the active-blast registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombSystem {
    bombs: Vec<Bomb>,
    /// Placed this tick, joins `bombs` at the next flush
    pending: Vec<Bomb>,
    registry: BlastRegistry,
    next_id: BombId,
    fuse_seconds: f32,
}

impl BombSystem {
    pub fn new(fuse_seconds: f32) -> Self {
        Self {
            bombs: Vec::new(),
            pending: Vec::new(),
            registry: BlastRegistry::default(),
            next_id: 1,
            fuse_seconds,
        }
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn registry(&self) -> &BlastRegistry {
        &self.registry
    }

    /// Live and pending bombs, in placement order
    pub fn iter(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter().chain(self.pending.iter())
    }

    /// Tiles of ticking bombs, the ones actors collide with
    pub fn bomb_tiles(&self) -> Vec<UVec2> {
        self.iter()
            .filter(|b| b.state == BombState::Ticking)
            .map(|b| b.tile)
            .collect()
    }

    pub fn is_occupied(&self, tile: UVec2) -> bool {
        self.iter()
            .any(|b| b.tile == tile && b.state != BombState::Vanished)
    }

    /// Queue a bomb on `tile`. Returns None if a bomb already sits there.
    /// Owner capacity is the caller's concern.
    pub fn place(
        &mut self,
        owner: ActorId,
        tile: UVec2,
        world: &World,
        remote: bool,
        library: &AnimationLibrary,
    ) -> Option<BombId> {
        if self.is_occupied(tile) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Bomb {
            id,
            owner,
            tile,
            position: world.world_position_of(tile),
            state: BombState::Ticking,
            fuse_elapsed: 0.0,
            remote,
            anim: AnimationClock::new(library.spec(names::BOMB_TICKING)),
            segments: Vec::new(),
        });
        log::debug!("Bomb {} placed by actor {} at {}", id, owner, tile);
        Some(id)
    }

    /// Move bombs placed during the last update into the live list
    pub fn flush(&mut self) {
        self.bombs.append(&mut self.pending);
    }

    /// Detonate every ticking remote bomb of `owner`, in placement order.
    /// Bombs placed this tick are still pending and wait for the next trigger.
    pub fn detonate_remote<O: BombOwners + ?Sized>(
        &mut self,
        owner: ActorId,
        world: &mut World,
        owners: &mut O,
        library: &AnimationLibrary,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for bomb in &mut self.bombs {
            if bomb.owner == owner && bomb.remote && bomb.state == BombState::Ticking {
                detonate(bomb, &mut self.registry, world, owners, library, &mut events);
            }
        }
        events
    }

    /// Advance every bomb by the same `dt`
    pub fn update<O: BombOwners + ?Sized>(
        &mut self,
        dt: f32,
        world: &mut World,
        owners: &mut O,
        library: &AnimationLibrary,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for bomb in &mut self.bombs {
            match bomb.state {
                BombState::Ticking => {
                    bomb.anim.advance_looping(dt);
                    if bomb.remote {
                        continue;
                    }
                    bomb.fuse_elapsed += dt;
                    if bomb.fuse_elapsed > self.fuse_seconds {
                        detonate(bomb, &mut self.registry, world, owners, library, &mut events);
                    }
                }
                BombState::Exploding => {
                    if bomb.advance_segments(dt) {
                        bomb.vanish(&mut self.registry);
                        log::debug!("Bomb {} vanished", bomb.id);
                        events.push(GameEvent::BombVanished { bomb: bomb.id });
                    }
                }
                BombState::Vanished => {}
            }
        }

        self.bombs.retain(|b| b.state != BombState::Vanished);
        events
    }
}

fn detonate<O: BombOwners + ?Sized>(
    bomb: &mut Bomb,
    registry: &mut BlastRegistry,
    world: &mut World,
    owners: &mut O,
    library: &AnimationLibrary,
    events: &mut Vec<GameEvent>,
) {
    let range = owners.blast_range(bomb.owner);
    let destroyed = bomb.explode(range, world, library);
    for segment in &bomb.segments {
        registry.add(segment.tile);
    }
    owners.release_bomb(bomb.owner, bomb.id);

    log::debug!(
        "Bomb {} exploded at {}: {} segments, {} blocks destroyed",
        bomb.id,
        bomb.tile,
        bomb.segments.len(),
        destroyed.len()
    );
    events.push(GameEvent::BombExploded {
        bomb: bomb.id,
        tile: bomb.tile,
        segments: bomb.segments.len(),
    });
    events.extend(destroyed.into_iter().map(|tile| GameEvent::BlockDestroyed { tile }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anim::AnimSpec;
    use crate::sim::world::{BaseLayout, BlockKind, SpecialTile};

    /// Single owner with a fixed range that records released bombs
    struct Owner {
        range: u32,
        released: Vec<BombId>,
    }

    impl Owner {
        fn with_range(range: u32) -> Self {
            Self {
                range,
                released: Vec::new(),
            }
        }
    }

    impl BombOwners for Owner {
        fn blast_range(&self, _owner: ActorId) -> u32 {
            self.range
        }

        fn release_bomb(&mut self, _owner: ActorId, bomb: BombId) {
            self.released.push(bomb);
        }
    }

    fn open_world() -> World {
        World::new(
            BaseLayout::bordered(13, 13, UVec2::new(1, 11)),
            SpecialTile {
                tile: UVec2::new(11, 11),
                sprite_id: 3,
            },
            SpecialTile {
                tile: UVec2::new(11, 1),
                sprite_id: 2,
            },
        )
    }

    fn count_shape(bomb: &Bomb, shape: BlastShape) -> usize {
        bomb.segments.iter().filter(|s| s.shape == shape).count()
    }

    fn run_until_exploded(system: &mut BombSystem, world: &mut World, owner: &mut Owner, lib: &AnimationLibrary) -> Vec<GameEvent> {
        for _ in 0..400 {
            let events = system.update(1.0 / 60.0, world, owner, lib);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::BombExploded { .. }))
            {
                return events;
            }
        }
        panic!("bomb never exploded");
    }

    #[test]
    fn test_fuse_then_five_segments_then_vanish() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(0);
        let mut system = BombSystem::new(3.0);
        let id = system
            .place(1, UVec2::new(5, 5), &world, false, &lib)
            .unwrap();
        system.flush();

        // Not before the fuse runs out
        for _ in 0..170 {
            system.update(1.0 / 60.0, &mut world, &mut owner, &lib);
        }
        assert_eq!(system.bombs()[0].state, BombState::Ticking);

        run_until_exploded(&mut system, &mut world, &mut owner, &lib);
        let bomb = &system.bombs()[0];
        assert_eq!(bomb.state, BombState::Exploding);
        assert_eq!(bomb.segments.len(), 5);
        assert_eq!(bomb.segments[0].shape, BlastShape::Center);
        for tile in [(5, 5), (4, 5), (6, 5), (5, 6), (5, 4)] {
            assert!(system.registry().contains(UVec2::new(tile.0, tile.1)));
        }
        assert_eq!(system.registry().tiles().len(), 5);
        assert_eq!(owner.released, vec![id]);

        let mut vanished = 0;
        for _ in 0..200 {
            let events = system.update(1.0 / 60.0, &mut world, &mut owner, &lib);
            vanished += events
                .iter()
                .filter(|e| matches!(e, GameEvent::BombVanished { .. }))
                .count();
        }
        assert_eq!(vanished, 1);
        assert!(system.bombs().is_empty());
        assert!(system.registry().is_empty());
    }

    #[test]
    fn test_straight_segments_and_tips() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(2);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(6, 6), &world, false, &lib);
        system.flush();
        run_until_exploded(&mut system, &mut world, &mut owner, &lib);

        let bomb = &system.bombs()[0];
        assert_eq!(count_shape(bomb, BlastShape::Horizontal), 4);
        assert_eq!(count_shape(bomb, BlastShape::Vertical), 4);
        for tip in [
            BlastShape::TipLeft,
            BlastShape::TipRight,
            BlastShape::TipTop,
            BlastShape::TipBottom,
        ] {
            assert_eq!(count_shape(bomb, tip), 1);
        }
        let right_tip = bomb
            .segments
            .iter()
            .find(|s| s.shape == BlastShape::TipRight)
            .unwrap();
        assert_eq!(right_tip.tile, UVec2::new(9, 6));
    }

    #[test]
    fn test_wall_truncates_direction() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        world.set_tile(UVec2::new(7, 5), BlockKind::SolidBlock);
        let mut owner = Owner::with_range(5);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(5, 5), &world, false, &lib);
        system.flush();
        run_until_exploded(&mut system, &mut world, &mut owner, &lib);

        let bomb = &system.bombs()[0];
        let right: Vec<_> = bomb
            .segments
            .iter()
            .filter(|s| s.tile.y == 5 && s.tile.x > 5)
            .collect();
        assert_eq!(right.len(), 1);
        assert_eq!(right[0].tile, UVec2::new(6, 5));
        assert_eq!(count_shape(bomb, BlastShape::TipRight), 0);
        assert_eq!(world.tile_at(UVec2::new(7, 5)), BlockKind::SolidBlock);
        assert!(!system.registry().contains(UVec2::new(7, 5)));
    }

    #[test]
    fn test_map_edge_truncates_direction() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(20);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(1, 1), &world, false, &lib);
        system.flush();
        run_until_exploded(&mut system, &mut world, &mut owner, &lib);
        let bomb = &system.bombs()[0];
        // Border walls stop left and bottom straight away
        assert_eq!(count_shape(bomb, BlastShape::TipLeft), 0);
        assert_eq!(count_shape(bomb, BlastShape::TipBottom), 0);
        assert!(bomb.segments.iter().all(|s| s.tile.x >= 1 && s.tile.y >= 1));
    }

    #[test]
    fn test_soft_blocks_destroyed() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        // One stopping the straight part, one rejecting a tip
        world.set_tile(UVec2::new(6, 5), BlockKind::SoftBlock);
        world.set_tile(UVec2::new(5, 7), BlockKind::SoftBlock);
        let mut owner = Owner::with_range(1);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(5, 5), &world, false, &lib);
        system.flush();
        let events = run_until_exploded(&mut system, &mut world, &mut owner, &lib);

        let destroyed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BlockDestroyed { tile } => Some(*tile),
                _ => None,
            })
            .collect();
        assert_eq!(destroyed.len(), 2);
        assert!(destroyed.contains(&UVec2::new(6, 5)));
        assert!(destroyed.contains(&UVec2::new(5, 7)));
        assert_eq!(world.tile_at(UVec2::new(6, 5)), BlockKind::None);
        assert_eq!(world.tile_at(UVec2::new(5, 7)), BlockKind::None);
        assert_eq!(world.fading.len(), 2);

        // Destroyed tiles never carry flame
        assert!(!system.registry().contains(UVec2::new(6, 5)));
        assert!(!system.registry().contains(UVec2::new(5, 7)));
        let bomb = &system.bombs()[0];
        assert_eq!(count_shape(bomb, BlastShape::TipRight), 0);
        assert_eq!(count_shape(bomb, BlastShape::TipTop), 0);
        assert_eq!(count_shape(bomb, BlastShape::TipLeft), 1);
    }

    #[test]
    fn test_center_end_drives_vanish() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(1);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(5, 5), &world, false, &lib);
        system.flush();
        run_until_exploded(&mut system, &mut world, &mut owner, &lib);

        // A directional segment that would take ten seconds to finish
        system.bombs[0].segments[1].anim = AnimationClock::new(AnimSpec::new(100, 0.1));

        let mut steps = 0;
        while !system.bombs().is_empty() {
            system.update(1.0 / 60.0, &mut world, &mut owner, &lib);
            steps += 1;
            assert!(steps < 120, "bomb did not vanish with its center");
        }
        assert!(system.registry().is_empty());
    }

    #[test]
    fn test_vanish_runs_once() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(0);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(5, 5), &world, false, &lib);
        system.flush();
        run_until_exploded(&mut system, &mut world, &mut owner, &lib);

        let mut bomb = system.bombs[0].clone();
        let mut registry = BlastRegistry::default();
        for segment in &bomb.segments {
            registry.add(segment.tile);
        }
        // Another blast overlapping the center tile
        registry.add(UVec2::new(5, 5));

        bomb.vanish(&mut registry);
        bomb.vanish(&mut registry);
        assert_eq!(bomb.state, BombState::Vanished);
        assert_eq!(registry.tiles(), &[UVec2::new(5, 5)]);
    }

    #[test]
    fn test_remote_bomb_waits_for_trigger() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(0);
        let mut system = BombSystem::new(3.0);
        system.place(7, UVec2::new(5, 5), &world, true, &lib);
        system.place(7, UVec2::new(8, 8), &world, false, &lib);
        system.flush();

        for _ in 0..600 {
            system.update(1.0 / 60.0, &mut world, &mut owner, &lib);
        }
        let remote = system.bombs().iter().find(|b| b.remote).unwrap();
        assert_eq!(remote.state, BombState::Ticking);
        assert_eq!(remote.fuse_elapsed, 0.0);

        // Another owner's trigger does nothing
        assert!(system.detonate_remote(8, &mut world, &mut owner, &lib).is_empty());

        let events = system.detonate_remote(7, &mut world, &mut owner, &lib);
        assert_eq!(events.len(), 1);
        assert_eq!(system.bombs()[0].state, BombState::Exploding);
        // Nothing left to trigger
        assert!(system.detonate_remote(7, &mut world, &mut owner, &lib).is_empty());
    }

    #[test]
    fn test_remote_trigger_skips_pending_bomb() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(0);
        let mut system = BombSystem::new(3.0);
        let id = system
            .place(7, UVec2::new(5, 5), &world, true, &lib)
            .unwrap();

        // Same tick as the placement
        assert!(system.detonate_remote(7, &mut world, &mut owner, &lib).is_empty());

        system.flush();
        let events = system.detonate_remote(7, &mut world, &mut owner, &lib);
        assert!(matches!(events[..], [GameEvent::BombExploded { .. }]));
        assert_eq!(system.bombs()[0].state, BombState::Exploding);
        assert_eq!(owner.released, vec![id]);
    }

    #[test]
    fn test_place_rejects_occupied_tile() {
        let lib = AnimationLibrary::default();
        let world = open_world();
        let mut system = BombSystem::new(3.0);
        assert!(system.place(1, UVec2::new(5, 5), &world, false, &lib).is_some());
        // Still pending, but the tile is taken
        assert!(system.place(1, UVec2::new(5, 5), &world, false, &lib).is_none());
        system.flush();
        assert!(system.place(2, UVec2::new(5, 5), &world, false, &lib).is_none());
        assert_eq!(system.bomb_tiles(), vec![UVec2::new(5, 5)]);
    }

    #[test]
    fn test_pending_bombs_do_not_tick() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(0);
        let mut system = BombSystem::new(0.0);
        system.place(1, UVec2::new(5, 5), &world, false, &lib);
        assert!(system.update(1.0, &mut world, &mut owner, &lib).is_empty());
        system.flush();
        assert!(!system.update(1.0, &mut world, &mut owner, &lib).is_empty());
    }

    #[test]
    fn test_no_chain_detonation() {
        let lib = AnimationLibrary::default();
        let mut world = open_world();
        let mut owner = Owner::with_range(3);
        let mut system = BombSystem::new(3.0);
        system.place(1, UVec2::new(5, 5), &world, true, &lib);
        system.place(1, UVec2::new(6, 5), &world, true, &lib);
        system.flush();
        system.bombs[0].remote = false;
        system.bombs[0].fuse_elapsed = 10.0;
        system.update(1.0 / 60.0, &mut world, &mut owner, &lib);
        assert_eq!(system.bombs()[0].state, BombState::Exploding);
        assert_eq!(system.bombs()[1].state, BombState::Ticking);
    }
}
