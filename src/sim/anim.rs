//! Frame clocks for sprite animations
//!
//! The simulation only tracks which frame is current; sprite data lives with
//! the renderer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tuning::AnimationTiming;

/// Animation names shared with the sprite-sheet metadata
pub mod names {
    pub const BOMB_TICKING: &str = "BombTicking";
    pub const BLAST_CENTER: &str = "BombAECenter";
    pub const BLAST_HORIZ: &str = "BombAEHoriz";
    pub const BLAST_VERT: &str = "BombAEVert";
    pub const BLAST_LEFT: &str = "BombAELeft";
    pub const BLAST_RIGHT: &str = "BombAERight";
    pub const BLAST_TOP: &str = "BombAETop";
    pub const BLAST_BOTTOM: &str = "BombAEBottom";
    pub const SOFT_BLOCK_FADING: &str = "SoftBlockFading";
    pub const DEATH: &str = "Death";
    pub const IDLE_LEFT: &str = "IdleLeft";
    pub const IDLE_RIGHT: &str = "IdleRight";
    pub const IDLE_UP: &str = "IdleUp";
    pub const IDLE_DOWN: &str = "IdleDown";
    pub const WALKING_LEFT: &str = "WalkingLeft";
    pub const WALKING_RIGHT: &str = "WalkingRight";
    pub const WALKING_UP: &str = "WalkingUp";
    pub const WALKING_DOWN: &str = "WalkingDown";
}

/// Frame count and per-frame duration of one animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimSpec {
    pub frames: u32,
    pub frame_duration: f32,
}

impl AnimSpec {
    pub fn new(frames: u32, frame_duration: f32) -> Self {
        Self {
            frames: frames.max(1),
            frame_duration,
        }
    }
}

/// Progress through an animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClock {
    pub spec: AnimSpec,
    pub frame: u32,
    pub elapsed: f32,
    /// Set once a one-shot animation has shown its last frame for a full duration
    pub ended: bool,
}

impl AnimationClock {
    pub fn new(spec: AnimSpec) -> Self {
        Self {
            spec,
            frame: 0,
            elapsed: 0.0,
            ended: false,
        }
    }

    /// Advance a looping animation
    pub fn advance_looping(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed > self.spec.frame_duration {
            self.elapsed -= self.spec.frame_duration;
            self.frame = (self.frame + 1) % self.spec.frames;
        }
    }

    /// Advance a one-shot animation; returns true on the step it ends
    pub fn advance_once(&mut self, dt: f32) -> bool {
        if self.ended {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed > self.spec.frame_duration {
            if self.frame + 1 >= self.spec.frames {
                self.ended = true;
                self.frame = 0;
                return true;
            }
            self.elapsed -= self.spec.frame_duration;
            self.frame += 1;
        }
        false
    }
}

/// Frame counts per animation name plus the tuned frame durations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationLibrary {
    frames: BTreeMap<String, u32>,
    timing: AnimationTiming,
}

impl AnimationLibrary {
    /// Library with built-in frame counts for every animation the simulation drives
    pub fn new(timing: AnimationTiming) -> Self {
        use names::*;
        let builtin = [
            (BOMB_TICKING, 3),
            (BLAST_CENTER, 4),
            (BLAST_HORIZ, 4),
            (BLAST_VERT, 4),
            (BLAST_LEFT, 4),
            (BLAST_RIGHT, 4),
            (BLAST_TOP, 4),
            (BLAST_BOTTOM, 4),
            (SOFT_BLOCK_FADING, 6),
            (DEATH, 6),
            (IDLE_LEFT, 1),
            (IDLE_RIGHT, 1),
            (IDLE_UP, 1),
            (IDLE_DOWN, 1),
            (WALKING_LEFT, 4),
            (WALKING_RIGHT, 4),
            (WALKING_UP, 4),
            (WALKING_DOWN, 4),
        ];
        Self {
            frames: builtin
                .into_iter()
                .map(|(name, frames)| (name.to_string(), frames))
                .collect(),
            timing,
        }
    }

    /// Override (or add) the frame count of a named animation
    pub fn set_frames(&mut self, name: &str, frames: u32) {
        self.frames.insert(name.to_string(), frames);
    }

    pub fn frames(&self, name: &str) -> Option<u32> {
        self.frames.get(name).copied()
    }

    /// Frame count and duration for a named animation (single frame if unknown)
    pub fn spec(&self, name: &str) -> AnimSpec {
        let frames = self.frames(name).unwrap_or(1);
        let duration = match name {
            names::BOMB_TICKING => self.timing.bomb_ticking,
            names::SOFT_BLOCK_FADING => self.timing.soft_block_fade,
            n if n.starts_with("BombAE") => self.timing.blast,
            _ => self.timing.actor,
        };
        AnimSpec::new(frames, duration)
    }
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        Self::new(AnimationTiming::default())
    }
}
