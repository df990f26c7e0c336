//! Data-driven game balance
//!
//! Every field has a default, so a tuning file only needs the keys it overrides.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::perks::PerkKind;

/// How the level generator picks the perk hidden under a soft block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerkPolicy {
    /// Always the same perk
    Fixed(PerkKind),
    /// Uniform over every perk kind, drawn from the level RNG
    Random,
}

impl Default for PerkPolicy {
    fn default() -> Self {
        PerkPolicy::Fixed(PerkKind::Fire)
    }
}

/// Frame timing for the animations the simulation drives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    /// Seconds per frame of the ticking bomb
    pub bomb_ticking: f32,
    /// Seconds per frame of every blast segment
    pub blast: f32,
    /// Seconds per frame of a destroyed soft block fading out
    pub soft_block_fade: f32,
    /// Seconds per frame of actor walk/idle/death animations
    pub actor: f32,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            bomb_ticking: 0.2,
            blast: 0.1,
            soft_block_fade: 0.1,
            actor: 0.125,
        }
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Actor speed per axis in world units per second
    pub base_speed: Vec2,
    /// Extra speed per skate tier, applied to both axes
    pub speed_increment: f32,
    /// Seconds before a non-remote bomb detonates
    pub fuse_seconds: f32,
    /// Inclusive range the soft-block count is drawn from
    pub min_soft_blocks: u32,
    pub max_soft_blocks: u32,
    pub perk_policy: PerkPolicy,
    pub animation: AnimationTiming,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: Vec2::new(5.0, 6.5),
            speed_increment: 1.0,
            fuse_seconds: 3.0,
            min_soft_blocks: 80,
            max_soft_blocks: 120,
            perk_policy: PerkPolicy::default(),
            animation: AnimationTiming::default(),
        }
    }
}

/// Failure to read or parse a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(err) => write!(f, "could not read tuning file: {}", err),
            TuningError::Json(err) => write!(f, "invalid tuning file: {}", err),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(err) => Some(err),
            TuningError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        TuningError::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Json(err)
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&text)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Actor speed per axis at a given skate tier
    pub fn speed_for_tier(&self, skate: u8) -> Vec2 {
        self.base_speed + Vec2::splat(self.speed_increment * f32::from(skate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tuning = Tuning::default();
        assert_eq!(tuning.fuse_seconds, 3.0);
        assert_eq!(tuning.min_soft_blocks, 80);
        assert_eq!(tuning.max_soft_blocks, 120);
        assert_eq!(tuning.perk_policy, PerkPolicy::Fixed(PerkKind::Fire));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "fuse_seconds": 1.5, "animation": { "blast": 0.05 } }"#)
            .unwrap();
        assert_eq!(tuning.fuse_seconds, 1.5);
        assert_eq!(tuning.animation.blast, 0.05);
        assert_eq!(tuning.animation.bomb_ticking, 0.2);
        assert_eq!(tuning.base_speed, Vec2::new(5.0, 6.5));
    }

    #[test]
    fn test_perk_policy_json() {
        let tuning = Tuning::from_json_str(r#"{ "perk_policy": "Random" }"#).unwrap();
        assert_eq!(tuning.perk_policy, PerkPolicy::Random);

        let tuning = Tuning::from_json_str(r#"{ "perk_policy": { "Fixed": "Remote" } }"#).unwrap();
        assert_eq!(tuning.perk_policy, PerkPolicy::Fixed(PerkKind::Remote));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Tuning::from_json_str("{ fuse_seconds: }"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_speed_for_tier() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_for_tier(0), Vec2::new(5.0, 6.5));
        assert_eq!(tuning.speed_for_tier(2), Vec2::new(7.0, 8.5));
    }
}
