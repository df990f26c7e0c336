//! Sprite-sheet metadata: frame rectangles plus named animations
//!
//! Animations are lists of indices into `frames`. Only the frame counts reach
//! the simulation; the renderer maps `(animation, frame)` back to a sprite.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::AssetError;
use crate::sim::anim::AnimationLibrary;

/// Pixel rectangle of one sprite in the sheet texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Deserialize)]
struct SheetFile {
    frames: Vec<FrameEntry>,
    #[serde(rename = "Animations", default)]
    animations: Vec<AnimationEntry>,
    #[serde(rename = "sortingLayer")]
    sorting_layer: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    frame: FrameRect,
    #[serde(rename = "sortingLayer")]
    sorting_layer: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct AnimationEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Sprites")]
    sprites: Vec<u32>,
}

/// A parsed sprite sheet
#[derive(Debug, Clone, Default)]
pub struct SpriteSheet {
    pub frames: Vec<FrameRect>,
    /// Draw order per sprite; the sheet-wide value when one is given
    pub sorting_layers: Vec<f32>,
    pub animations: BTreeMap<String, Vec<u32>>,
}

impl SpriteSheet {
    pub fn parse(json: &str) -> Result<Self, AssetError> {
        let file: SheetFile = serde_json::from_str(json)?;

        let frames: Vec<FrameRect> = file.frames.iter().map(|f| f.frame).collect();
        let sorting_layers = file
            .frames
            .iter()
            .map(|f| file.sorting_layer.or(f.sorting_layer).unwrap_or(0.0))
            .collect();

        let mut animations = BTreeMap::new();
        for anim in file.animations {
            if let Some(bad) = anim.sprites.iter().find(|i| **i as usize >= frames.len()) {
                return Err(AssetError::UnknownSprite {
                    animation: anim.name,
                    index: *bad,
                });
            }
            if animations.contains_key(&anim.name) {
                log::warn!("Animation '{}' defined twice, keeping the last one", anim.name);
            }
            animations.insert(anim.name, anim.sprites);
        }

        Ok(Self {
            frames,
            sorting_layers,
            animations,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let sheet = Self::parse(&text)?;
        log::info!(
            "Loaded sprite sheet {}: {} sprites, {} animations",
            path.display(),
            sheet.frames.len(),
            sheet.animations.len()
        );
        Ok(sheet)
    }

    /// Sprite index shown by `frame` of `animation`
    pub fn sprite_for(&self, animation: &str, frame: u32) -> Option<u32> {
        self.animations
            .get(animation)
            .and_then(|sprites| sprites.get(frame as usize))
            .copied()
    }

    /// Overwrite the library's frame counts with this sheet's animations
    pub fn apply_to(&self, library: &mut AnimationLibrary) {
        for (name, sprites) in &self.animations {
            if sprites.is_empty() {
                log::warn!("Animation '{}' has no sprites, keeping the built-in length", name);
                continue;
            }
            library.set_frames(name, sprites.len() as u32);
        }
    }
}
