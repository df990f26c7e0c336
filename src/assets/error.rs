//! Asset loading errors

use std::fmt;

use glam::UVec2;

/// Why static data could not be loaded
#[derive(Debug)]
pub enum AssetError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Well-formed JSON describing an unusable map
    InvalidLayout(String),
    /// Blocks-layer value that is not a known block
    UnknownBlock { tile: UVec2, raw: u32 },
    /// Animation frame pointing past the end of the sheet
    UnknownSprite { animation: String, index: u32 },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(err) => write!(f, "I/O error: {}", err),
            AssetError::Json(err) => write!(f, "JSON error: {}", err),
            AssetError::InvalidLayout(msg) => write!(f, "invalid map layout: {}", msg),
            AssetError::UnknownBlock { tile, raw } => {
                write!(f, "unknown block value {} at tile {}", raw, tile)
            }
            AssetError::UnknownSprite { animation, index } => write!(
                f,
                "animation '{}' references missing sprite {}",
                animation, index
            ),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(err) => Some(err),
            AssetError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::Io(err)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(err: serde_json::Error) -> Self {
        AssetError::Json(err)
    }
}
