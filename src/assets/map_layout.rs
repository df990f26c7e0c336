//! Base map layout in the tile-editor JSON schema
//!
//! ```json
//! {
//!   "width": 31, "height": 13, "tilewidth": 16, "tileheight": 16,
//!   "layers": [ { "data": [...] }, { "data": [...] } ],
//!   "restrictedTiles": [ { "x": 1, "y": 11 } ]
//! }
//! ```
//!
//! Layer data is stored row by row from the top; the loaded layout has
//! (0, 0) in the bottom-left corner. Restricted tiles are already in game
//! coordinates and the first one is the player spawn.

use std::path::Path;

use glam::UVec2;
use serde::Deserialize;

use super::AssetError;
use crate::sim::world::{BaseLayout, BlockKind};

#[derive(Debug, Deserialize)]
struct LayoutFile {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    layers: Vec<LayerFile>,
    #[serde(rename = "restrictedTiles")]
    restricted_tiles: Vec<TileRef>,
}

#[derive(Debug, Deserialize)]
struct LayerFile {
    data: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TileRef {
    x: u32,
    y: u32,
}

/// Parse and validate a layout document
pub fn parse_layout(json: &str) -> Result<BaseLayout, AssetError> {
    let file: LayoutFile = serde_json::from_str(json)?;
    let (width, height) = (file.width, file.height);
    if width == 0 || height == 0 {
        return Err(AssetError::InvalidLayout(format!(
            "empty map {}x{}",
            width, height
        )));
    }
    if file.layers.len() < 2 {
        return Err(AssetError::InvalidLayout(format!(
            "expected background and blocks layers, found {} layer(s)",
            file.layers.len()
        )));
    }
    let cells = (width * height) as usize;
    for (i, layer) in file.layers.iter().take(2).enumerate() {
        if layer.data.len() != cells {
            return Err(AssetError::InvalidLayout(format!(
                "layer {} has {} cells, expected {}",
                i,
                layer.data.len(),
                cells
            )));
        }
    }

    let mut background = vec![0u8; cells];
    let mut blocks = vec![BlockKind::None; cells];
    for y in 0..height {
        // Stored rows run top-down
        let row = height - y - 1;
        for x in 0..width {
            let src = (row * width + x) as usize;
            let dst = (y * width + x) as usize;
            let tile = UVec2::new(x, y);

            let bg = file.layers[0].data[src];
            background[dst] = u8::try_from(bg).map_err(|_| {
                AssetError::InvalidLayout(format!("background value {} at tile {} out of range", bg, tile))
            })?;

            let raw = file.layers[1].data[src];
            blocks[dst] = u8::try_from(raw)
                .ok()
                .and_then(BlockKind::from_raw)
                .ok_or(AssetError::UnknownBlock { tile, raw })?;
        }
    }

    let restricted: Vec<UVec2> = file
        .restricted_tiles
        .iter()
        .map(|t| UVec2::new(t.x, t.y))
        .collect();
    if restricted.is_empty() {
        return Err(AssetError::InvalidLayout(
            "no restricted tiles, cannot place the spawn".to_string(),
        ));
    }

    let layout = BaseLayout {
        width,
        height,
        tile_width: file.tilewidth,
        tile_height: file.tileheight,
        background,
        blocks,
        restricted,
    };
    for tile in &layout.restricted {
        if !layout.in_bounds(*tile) {
            return Err(AssetError::InvalidLayout(format!(
                "restricted tile {} outside the map",
                tile
            )));
        }
        if layout.block_at(*tile) != BlockKind::None {
            return Err(AssetError::InvalidLayout(format!(
                "restricted tile {} is not empty",
                tile
            )));
        }
    }

    Ok(layout)
}

/// Read and parse a layout file
pub fn load_layout(path: impl AsRef<Path>) -> Result<BaseLayout, AssetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let layout = parse_layout(&text)?;
    log::info!(
        "Loaded {}x{} layout from {}",
        layout.width,
        layout.height,
        path.display()
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4x3 map, rows top-down: solid top row, soft block in the middle row
    const SMALL: &str = r#"{
        "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16,
        "layers": [
            { "data": [1, 1, 1, 1,  2, 2, 2, 2,  3, 3, 3, 3] },
            { "data": [17, 17, 17, 17,  0, 10, 0, 0,  0, 0, 0, 0] }
        ],
        "restrictedTiles": [ { "x": 0, "y": 1 }, { "x": 0, "y": 0 } ]
    }"#;

    #[test]
    fn test_parse_inverts_rows() {
        let layout = parse_layout(SMALL).unwrap();
        assert_eq!((layout.width, layout.height), (4, 3));
        assert_eq!(layout.tile_width, 16);
        // Top stored row is y = 2
        assert_eq!(layout.block_at(UVec2::new(0, 2)), BlockKind::SolidBlock);
        assert_eq!(layout.block_at(UVec2::new(1, 1)), BlockKind::SoftBlock);
        assert_eq!(layout.block_at(UVec2::new(1, 0)), BlockKind::None);
        assert_eq!(layout.background[0], 3);
        assert_eq!(layout.spawn(), UVec2::new(0, 1));
        assert_eq!(layout.restricted.len(), 2);
    }

    #[test]
    fn test_unknown_block_value() {
        let json = SMALL.replace("0, 10, 0, 0", "0, 12, 0, 0");
        match parse_layout(&json) {
            Err(AssetError::UnknownBlock { tile, raw }) => {
                assert_eq!(tile, UVec2::new(1, 1));
                assert_eq!(raw, 12);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_layer_size_mismatch() {
        let json = SMALL.replace("3, 3, 3, 3]", "3, 3, 3]");
        assert!(matches!(parse_layout(&json), Err(AssetError::InvalidLayout(_))));
    }

    #[test]
    fn test_missing_layer() {
        let json = r#"{ "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
            "layers": [ { "data": [0] } ], "restrictedTiles": [ { "x": 0, "y": 0 } ] }"#;
        assert!(matches!(parse_layout(json), Err(AssetError::InvalidLayout(_))));
    }

    #[test]
    fn test_restricted_tile_checks() {
        let none = SMALL.replace(r#"[ { "x": 0, "y": 1 }, { "x": 0, "y": 0 } ]"#, "[]");
        assert!(matches!(parse_layout(&none), Err(AssetError::InvalidLayout(_))));

        let outside = SMALL.replace(r#"{ "x": 0, "y": 0 }"#, r#"{ "x": 9, "y": 0 }"#);
        assert!(matches!(parse_layout(&outside), Err(AssetError::InvalidLayout(_))));

        let on_block = SMALL.replace(r#"{ "x": 0, "y": 0 }"#, r#"{ "x": 1, "y": 1 }"#);
        assert!(matches!(parse_layout(&on_block), Err(AssetError::InvalidLayout(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_layout("{ \"width\": 3"), Err(AssetError::Json(_))));
        assert!(matches!(parse_layout("{}"), Err(AssetError::Json(_))));
    }
}
