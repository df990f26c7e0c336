//! Renderer that just records draw calls
//!
//! Used by the headless runner and by tests; a real backend would consume the
//! same list once per frame.

use super::{Renderer, Sheet, SpriteDraw};

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    draws: Vec<SpriteDraw>,
}

impl DrawList {
    pub fn clear(&mut self) {
        self.draws.clear();
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Draw calls in submission order
    pub fn draws(&self) -> &[SpriteDraw] {
        &self.draws
    }

    pub fn count_sheet(&self, sheet: Sheet) -> usize {
        self.draws.iter().filter(|d| d.sheet == sheet).count()
    }
}

impl Renderer for DrawList {
    fn draw_sprite(&mut self, draw: SpriteDraw) {
        self.draws.push(draw);
    }
}
