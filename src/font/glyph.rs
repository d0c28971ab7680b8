use crate::geometry::Outline;

/// A glyph outline in font design units, with its horizontal advance
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub outline: Outline,
    pub advance: f32,
}

impl Glyph {
    pub fn new(outline: Outline, advance: f32) -> Self {
        Self { outline, advance }
    }

    /// Placeholder for glyphs that are missing or failed to build
    pub const fn empty() -> Self {
        Self {
            outline: Outline::empty(),
            advance: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}
