use std::collections::HashSet;

use crate::data_structures::Matrix;

/// A font whose glyphs are content streams run by the page interpreter. Only
/// the glyph space and the set of defined glyph names are known here; there
/// are no outlines
#[derive(Debug, Clone)]
pub struct Type3Font {
    font_matrix: Matrix,
    glyph_names: HashSet<String>,
}

impl Type3Font {
    pub fn new<S: Into<String>>(font_matrix: Matrix, glyph_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            font_matrix,
            glyph_names: glyph_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn font_matrix(&self) -> Matrix {
        self.font_matrix
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyph_names.len()
    }

    pub fn has_glyph(&self, name: &str) -> bool {
        self.glyph_names.contains(name)
    }
}
