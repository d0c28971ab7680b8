use crate::data_structures::Matrix;

use super::{BoundingBox, Path};

/// A glyph outline in font design units
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub paths: Vec<Path>,
}

impl Outline {
    pub const fn empty() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.iter().all(Path::is_empty)
    }

    /// Appends every contour of `other`, moved by `m`. Used to assemble
    /// composite and accented glyphs
    pub fn extend_transformed(&mut self, other: &Outline, m: Matrix) {
        self.paths.extend(other.paths.iter().map(|path| path.transform(m)));
    }

    pub fn segment_count(&self) -> usize {
        self.paths.iter().map(|path| path.segments.len()).sum()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();

        for path in &self.paths {
            bbox.merge(path.bounding_box());
        }

        bbox
    }
}
