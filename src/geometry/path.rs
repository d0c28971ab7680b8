use crate::data_structures::Matrix;

use super::{BoundingBox, Point, Segment};

/// A single contour
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<Segment>,
    pub current_point: Point,
    start: Point,
}

impl Path {
    pub const fn new(start: Point) -> Self {
        Self {
            segments: Vec::new(),
            current_point: start,
            start,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.segments
            .last()
            .map_or(false, |last| last.end().approx_eq(self.start))
    }

    /// Adds a line back to the start point unless the contour already ends
    /// there
    pub fn close_path(&mut self) {
        if !self.segments.is_empty() && !self.current_point.approx_eq(self.start) {
            self.line_to(self.start);
        }

        self.current_point = self.start;
    }

    pub fn line_to(&mut self, end: Point) {
        self.segments.push(Segment::Line {
            start: self.current_point,
            end,
        });
        self.current_point = end;
    }

    pub fn quadratic_curve_to(&mut self, control: Point, end: Point) {
        self.segments.push(Segment::Quadratic {
            start: self.current_point,
            control,
            end,
        });
        self.current_point = end;
    }

    pub fn cubic_curve_to(&mut self, control1: Point, control2: Point, end: Point) {
        self.segments.push(Segment::Cubic {
            start: self.current_point,
            control1,
            control2,
            end,
        });
        self.current_point = end;
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();

        for segment in &self.segments {
            bbox.merge(segment.bounding_box());
        }

        bbox
    }

    pub fn transform(&self, m: Matrix) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.transform(m)).collect(),
            current_point: m * self.current_point,
            start: m * self.start,
        }
    }
}
