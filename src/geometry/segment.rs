use crate::data_structures::Matrix;

use super::{BoundingBox, Point};

/// One piece of a contour, from the end of the previous piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        start: Point,
        end: Point,
    },

    /// TrueType outlines
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },

    /// CFF and Type 1 outlines
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

impl Segment {
    pub fn start(&self) -> Point {
        match *self {
            Self::Line { start, .. } | Self::Quadratic { start, .. } | Self::Cubic { start, .. } => {
                start
            }
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Self::Line { end, .. } | Self::Quadratic { end, .. } | Self::Cubic { end, .. } => end,
        }
    }

    pub fn transform(&self, m: Matrix) -> Self {
        match *self {
            Self::Line { start, end } => Self::Line {
                start: m * start,
                end: m * end,
            },
            Self::Quadratic {
                start,
                control,
                end,
            } => Self::Quadratic {
                start: m * start,
                control: m * control,
                end: m * end,
            },
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => Self::Cubic {
                start: m * start,
                control1: m * control1,
                control2: m * control2,
                end: m * end,
            },
        }
    }

    /// Point at parameter `t` in `0..=1`
    pub fn point_at(&self, t: f32) -> Point {
        let mt = 1.0 - t;

        match *self {
            Self::Line { start, end } => start * mt + end * t,
            Self::Quadratic {
                start,
                control,
                end,
            } => start * (mt * mt) + control * (2.0 * mt * t) + end * (t * t),
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                start * (mt * mt * mt)
                    + control1 * (3.0 * mt * mt * t)
                    + control2 * (3.0 * mt * t * t)
                    + end * (t * t * t)
            }
        }
    }

    /// Tight bounds: the end points plus the curve's turning points on each
    /// axis
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new();

        bbox.add_point(self.start());
        bbox.add_point(self.end());

        let turning_points = match *self {
            Self::Line { .. } => [None; 4],
            Self::Quadratic {
                start,
                control,
                end,
            } => [
                quadratic_extremum(start.x, control.x, end.x),
                quadratic_extremum(start.y, control.y, end.y),
                None,
                None,
            ],
            Self::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let [x1, x2] = cubic_extrema(start.x, control1.x, control2.x, end.x);
                let [y1, y2] = cubic_extrema(start.y, control1.y, control2.y, end.y);

                [x1, x2, y1, y2]
            }
        };

        for t in turning_points.into_iter().flatten() {
            bbox.add_point(self.point_at(t));
        }

        bbox
    }
}

fn interior(t: f32) -> Option<f32> {
    (t > 0.0 && t < 1.0).then(|| t)
}

fn quadratic_extremum(p0: f32, p1: f32, p2: f32) -> Option<f32> {
    let denom = p0 - 2.0 * p1 + p2;

    if denom.abs() <= f32::EPSILON {
        return None;
    }

    interior((p0 - p1) / denom)
}

/// Roots of the derivative `a t^2 + b t + c` of a one-dimensional cubic
fn cubic_extrema(p0: f32, p1: f32, p2: f32, p3: f32) -> [Option<f32>; 2] {
    let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
    let b = 6.0 * (p0 - 2.0 * p1 + p2);
    let c = 3.0 * (p1 - p0);

    if a.abs() <= f32::EPSILON {
        if b.abs() <= f32::EPSILON {
            return [None, None];
        }

        return [interior(-c / b), None];
    }

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return [None, None];
    }

    let root = discriminant.sqrt();

    [
        interior((-b + root) / (2.0 * a)),
        interior((-b - root) / (2.0 * a)),
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cubic_bounds_include_turning_points() {
        let curve = Segment::Cubic {
            start: Point::new(0.0, 0.0),
            control1: Point::new(0.0, 100.0),
            control2: Point::new(100.0, 100.0),
            end: Point::new(100.0, 0.0),
        };

        let bbox = curve.bounding_box();

        assert_eq!(bbox.min, Point::new(0.0, 0.0));
        assert!((bbox.max.y - 75.0).abs() < 1e-3);
        assert_eq!(bbox.max.x, 100.0);
    }

    #[test]
    fn quadratic_bounds_stop_short_of_control_point() {
        let curve = Segment::Quadratic {
            start: Point::new(0.0, 0.0),
            control: Point::new(50.0, 100.0),
            end: Point::new(100.0, 0.0),
        };

        assert!((curve.bounding_box().max.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn transform_moves_every_point() {
        let line = Segment::Line {
            start: Point::new(1.0, 2.0),
            end: Point::new(3.0, 4.0),
        };

        let moved = line.transform(Matrix::new_translation(10.0, 0.0));

        assert_eq!(moved.start(), Point::new(11.0, 2.0));
        assert_eq!(moved.end(), Point::new(13.0, 4.0));
    }
}
