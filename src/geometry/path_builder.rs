use super::{Outline, Path, Point};

/// Accumulates contours while a charstring or glyph description is executed
#[derive(Debug)]
pub struct PathBuilder {
    pub outline: Outline,
    pub width_vector: Point,
    pub side_bearing: Point,
    pub current_path: Path,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            current_path: Path::new(Point::origin()),
            outline: Outline::empty(),
            width_vector: Point::origin(),
            side_bearing: Point::origin(),
        }
    }

    pub fn current_point(&self) -> Point {
        self.current_path.current_point
    }

    /// Starts a new contour, finishing the open one if it has any segments
    pub fn move_to(&mut self, p: Point) {
        self.finish_current_path();
        self.current_path = Path::new(p);
    }

    pub fn relative_move_to(&mut self, dx: f32, dy: f32) {
        let current_point = self.current_point();
        self.move_to(Point::new(current_point.x + dx, current_point.y + dy));
    }

    pub fn line_to(&mut self, p: Point) {
        self.current_path.line_to(p);
    }

    pub fn relative_line_to(&mut self, dx: f32, dy: f32) {
        let current_point = self.current_point();
        self.line_to(Point::new(current_point.x + dx, current_point.y + dy));
    }

    pub fn horizontal_line_to(&mut self, dx: f32) {
        self.relative_line_to(dx, 0.0);
    }

    pub fn vertical_line_to(&mut self, dy: f32) {
        self.relative_line_to(0.0, dy);
    }

    pub fn curve_to(&mut self, first_control_point: Point, second_control_point: Point, end: Point) {
        self.current_path
            .cubic_curve_to(first_control_point, second_control_point, end);
    }

    pub fn relative_relative_curve_to(
        &mut self,
        dx1: f32,
        dy1: f32,
        dx2: f32,
        dy2: f32,
        dx3: f32,
        dy3: f32,
    ) {
        let current_point = self.current_point();

        let first_control_point = Point::new(current_point.x + dx1, current_point.y + dy1);
        let second_control_point =
            Point::new(first_control_point.x + dx2, first_control_point.y + dy2);
        let end = Point::new(second_control_point.x + dx3, second_control_point.y + dy3);

        self.curve_to(first_control_point, second_control_point, end);
    }

    pub fn horizontal_vertical_curve_to(&mut self, dx1: f32, dx2: f32, dy2: f32, dy3: f32) {
        self.relative_relative_curve_to(dx1, 0.0, dx2, dy2, 0.0, dy3)
    }

    pub fn vertical_horizontal_curve_to(&mut self, dy1: f32, dx2: f32, dy2: f32, dx3: f32) {
        self.relative_relative_curve_to(0.0, dy1, dx2, dy2, dx3, 0.0)
    }

    pub fn close_path(&mut self) {
        let start = self.current_path.start();
        self.current_path.close_path();
        self.finish_current_path();
        self.current_path = Path::new(start);
    }

    /// Sets the left side bearing and advance width, as done by `hsbw`. The
    /// current point moves to the side bearing
    pub fn hsbw(&mut self, side_bearing_x_coord: f32, width_vector_x_coord: f32) {
        self.sbw(side_bearing_x_coord, 0.0, width_vector_x_coord, 0.0);
    }

    pub fn sbw(&mut self, sbx: f32, sby: f32, wx: f32, wy: f32) {
        self.side_bearing = Point::new(sbx, sby);
        self.width_vector = Point::new(wx, wy);
        self.current_path = Path::new(self.side_bearing);
    }

    /// Moves the current point without emitting a segment or starting a contour
    pub fn set_current_point(&mut self, p: Point) {
        self.current_path.current_point = p;
    }

    /// Every contour is implicitly closed once the glyph ends
    pub fn finish(mut self) -> Outline {
        if !self.current_path.is_empty() {
            self.current_path.close_path();
        }
        self.finish_current_path();
        self.outline
    }

    fn finish_current_path(&mut self) {
        if self.current_path.is_empty() {
            return;
        }

        if !self.current_path.is_closed() {
            self.current_path.close_path();
        }

        let current_point = self.current_path.current_point;
        let path = std::mem::replace(&mut self.current_path, Path::new(current_point));
        self.outline.paths.push(path);
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn move_to_closes_open_contour() {
        let mut builder = PathBuilder::new();

        builder.move_to(Point::new(0.0, 0.0));
        builder.relative_line_to(10.0, 0.0);
        builder.relative_line_to(0.0, 10.0);
        builder.move_to(Point::new(20.0, 20.0));
        builder.relative_line_to(5.0, 5.0);

        let outline = builder.finish();

        assert_eq!(outline.paths.len(), 2);
        assert!(outline.paths.iter().all(Path::is_closed));
        assert_eq!(outline.paths[0].segments.len(), 3);
    }

    #[test]
    fn close_path_does_not_duplicate_closing_segment() {
        let mut builder = PathBuilder::new();

        builder.move_to(Point::new(0.0, 0.0));
        builder.line_to(Point::new(10.0, 0.0));
        builder.line_to(Point::new(0.0, 0.0));
        builder.close_path();

        let outline = builder.finish();

        assert_eq!(outline.paths.len(), 1);
        assert_eq!(outline.segment_count(), 2);
    }
}
