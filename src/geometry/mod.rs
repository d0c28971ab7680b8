pub use bounding_box::BoundingBox;
pub use outline::Outline;
pub use path::Path;
pub use point::Point;
pub use segment::Segment;

mod bounding_box;
mod outline;
mod path;
pub mod path_builder;
mod point;
mod segment;
