pub mod catalog;
pub mod geometry;

pub use catalog::{MemberStation, Network};
pub use geometry::{line_colour, Coord, Line, Segment};
