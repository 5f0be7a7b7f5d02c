pub mod approach;
pub mod geometry;
