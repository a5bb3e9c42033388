pub mod board;
pub mod course;
pub mod places;
