//! Contour extraction and polyline simplification.

pub mod border;
pub mod marching_squares;
pub mod simplify;
