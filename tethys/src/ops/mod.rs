//! Grid operators shared by the detectors.

pub mod convolution;
pub mod fill;
pub mod gradient;
pub mod labeling;
