pub mod image;
pub mod interpolate;

pub use image::ImageDecoder;
pub use interpolate::{InterpolationMethod, Interpolator};
