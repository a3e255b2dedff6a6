pub mod colormap;
pub mod polar;

pub use colormap::Colormap;
pub use polar::{PolarRenderer, RenderOptions};
