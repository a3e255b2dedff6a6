//! Decoding and rendering core for WAMOS-II polar radar captures.
//!
//! A capture is a text header delimited by an `EOH` marker followed by a
//! binary ray/range sample payload. The modules run as a fixed pipeline:
//! header parse, image decode, optional interpolation, polar scan conversion,
//! and metadata embedding, with `PolarSession` as the orchestrator consumed
//! by display front ends.

pub mod decode;
pub mod header;
pub mod metadata;
pub mod prelude;
pub mod raster;
pub mod render;
pub mod session;
pub mod telemetry;

pub use prelude::{FormatError, PolarError, PolarResult};
pub use session::PolarSession;
