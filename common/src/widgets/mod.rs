//! Dynamic dial elements drawn on top of the backdrop every frame.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb888>`, so they draw
//! into a [`Raster`](crate::raster::Raster) in the composer and into any other
//! target in tests.

mod popups;
mod primitives;
mod readouts;

pub use popups::{draw_calibration_banner, draw_critical_screen};
pub use primitives::{draw_peak_marker, draw_pointer, pointer_vertices};
pub use readouts::{draw_axis_label, draw_readout, format_readout};
