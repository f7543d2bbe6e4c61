//! Color palette for the gauge.
//!
//! Everything is composed in 8-bit `Rgb888` so alpha blending of the sprites
//! and the warning tint keeps full precision. The panel's RGB565 format is
//! only produced once, when the finished raster is packed into a
//! [`Frame`](crate::frame::Frame).

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Background fill and the dark phase of the critical flash.
pub const BLACK: Rgb888 = Rgb888::BLACK;

/// Pure white. Text on the red phase of the critical flash.
pub const WHITE: Rgb888 = Rgb888::WHITE;

/// Pure red. Critical flash, warning tint, peak markers.
pub const RED: Rgb888 = Rgb888::RED;

// =============================================================================
// Dial
// =============================================================================

pub const BACKGROUND: Rgb888 = BLACK;

/// Accent orange used for the vehicle bodies and status banners.
pub const ACCENT: Rgb888 = Rgb888::new(0xFF, 0x6D, 0x00);

/// Numeric readouts.
pub const TEXT: Rgb888 = Rgb888::new(0xE0, 0xE0, 0xE0);

/// Axis labels under the readouts.
pub const TEXT_LABEL: Rgb888 = Rgb888::new(0x9E, 0x9E, 0x9E);

/// Scale numerals. Kept dim so they don't compete with the readouts.
pub const TEXT_DIM: Rgb888 = Rgb888::new(0x60, 0x60, 0x60);

pub const TICK_MAJOR: Rgb888 = WHITE;
pub const TICK_MINOR: Rgb888 = Rgb888::new(0x40, 0x40, 0x40);

/// Thin arc the ticks hang from.
pub const DIAL_ARC: Rgb888 = Rgb888::new(0x30, 0x30, 0x30);

pub const POINTER: Rgb888 = Rgb888::new(0xFF, 0x3D, 0x00);

pub const PEAK_MARKER: Rgb888 = RED;

// =============================================================================
// Vehicle Silhouettes
// =============================================================================

pub const BODY: Rgb888 = ACCENT;
pub const GLASS: Rgb888 = Rgb888::new(0x20, 0x20, 0x20);
pub const TIRE: Rgb888 = Rgb888::new(0x30, 0x30, 0x30);
pub const BUMPER: Rgb888 = Rgb888::new(0x40, 0x40, 0x40);
pub const RIM: Rgb888 = Rgb888::new(0x90, 0x90, 0x90);
pub const CHASSIS: Rgb888 = Rgb888::new(0x15, 0x15, 0x15);
pub const HANDLE: Rgb888 = Rgb888::new(0x10, 0x10, 0x10);
pub const TAIL_LIGHT: Rgb888 = Rgb888::new(0xAA, 0x00, 0x00);
pub const CLEAR_LENS: Rgb888 = Rgb888::new(0xDD, 0xDD, 0xDD);
