//! Dial geometry and the pointer sign convention.
//!
//! # Sign Convention
//!
//! Screen angles are measured from the 3 o'clock direction and increase
//! clockwise, because screen y grows downward. An axis value `v` is drawn at
//! screen angle `arc_center - v`, so **positive values move counter-clockwise**:
//!
//! | Axis  | Arc center | Positive value moves the pointer |
//! |-------|------------|----------------------------------|
//! | Roll  | 180° (9 o'clock) | down the left arc          |
//! | Pitch | 0° (3 o'clock)   | up the right arc           |
//!
//! Sprites follow the same convention: a positive angle rotates them
//! counter-clockwise (see [`Raster::rotated`](crate::raster::Raster::rotated)).
//! With a right-facing side view, positive pitch lifts the nose.

use embedded_graphics::prelude::*;

use crate::math;

/// One of the two measured axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Roll,
    Pitch,
}

impl Axis {
    pub const ALL: [Self; 2] = [Self::Roll, Self::Pitch];

    /// Screen angle (degrees) of the arc center for this axis.
    #[inline]
    pub const fn arc_center_deg(self) -> f32 {
        match self {
            Self::Roll => 180.0,
            Self::Pitch => 0.0,
        }
    }

    /// -1 for the left half of the dial, +1 for the right half.
    #[inline]
    pub const fn side(self) -> f32 {
        match self {
            Self::Roll => -1.0,
            Self::Pitch => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Roll => "ROLL",
            Self::Pitch => "PITCH",
        }
    }
}

/// Screen angle at which `value` degrees is drawn on `axis`'s arc.
#[inline]
pub fn screen_angle(
    axis: Axis,
    value: f32,
) -> f32 {
    axis.arc_center_deg() - value
}

/// Point at `radius` pixels from `center` along `screen_deg`.
#[inline]
pub fn polar(
    center: (f32, f32),
    radius: f32,
    screen_deg: f32,
) -> (f32, f32) {
    let (sin, cos) = math::sin_cos_deg(screen_deg);
    (center.0 + radius * cos, center.1 + radius * sin)
}

/// [`polar`] rounded to the pixel grid.
#[inline]
pub fn polar_point(
    center: (f32, f32),
    radius: f32,
    screen_deg: f32,
) -> Point {
    let (x, y) = polar(center, radius, screen_deg);
    Point::new(math::round(x) as i32, math::round(y) as i32)
}
