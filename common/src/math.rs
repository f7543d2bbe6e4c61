//! Float helpers that work without `std`.
//!
//! `f32::sin`, `f32::round` and friends live in `std`, so everything goes
//! through `micromath` to keep the crate buildable for bare-metal targets.

use micromath::F32;

#[inline]
pub fn sin_cos_deg(degrees: f32) -> (f32, f32) {
    let radians = degrees.to_radians();
    (F32(radians).sin().0, F32(radians).cos().0)
}

#[inline]
pub fn sin(radians: f32) -> f32 { F32(radians).sin().0 }

#[inline]
pub fn abs(x: f32) -> f32 { F32(x).abs().0 }

#[inline]
pub fn floor(x: f32) -> f32 { F32(x).floor().0 }

#[inline]
pub fn ceil(x: f32) -> f32 { F32(x).ceil().0 }

#[inline]
pub fn round(x: f32) -> f32 { F32(x).round().0 }

/// Round to the nearest integer and clamp into `u8`.
#[inline]
pub fn to_u8(x: f32) -> u8 { round(x.clamp(0.0, 255.0)) as u8 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sin_cos_cardinal_directions() {
        let (s, c) = sin_cos_deg(90.0);
        assert!((s - 1.0).abs() < 0.01);
        assert!(c.abs() < 0.01);

        let (s, c) = sin_cos_deg(180.0);
        assert!(s.abs() < 0.01);
        assert!((c + 1.0).abs() < 0.01);
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(round(2.4), 2.0);
        assert_eq!(round(-2.6), -3.0);
        assert_eq!(floor(-0.5), -1.0);
        assert_eq!(ceil(0.2), 1.0);
        assert_eq!(to_u8(300.0), 255);
        assert_eq!(to_u8(-4.0), 0);
        assert_eq!(to_u8(127.6), 128);
    }
}
