//! Pointer and marker shapes on the arcs.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Triangle};

use crate::colors::{PEAK_MARKER, POINTER};
use crate::config::{
    GaugeConfig,
    PEAK_MARKER_DIAMETER,
    PEAK_MARKER_LIMIT_DEG,
    PEAK_MARKER_RADIUS,
    POINTER_BASE_WIDTH,
    POINTER_LENGTH,
    POINTER_TIP_RADIUS,
};
use crate::geometry::{Axis, polar, polar_point, screen_angle};
use crate::math;

const POINTER_FILL: PrimitiveStyle<Rgb888> = PrimitiveStyle::with_fill(POINTER);
const MARKER_FILL: PrimitiveStyle<Rgb888> = PrimitiveStyle::with_fill(PEAK_MARKER);

/// Tip and the two base corners of the pointer for `value` on `axis`.
///
/// The tip points outward at the tick ring; the base is perpendicular to the
/// radius. The value is clamped to the scale span so a pointer never leaves
/// its arc.
pub fn pointer_vertices(
    config: &GaugeConfig,
    axis: Axis,
    value: f32,
) -> [Point; 3] {
    let span = crate::config::SCALE_HALF_SPAN_DEG as f32 + 5.0;
    let angle = screen_angle(axis, value.clamp(-span, span));
    let center = config.center_f();
    let scale = config.scale();

    let tip = polar_point(center, POINTER_TIP_RADIUS * scale, angle);
    let (bx, by) = polar(center, (POINTER_TIP_RADIUS - POINTER_LENGTH) * scale, angle);

    // Unit vector along the base, perpendicular to the radius
    let (sin, cos) = math::sin_cos_deg(angle);
    let half = POINTER_BASE_WIDTH * scale / 2.0;
    let left = Point::new(math::round(bx - sin * half) as i32, math::round(by + cos * half) as i32);
    let right = Point::new(math::round(bx + sin * half) as i32, math::round(by - cos * half) as i32);

    [tip, left, right]
}

/// Draw the pointer triangle for `value` on `axis`.
pub fn draw_pointer<D>(
    display: &mut D,
    config: &GaugeConfig,
    axis: Axis,
    value: f32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let [tip, left, right] = pointer_vertices(config, axis, value);
    Triangle::new(tip, left, right)
        .into_styled(POINTER_FILL)
        .draw(display)
        .ok();
}

/// Draw a peak dot. Zero peaks are not drawn; values past the scale end are
/// pinned to [`PEAK_MARKER_LIMIT_DEG`].
pub fn draw_peak_marker<D>(
    display: &mut D,
    config: &GaugeConfig,
    axis: Axis,
    value: f32,
) where
    D: DrawTarget<Color = Rgb888>,
{
    if value == 0.0 || !value.is_finite() {
        return;
    }
    let value = value.clamp(-PEAK_MARKER_LIMIT_DEG, PEAK_MARKER_LIMIT_DEG);
    let scale = config.scale();
    let center = polar_point(config.center_f(), PEAK_MARKER_RADIUS * scale, screen_angle(axis, value));
    let diameter = (math::round(PEAK_MARKER_DIAMETER * scale) as u32).max(3);

    Circle::with_center(center, diameter)
        .into_styled(MARKER_FILL)
        .draw(display)
        .ok();
}
