//! Numeric readouts and axis labels in the center cluster.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;

use crate::config::{AXIS_LABEL_OFFSET_Y, GaugeConfig, READOUT_OFFSET_X, READOUT_OFFSET_Y};
use crate::geometry::Axis;
use crate::math;
use crate::styles::{AXIS_LABEL_STYLE, CENTERED, READOUT_FONT};

/// Readouts saturate here; the sensor can't physically report more and it
/// keeps the text inside its buffer.
const READOUT_LIMIT: i32 = 999;

/// Rounded whole degrees with a degree sign: `12.6` -> `"13°"`, `-0.2` -> `"0°"`.
pub fn format_readout(value: f32) -> String<8> {
    let degrees = if value.is_finite() {
        (math::round(value) as i32).clamp(-READOUT_LIMIT, READOUT_LIMIT)
    } else {
        0
    };
    let mut text: String<8> = String::new();
    write!(text, "{degrees}°").ok();
    text
}

/// Draw the value readout for one axis, left for roll and right for pitch.
pub fn draw_readout<D>(
    display: &mut D,
    config: &GaugeConfig,
    axis: Axis,
    value: f32,
    color: Rgb888,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let text = format_readout(value);
    let position = config.design_point(axis.side() * READOUT_OFFSET_X, READOUT_OFFSET_Y);
    Text::with_text_style(&text, position, MonoTextStyle::new(READOUT_FONT, color), CENTERED)
        .draw(display)
        .ok();
}

/// Draw "ROLL" / "PITCH" under the matching readout.
pub fn draw_axis_label<D>(
    display: &mut D,
    config: &GaugeConfig,
    axis: Axis,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let position = config.design_point(axis.side() * READOUT_OFFSET_X, AXIS_LABEL_OFFSET_Y);
    Text::with_text_style(axis.label(), position, AXIS_LABEL_STYLE, CENTERED)
        .draw(display)
        .ok();
}
