//! Static backdrop: background fill, dial arcs, tick scales and numerals.
//!
//! Built exactly once per configuration. Every frame starts from
//! [`Backdrop::copy`], so the expensive part (anti-aliasing-free but
//! numerous line and glyph draws) never runs in the render loop.
//!
//! Each axis gets a scale of +/- [`SCALE_HALF_SPAN_DEG`] around its arc
//! center: a minor tick every [`MINOR_TICK_STEP_DEG`], a longer and brighter
//! major tick every [`MAJOR_TICK_STEP_DEG`]. Major ticks within
//! [`LABEL_LIMIT_DEG`] carry the absolute offset as a numeral, centered on
//! its bounding box at [`NUMERAL_RADIUS`].

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{BACKGROUND, DIAL_ARC, TICK_MAJOR, TICK_MINOR};
use crate::config::{
    DIAL_ARC_RADIUS,
    GaugeConfig,
    LABEL_LIMIT_DEG,
    MAJOR_TICK_INNER_RADIUS,
    MAJOR_TICK_STEP_DEG,
    MAJOR_TICK_WIDTH,
    MINOR_TICK_INNER_RADIUS,
    MINOR_TICK_STEP_DEG,
    MINOR_TICK_WIDTH,
    NUMERAL_RADIUS,
    SCALE_HALF_SPAN_DEG,
    TICK_OUTER_RADIUS,
};
use crate::geometry::{Axis, polar_point, screen_angle};
use crate::math;
use crate::raster::Raster;
use crate::styles::{CENTERED, NUMERAL_STYLE};

/// The immutable background raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backdrop {
    raster: Raster,
}

impl Backdrop {
    pub fn build(config: &GaugeConfig) -> Self {
        let mut raster = Raster::filled(config.size, config.size, BACKGROUND);
        for axis in Axis::ALL {
            draw_dial_arc(&mut raster, config, axis);
            draw_scale(&mut raster, config, axis);
        }
        Self { raster }
    }

    /// Fresh copy to draw a frame on.
    #[inline]
    pub fn copy(&self) -> Raster { self.raster.clone() }

    #[inline]
    pub const fn raster(&self) -> &Raster { &self.raster }
}

fn stroke_width(
    design_width: f32,
    scale: f32,
) -> u32 {
    (math::round(design_width * scale) as u32).max(1)
}

fn draw_dial_arc(
    raster: &mut Raster,
    config: &GaugeConfig,
    axis: Axis,
) {
    let span = SCALE_HALF_SPAN_DEG as f32;
    let diameter = math::round(2.0 * DIAL_ARC_RADIUS * config.scale()) as u32;
    Arc::with_center(
        config.center(),
        diameter,
        (axis.arc_center_deg() - span).deg(),
        (2.0 * span).deg(),
    )
    .into_styled(PrimitiveStyle::with_stroke(DIAL_ARC, 1))
    .draw(raster)
    .ok();
}

fn draw_scale(
    raster: &mut Raster,
    config: &GaugeConfig,
    axis: Axis,
) {
    let center = config.center_f();
    let scale = config.scale();
    let major_style = PrimitiveStyle::with_stroke(TICK_MAJOR, stroke_width(MAJOR_TICK_WIDTH, scale));
    let minor_style = PrimitiveStyle::with_stroke(TICK_MINOR, stroke_width(MINOR_TICK_WIDTH, scale));

    for offset in (-SCALE_HALF_SPAN_DEG..=SCALE_HALF_SPAN_DEG).step_by(MINOR_TICK_STEP_DEG as usize) {
        let major = offset % MAJOR_TICK_STEP_DEG == 0;
        let angle = screen_angle(axis, offset as f32);
        let inner_radius = if major { MAJOR_TICK_INNER_RADIUS } else { MINOR_TICK_INNER_RADIUS };

        let outer = polar_point(center, TICK_OUTER_RADIUS * scale, angle);
        let inner = polar_point(center, inner_radius * scale, angle);
        Line::new(inner, outer)
            .into_styled(if major { major_style } else { minor_style })
            .draw(raster)
            .ok();

        if major && offset.abs() <= LABEL_LIMIT_DEG {
            let mut label: String<4> = String::new();
            write!(label, "{}", offset.unsigned_abs()).ok();
            let position = polar_point(center, NUMERAL_RADIUS * scale, angle);
            Text::with_text_style(&label, position, NUMERAL_STYLE, CENTERED)
                .draw(raster)
                .ok();
        }
    }
}
