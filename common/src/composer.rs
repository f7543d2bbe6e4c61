//! Frame composition.
//!
//! # Layer Order
//!
//! ```text
//! critical? ──yes──▶ full-frame flash + "CRITICAL / <axis>"  ──┐
//!    │ no                                                      │
//!    ▼                                                         │
//! backdrop copy                                                │
//!  → pointers on both arcs                                     │
//!  → peak markers                                              │
//!  → readouts + axis labels (red while warning)                │
//!  → rear sprite (roll), side sprite (pitch)                   │
//!  → calibration banner                                        │
//!  → warning tint                                              │
//!    ▼                                                         ▼
//! pack to RGB565 once ─────────────────────────────────▶ Frame
//! ```
//!
//! The composer owns both caches. They are built in [`FrameComposer::new`]
//! or handed in through [`FrameComposer::with_caches`], never created
//! lazily, so the first frame costs the same as every other.

use embedded_graphics::prelude::*;

use crate::alert::{self, AlertState, FlashPhase};
use crate::backdrop::Backdrop;
use crate::colors::{RED, TEXT};
use crate::config::{GaugeConfig, REAR_SPRITE_OFFSET_Y, SIDE_SPRITE_OFFSET_Y};
use crate::error::ConfigError;
use crate::frame::Frame;
use crate::geometry::Axis;
use crate::peaks::PeakAngles;
use crate::raster::Raster;
use crate::smoother::Attitude;
use crate::sprites::{SpriteCache, SpriteView};
use crate::widgets::{
    draw_axis_label,
    draw_calibration_banner,
    draw_critical_screen,
    draw_peak_marker,
    draw_pointer,
    draw_readout,
};

/// Per-frame extras that are not derived from the attitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Overlay {
    /// Peak markers; zero entries are not drawn.
    pub peaks: PeakAngles,
    /// Show the "CALIBRATING..." banner.
    pub calibrating: bool,
}

pub struct FrameComposer {
    config: GaugeConfig,
    backdrop: Backdrop,
    sprites: SpriteCache,
}

impl FrameComposer {
    /// Validate `config` and build both caches.
    pub fn new(config: GaugeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let backdrop = Backdrop::build(&config);
        let sprites = SpriteCache::build(&config);
        Ok(Self::with_caches(config, backdrop, sprites))
    }

    /// Assemble from prebuilt caches (shared between gauges, or built ahead
    /// of time).
    pub const fn with_caches(
        config: GaugeConfig,
        backdrop: Backdrop,
        sprites: SpriteCache,
    ) -> Self {
        Self {
            config,
            backdrop,
            sprites,
        }
    }

    #[inline]
    pub const fn config(&self) -> &GaugeConfig { &self.config }

    #[inline]
    pub const fn sprites(&self) -> &SpriteCache { &self.sprites }

    #[inline]
    pub const fn backdrop(&self) -> &Backdrop { &self.backdrop }

    /// Render a plain frame: no peak markers, no banner.
    pub fn render(
        &self,
        attitude: Attitude,
        now_ms: u64,
    ) -> Frame {
        self.render_with(attitude, now_ms, &Overlay::default())
    }

    pub fn render_with(
        &self,
        attitude: Attitude,
        now_ms: u64,
        overlay: &Overlay,
    ) -> Frame {
        let (raster, _) = self.compose(attitude, now_ms, overlay);
        Frame::from_raster(&raster)
    }

    /// Compose in 8-bit RGB and report the alert state the frame shows.
    pub fn compose(
        &self,
        attitude: Attitude,
        now_ms: u64,
        overlay: &Overlay,
    ) -> (Raster, AlertState) {
        let thresholds = &self.config.thresholds;
        let state = alert::evaluate(attitude, thresholds);

        if let AlertState::Critical(axes) = state {
            let mut raster = Raster::new(self.config.size, self.config.size);
            let phase = FlashPhase::at(now_ms, thresholds.critical_half_period_ms);
            draw_critical_screen(&mut raster, &self.config, axes, phase);
            return (raster, state);
        }

        let mut canvas = self.backdrop.copy();
        let readout_color = if matches!(state, AlertState::Warning(_)) { RED } else { TEXT };

        for axis in Axis::ALL {
            draw_pointer(&mut canvas, &self.config, axis, attitude.get(axis));

            let (low, high) = overlay.peaks.range(axis);
            draw_peak_marker(&mut canvas, &self.config, axis, low);
            draw_peak_marker(&mut canvas, &self.config, axis, high);

            draw_readout(&mut canvas, &self.config, axis, attitude.get(axis), readout_color);
            draw_axis_label(&mut canvas, &self.config, axis);
        }

        self.blit_sprite(&mut canvas, SpriteView::Rear, attitude.roll, REAR_SPRITE_OFFSET_Y);
        self.blit_sprite(&mut canvas, SpriteView::Side, attitude.pitch, SIDE_SPRITE_OFFSET_Y);

        if overlay.calibrating {
            draw_calibration_banner(&mut canvas, &self.config);
        }

        if let AlertState::Warning(warning) = state {
            canvas.tint(RED, warning.tint_alpha(now_ms, thresholds));
        }

        (canvas, state)
    }

    /// Center the cached sprite for `angle` at `offset_y` design units
    /// below the dial center.
    fn blit_sprite(
        &self,
        canvas: &mut Raster,
        view: SpriteView,
        angle: f32,
        offset_y: f32,
    ) {
        let sprite = self.sprites.get(view, angle);
        let center = self.config.design_point(0.0, offset_y);
        let half = (sprite.width() / 2) as i32;
        canvas.blit(sprite, center - Point::new(half, half));
    }
}
