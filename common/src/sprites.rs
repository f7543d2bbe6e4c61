//! Pre-rotated vehicle silhouettes.
//!
//! Rotating an image with bicubic interpolation costs far too much to do
//! per frame on a microcontroller, so every view is rendered once and rotated
//! once per whole degree in the configured range. A frame then only looks up
//! `sprites[round(angle) - min]` and blits it.
//!
//! # Drawing
//!
//! Both silhouettes are vector art on a 64-unit grid centered on (0, 0):
//! rounded rectangles and circles through embedded-graphics, bodies and
//! windows through [`Raster::fill_polygon`]. They are drawn at
//! [`SUPERSAMPLE`] times the final resolution and box-filtered down, which
//! gives anti-aliased edges without an anti-aliasing rasterizer.
//!
//! Each canvas is [`CANVAS_EXTENT`] units square, enough transparent margin
//! for the bounding circle of either vehicle so no rotation clips.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, CornerRadii, PrimitiveStyle, Rectangle, RoundedRectangle};

use crate::colors::{BODY, BUMPER, CHASSIS, CLEAR_LENS, GLASS, HANDLE, RIM, TAIL_LIGHT, TIRE};
use crate::config::{GaugeConfig, SPRITE_ZOOM};
use crate::math;
use crate::raster::Raster;

/// Supersampling factor for the base silhouettes.
pub const SUPERSAMPLE: u32 = 4;

/// Canvas side in design units. The larger (rear) silhouette reaches ~45
/// units from its center.
pub const CANVAS_EXTENT: f32 = 96.0;

/// Which silhouette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpriteView {
    /// Seen from behind, rotates with roll.
    Rear,
    /// Seen from the right side, nose to the right, rotates with pitch.
    Side,
}

// =============================================================================
// Canvas
// =============================================================================

/// Supersampled drawing surface addressed in design units.
struct SpriteCanvas {
    raster: Raster,
    /// Supersampled pixels per design unit.
    unit: f32,
    /// Canvas center in supersampled pixels.
    origin: f32,
}

impl SpriteCanvas {
    fn new(px_per_unit: f32) -> Self {
        let side = sprite_side(px_per_unit) * SUPERSAMPLE;
        Self {
            raster: Raster::new(side, side),
            unit: px_per_unit * SUPERSAMPLE as f32,
            origin: side as f32 / 2.0,
        }
    }

    #[inline]
    fn map(
        &self,
        x: f32,
        y: f32,
    ) -> (f32, f32) {
        (self.origin + x * self.unit, self.origin + y * self.unit)
    }

    #[inline]
    fn map_point(
        &self,
        x: f32,
        y: f32,
    ) -> Point {
        let (px, py) = self.map(x, y);
        Point::new(math::round(px) as i32, math::round(py) as i32)
    }

    #[inline]
    fn length(
        &self,
        units: f32,
    ) -> u32 {
        math::round(units * self.unit).max(1.0) as u32
    }

    /// Axis-aligned rectangle, optionally with rounded corners.
    #[allow(clippy::too_many_arguments)]
    fn rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb888,
        radius: f32,
    ) {
        let area = Rectangle::new(self.map_point(x, y), Size::new(self.length(w), self.length(h)));
        let style = PrimitiveStyle::with_fill(color);
        if radius > 0.0 {
            let r = self.length(radius);
            RoundedRectangle::new(area, CornerRadii::new(Size::new(r, r)))
                .into_styled(style)
                .draw(&mut self.raster)
                .ok();
        } else {
            area.into_styled(style).draw(&mut self.raster).ok();
        }
    }

    fn circle(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        color: Rgb888,
    ) {
        Circle::with_center(self.map_point(cx, cy), self.length(2.0 * r))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.raster)
            .ok();
    }

    fn polygon(
        &mut self,
        points: &[(f32, f32)],
        color: Rgb888,
    ) {
        let mut mapped: heapless::Vec<(f32, f32), 12> = heapless::Vec::new();
        for &(x, y) in points {
            // Silhouette polygons have at most nine vertices
            mapped.push(self.map(x, y)).ok();
        }
        self.raster.fill_polygon(&mapped, color);
    }

    fn finish(self) -> Raster { self.raster.downsample(SUPERSAMPLE) }
}

/// Final sprite side in pixels (even, so the center is a pixel corner).
fn sprite_side(px_per_unit: f32) -> u32 {
    let side = math::ceil(CANVAS_EXTENT * px_per_unit) as u32;
    (side + 1) & !1
}

// =============================================================================
// Silhouettes
// =============================================================================

/// Pickup seen from behind: tires, axle, bumper, tailgate with lights, cab.
fn draw_rear(c: &mut SpriteCanvas) {
    // Tires
    let tire_top = 6.0;
    c.rect(-28.0, tire_top, 16.0, 26.0, TIRE, 4.0);
    c.rect(12.0, tire_top, 16.0, 26.0, TIRE, 4.0);

    // Axle and differential
    c.rect(-10.0, tire_top + 12.0, 20.0, 8.0, CHASSIS, 2.0);
    c.rect(-20.0, tire_top + 14.0, 40.0, 4.0, CHASSIS, 0.0);

    c.rect(-30.0, 4.0, 60.0, 8.0, BUMPER, 2.0);

    // Tailgate
    let (body_w, body_top) = (58.0, -12.0);
    let half_body = body_w / 2.0;
    c.rect(-half_body, body_top, body_w, 24.0, BODY, 2.0);
    c.rect(-5.0, body_top + 4.0, 10.0, 3.0, HANDLE, 1.0);

    // Vertical tail lights with reverse lamps
    let light_top = body_top + 2.0;
    for x in [-half_body + 1.0, half_body - 7.0] {
        c.rect(x, light_top, 6.0, 14.0, TAIL_LIGHT, 1.0);
        c.rect(x, light_top + 4.0, 6.0, 4.0, CLEAR_LENS, 0.0);
    }

    // Cab, slightly narrower at the roof
    let cab_h = 20.0;
    let cab_top = body_top - cab_h + 2.0;
    c.polygon(
        &[(-22.0, cab_top), (22.0, cab_top), (25.0, cab_top + cab_h), (-25.0, cab_top + cab_h)],
        BODY,
    );
    c.rect(-18.0, cab_top + 4.0, 36.0, 10.0, GLASS, 2.0);

    // Mirrors
    c.rect(-31.0, cab_top + 6.0, 5.0, 8.0, BODY, 1.0);
    c.rect(26.0, cab_top + 6.0, 5.0, 8.0, BODY, 1.0);
}

/// Pickup seen from the right: long bed to the left, cab and nose right.
fn draw_side(c: &mut SpriteCanvas) {
    let split = 4.0;
    let rear = -32.0;
    let nose = 32.0;
    let (rear_wheel, front_wheel, wheel_y) = (-16.0, 20.0, 14.0);

    for x in [rear_wheel, front_wheel] {
        c.circle(x, wheel_y, 11.0, TIRE);
        c.circle(x, wheel_y, 6.0, RIM);
        c.circle(x, wheel_y, 2.0, TIRE);
    }

    c.rect(-28.0, 10.0, 56.0, 3.0, CHASSIS, 0.0);

    // Bed
    c.polygon(
        &[
            (rear, -6.0),
            (split, -6.0),
            (split, 6.0),
            (rear_wheel + 8.0, 6.0),
            (rear_wheel - 8.0, 6.0),
            (rear, 4.0),
        ],
        BODY,
    );

    // Cab
    c.polygon(
        &[
            (split, -6.0),
            (split, -20.0),
            (split + 12.0, -20.0),
            (split + 20.0, -10.0),
            (nose, -8.0),
            (nose, 6.0),
            (front_wheel + 8.0, 6.0),
            (front_wheel - 8.0, 6.0),
            (split, 6.0),
        ],
        BODY,
    );

    // Wheel flares
    c.polygon(
        &[
            (rear_wheel - 10.0, -4.0),
            (rear_wheel + 10.0, -4.0),
            (rear_wheel + 10.0, 4.0),
            (rear_wheel + 8.0, 8.0),
            (rear_wheel - 8.0, 8.0),
            (rear_wheel - 10.0, 4.0),
        ],
        BODY,
    );
    c.polygon(
        &[
            (front_wheel - 8.0, -6.0),
            (front_wheel + 8.0, -6.0),
            (front_wheel + 8.0, 4.0),
            (front_wheel + 6.0, 8.0),
            (front_wheel - 6.0, 8.0),
            (front_wheel - 8.0, 4.0),
        ],
        BODY,
    );

    // Door and access-door windows split by the B-pillar
    c.polygon(
        &[(split + 4.0, -18.0), (split + 12.0, -18.0), (split + 18.0, -10.0), (split + 4.0, -10.0)],
        GLASS,
    );
    c.polygon(
        &[(split + 2.0, -18.0), (split - 4.0, -18.0), (split - 4.0, -10.0), (split + 2.0, -12.0)],
        GLASS,
    );
    c.rect(split + 2.0, -18.0, 2.0, 8.0, BODY, 0.0);

    c.polygon(&[(nose - 2.0, -8.0), (nose, -7.0), (nose, -4.0), (nose - 3.0, -4.0)], CLEAR_LENS);
    c.rect(rear, -4.0, 2.0, 8.0, TAIL_LIGHT, 0.0);
}

/// Render the unrotated silhouette for `view` at `px_per_unit`.
pub fn render_base(
    view: SpriteView,
    px_per_unit: f32,
) -> Raster {
    let mut canvas = SpriteCanvas::new(px_per_unit);
    match view {
        SpriteView::Rear => draw_rear(&mut canvas),
        SpriteView::Side => draw_side(&mut canvas),
    }
    canvas.finish()
}

// =============================================================================
// Cache
// =============================================================================

/// One rotated image per view per whole degree in `[min_deg, max_deg]`.
///
/// Built once, immutable afterwards, owned by the
/// [`FrameComposer`](crate::composer::FrameComposer).
#[derive(Clone, Debug)]
pub struct SpriteCache {
    min_deg: i32,
    max_deg: i32,
    rear: Vec<Raster>,
    side: Vec<Raster>,
}

impl SpriteCache {
    /// Render both views and pre-rotate them across the configured range.
    /// The range must be non-empty (checked by [`GaugeConfig::validate`]).
    pub fn build(config: &GaugeConfig) -> Self {
        let (min_deg, max_deg) = (config.sprite_min_deg, config.sprite_max_deg.max(config.sprite_min_deg));
        let px_per_unit = config.scale() * SPRITE_ZOOM;

        let rotate_all = |base: Raster| -> Vec<Raster> {
            (min_deg..=max_deg).map(|deg| base.rotated(deg as f32)).collect()
        };

        let rear = rotate_all(render_base(SpriteView::Rear, px_per_unit));
        let side = rotate_all(render_base(SpriteView::Side, px_per_unit));
        tracing::debug!(min_deg, max_deg, sprites = rear.len() + side.len(), "sprite cache built");

        Self {
            min_deg,
            max_deg,
            rear,
            side,
        }
    }

    /// Sprite for `angle`, rounded to the nearest degree and clamped to the
    /// cached range. Never rotates.
    #[inline]
    pub fn get(
        &self,
        view: SpriteView,
        angle: f32,
    ) -> &Raster {
        let sprites = match view {
            SpriteView::Rear => &self.rear,
            SpriteView::Side => &self.side,
        };
        &sprites[self.index(angle)]
    }

    #[inline]
    fn index(
        &self,
        angle: f32,
    ) -> usize {
        // NaN saturates to 0 in the cast, i.e. the level sprite
        let deg = (math::round(angle) as i32).clamp(self.min_deg, self.max_deg);
        (deg - self.min_deg) as usize
    }

    /// Number of cached angles per view.
    #[inline]
    pub fn len(&self) -> usize { self.rear.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.rear.is_empty() }

    #[inline]
    pub const fn range(&self) -> (i32, i32) { (self.min_deg, self.max_deg) }

    /// Side of every sprite in pixels.
    #[inline]
    pub fn sprite_side(&self) -> u32 { self.rear.first().map_or(0, Raster::width) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GaugeConfig {
        let mut config = GaugeConfig::DEFAULT.with_size(120);
        config.sprite_min_deg = -5;
        config.sprite_max_deg = 5;
        config
    }

    fn opaque_count(raster: &Raster) -> usize { raster.pixels().iter().filter(|p| p.a == 255).count() }

    #[test]
    fn test_sprite_side_is_even() {
        assert_eq!(sprite_side(1.0), 96);
        assert_eq!(sprite_side(0.6437), 62);
        assert_eq!(sprite_side(0.5) % 2, 0);
    }

    #[test]
    fn test_base_silhouettes_have_content_and_soft_edges() {
        for view in [SpriteView::Rear, SpriteView::Side] {
            let base = render_base(view, 0.8);
            assert!(opaque_count(&base) > 500, "{view:?} too empty");
            let partial = base.pixels().iter().filter(|p| p.a > 0 && p.a < 255).count();
            assert!(partial > 0, "{view:?} has no anti-aliased edge");
            // Margin stays transparent
            assert_eq!(base.pixel(0, 0).unwrap().a, 0);
        }
    }

    #[test]
    fn test_cache_covers_range() {
        let cache = SpriteCache::build(&small_config());
        assert_eq!(cache.len(), 11);
        assert_eq!(cache.range(), (-5, 5));
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_lookup_rounds_to_nearest() {
        let cache = SpriteCache::build(&small_config());
        assert!(core::ptr::eq(cache.get(SpriteView::Rear, 2.4), cache.get(SpriteView::Rear, 2.0)));
        assert!(core::ptr::eq(cache.get(SpriteView::Rear, 2.6), cache.get(SpriteView::Rear, 3.0)));
        assert!(core::ptr::eq(cache.get(SpriteView::Side, -0.4), cache.get(SpriteView::Side, 0.0)));
    }

    #[test]
    fn test_lookup_clamps_to_boundaries() {
        let cache = SpriteCache::build(&small_config());
        assert!(core::ptr::eq(cache.get(SpriteView::Rear, 90.0), cache.get(SpriteView::Rear, 5.0)));
        assert!(core::ptr::eq(cache.get(SpriteView::Side, -1e9), cache.get(SpriteView::Side, -5.0)));
        assert!(core::ptr::eq(cache.get(SpriteView::Side, f32::NAN), cache.get(SpriteView::Side, 0.0)));
    }

    #[test]
    fn test_level_entry_is_unrotated_base() {
        let config = small_config();
        let cache = SpriteCache::build(&config);
        let base = render_base(SpriteView::Side, config.scale() * SPRITE_ZOOM);
        assert_eq!(cache.get(SpriteView::Side, 0.0), &base);
        assert_ne!(cache.get(SpriteView::Side, 5.0), &base);
    }
}
