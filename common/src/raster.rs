//! 8-bit RGBA raster used for sprites, the backdrop and frame composition.
//!
//! [`Raster`] implements `DrawTarget<Color = Rgb888>`, so every
//! embedded-graphics primitive and text style draws into it directly. Drawn
//! pixels are fully opaque; transparency only comes from the surrounding
//! transparent canvas, from [`Raster::downsample`] (anti-aliased edges) and
//! from [`Raster::rotated`] (interpolated edges).
//!
//! # Alpha Handling
//!
//! Pixels store *straight* alpha. Filtering ([`downsample`](Raster::downsample),
//! [`rotated`](Raster::rotated)) is done on premultiplied values so transparent
//! black never bleeds into sprite edges, then converted back.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::math;

/// Maximum edge crossings per scanline in [`Raster::fill_polygon`].
const MAX_CROSSINGS: usize = 32;

// =============================================================================
// Pixel
// =============================================================================

/// One straight-alpha RGBA pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    #[inline]
    pub fn opaque(color: Rgb888) -> Self {
        Self {
            r: color.r(),
            g: color.g(),
            b: color.b(),
            a: u8::MAX,
        }
    }

    #[inline]
    pub const fn rgb(self) -> Rgb888 { Rgb888::new(self.r, self.g, self.b) }
}

#[inline]
fn blend_channel(
    dst: u8,
    src: u8,
    alpha: u8,
) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}

/// Catmull-Rom cubic kernel (a = -0.5).
#[inline]
fn cubic_weight(t: f32) -> f32 {
    let t = math::abs(t);
    if t <= 1.0 {
        (1.5 * t - 2.5) * t * t + 1.0
    } else if t < 2.0 {
        ((-0.5 * t + 2.5) * t - 4.0) * t + 2.0
    } else {
        0.0
    }
}

// =============================================================================
// Raster
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// Fully transparent raster.
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; (width * height) as usize],
        }
    }

    /// Opaque raster filled with one color.
    pub fn filled(
        width: u32,
        height: u32,
        color: Rgb888,
    ) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::opaque(color); (width * height) as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// Pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] { &self.pixels }

    #[inline]
    fn index(
        &self,
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel; out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        value: Rgba,
    ) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = value;
        }
    }

    /// Fill a polygon using the even-odd rule, sampling at pixel centers.
    ///
    /// Coordinates are in pixels and may be fractional. Used for vehicle
    /// bodies and windows, which embedded-graphics has no primitive for.
    pub fn fill_polygon(
        &mut self,
        points: &[(f32, f32)],
        color: Rgb888,
    ) {
        if points.len() < 3 {
            return;
        }
        let value = Rgba::opaque(color);

        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for &(_, y) in points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        let first_row = (math::floor(min_y) as i32).max(0);
        let last_row = (math::ceil(max_y) as i32).min(self.height as i32 - 1);

        for row in first_row..=last_row {
            let sample_y = row as f32 + 0.5;
            let mut crossings: heapless::Vec<f32, MAX_CROSSINGS> = heapless::Vec::new();

            for (i, &(x0, y0)) in points.iter().enumerate() {
                let (x1, y1) = points[(i + 1) % points.len()];
                let spans_row = (y0 <= sample_y && sample_y < y1) || (y1 <= sample_y && sample_y < y0);
                if spans_row {
                    let x = x0 + (sample_y - y0) * (x1 - x0) / (y1 - y0);
                    // Shapes here have a handful of vertices, overflow would be a bug in the caller
                    crossings.push(x).ok();
                }
            }
            crossings.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

            for span in crossings.chunks_exact(2) {
                let start = (math::ceil(span[0] - 0.5) as i32).max(0);
                let end = (math::ceil(span[1] - 0.5) as i32).min(self.width as i32);
                for x in start..end {
                    self.set_pixel(x, row, value);
                }
            }
        }
    }

    /// Box-filter down by an integer factor (anti-aliasing for supersampled
    /// drawing). Partial blocks at the right/bottom edge are dropped.
    pub fn downsample(
        &self,
        factor: u32,
    ) -> Self {
        let factor = factor.max(1);
        let width = self.width / factor;
        let height = self.height / factor;
        let samples = factor * factor;
        let mut out = Self::new(width, height);

        for oy in 0..height {
            for ox in 0..width {
                let (mut r, mut g, mut b, mut a) = (0u32, 0u32, 0u32, 0u32);
                for sy in 0..factor {
                    for sx in 0..factor {
                        let px = self.pixels[((oy * factor + sy) * self.width + ox * factor + sx) as usize];
                        let pa = u32::from(px.a);
                        r += u32::from(px.r) * pa;
                        g += u32::from(px.g) * pa;
                        b += u32::from(px.b) * pa;
                        a += pa;
                    }
                }
                if a == 0 {
                    continue;
                }
                out.pixels[(oy * width + ox) as usize] = Rgba {
                    r: ((r + a / 2) / a) as u8,
                    g: ((g + a / 2) / a) as u8,
                    b: ((b + a / 2) / a) as u8,
                    a: ((a + samples / 2) / samples) as u8,
                };
            }
        }
        out
    }

    /// Rotate about the raster center using bicubic (Catmull-Rom)
    /// interpolation. Positive angles rotate counter-clockwise on screen.
    ///
    /// The output has the same size; content rotated past the edges is lost,
    /// so sprites carry enough transparent margin for their full range.
    pub fn rotated(
        &self,
        degrees: f32,
    ) -> Self {
        if degrees == 0.0 {
            return self.clone();
        }

        let (sin, cos) = math::sin_cos_deg(degrees);
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;
        let mut out = Self::new(self.width, self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                // Inverse mapping: rotate the destination pixel center clockwise
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let sx = dx * cos - dy * sin + cx - 0.5;
                let sy = dx * sin + dy * cos + cy - 0.5;
                out.pixels[(y * self.width + x) as usize] = self.sample_bicubic(sx, sy);
            }
        }
        out
    }

    /// Sample at fractional pixel-index coordinates. Outside is transparent.
    fn sample_bicubic(
        &self,
        sx: f32,
        sy: f32,
    ) -> Rgba {
        if sx < -2.0 || sy < -2.0 || sx > self.width as f32 + 1.0 || sy > self.height as f32 + 1.0 {
            return Rgba::TRANSPARENT;
        }

        let x0 = math::floor(sx);
        let y0 = math::floor(sy);
        let fx = sx - x0;
        let fy = sy - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let wx = [cubic_weight(1.0 + fx), cubic_weight(fx), cubic_weight(1.0 - fx), cubic_weight(2.0 - fx)];
        let wy = [cubic_weight(1.0 + fy), cubic_weight(fy), cubic_weight(1.0 - fy), cubic_weight(2.0 - fy)];

        let (mut r, mut g, mut b, mut a) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for (j, weight_y) in wy.iter().enumerate() {
            for (i, weight_x) in wx.iter().enumerate() {
                let Some(px) = self.pixel(x0 - 1 + i as i32, y0 - 1 + j as i32) else {
                    continue;
                };
                if px.a == 0 {
                    continue;
                }
                let w = weight_x * weight_y;
                let pa = f32::from(px.a);
                r += w * f32::from(px.r) * pa;
                g += w * f32::from(px.g) * pa;
                b += w * f32::from(px.b) * pa;
                a += w * pa;
            }
        }

        // Catmull-Rom overshoots, clamp before converting back to straight alpha
        let alpha = a.clamp(0.0, 255.0);
        if alpha < 0.5 {
            return Rgba::TRANSPARENT;
        }
        Rgba {
            r: math::to_u8(r / alpha),
            g: math::to_u8(g / alpha),
            b: math::to_u8(b / alpha),
            a: math::to_u8(alpha),
        }
    }

    /// Composite `src` over this raster with its top-left corner at
    /// `top_left` (Porter-Duff "over", straight alpha). Clipped to bounds.
    pub fn blit(
        &mut self,
        src: &Self,
        top_left: Point,
    ) {
        for sy in 0..src.height as i32 {
            for sx in 0..src.width as i32 {
                let s = src.pixels[(sy as u32 * src.width + sx as u32) as usize];
                if s.a == 0 {
                    continue;
                }
                let Some(i) = self.index(top_left.x + sx, top_left.y + sy) else {
                    continue;
                };
                let d = self.pixels[i];
                self.pixels[i] = if s.a == u8::MAX || d.a == 0 {
                    s
                } else if d.a == u8::MAX {
                    Rgba {
                        r: blend_channel(d.r, s.r, s.a),
                        g: blend_channel(d.g, s.g, s.a),
                        b: blend_channel(d.b, s.b, s.a),
                        a: u8::MAX,
                    }
                } else {
                    over_translucent(s, d)
                };
            }
        }
    }

    /// Blend a uniform color over every pixel. `alpha` is clamped to [0, 1];
    /// pixel alpha is left unchanged.
    pub fn tint(
        &mut self,
        color: Rgb888,
        alpha: f32,
    ) {
        let alpha = math::to_u8(alpha * 255.0);
        if alpha == 0 {
            return;
        }
        let (r, g, b) = (color.r(), color.g(), color.b());
        for px in &mut self.pixels {
            px.r = blend_channel(px.r, r, alpha);
            px.g = blend_channel(px.g, g, alpha);
            px.b = blend_channel(px.b, b, alpha);
        }
    }
}

/// General "over" for a translucent destination.
fn over_translucent(
    s: Rgba,
    d: Rgba,
) -> Rgba {
    let sa = u32::from(s.a);
    let da = u32::from(d.a) * (255 - sa) / 255;
    let out_a = sa + da;
    let channel = |sc: u8, dc: u8| ((u32::from(sc) * sa + u32::from(dc) * da + out_a / 2) / out_a) as u8;
    Rgba {
        r: channel(s.r, d.r),
        g: channel(s.g, d.g),
        b: channel(s.b, d.b),
        a: out_a as u8,
    }
}

// =============================================================================
// DrawTarget
// =============================================================================

impl OriginDimensions for Raster {
    fn size(&self) -> Size { Size::new(self.width, self.height) }
}

impl DrawTarget for Raster {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, Rgba::opaque(color));
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let value = Rgba::opaque(color);
        for y in area.rows() {
            let row_start = y as usize * self.width as usize;
            for x in area.columns() {
                self.pixels[row_start + x as usize] = value;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    use super::*;

    fn alpha_centroid(raster: &Raster) -> (f32, f32) {
        let (mut sx, mut sy, mut total) = (0.0, 0.0, 0.0);
        for y in 0..raster.height() as i32 {
            for x in 0..raster.width() as i32 {
                let a = f32::from(raster.pixel(x, y).unwrap().a);
                sx += a * x as f32;
                sy += a * y as f32;
                total += a;
            }
        }
        (sx / total, sy / total)
    }

    #[test]
    fn test_new_is_transparent() {
        let raster = Raster::new(4, 3);
        assert_eq!(raster.pixels().len(), 12);
        assert!(raster.pixels().iter().all(|p| p.a == 0));
    }

    #[test]
    fn test_draw_target_clips() {
        let mut raster = Raster::new(10, 10);
        Rectangle::new(Point::new(-5, -5), Size::new(8, 8))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
            .draw(&mut raster)
            .ok();
        assert_eq!(raster.pixel(0, 0), Some(Rgba::opaque(Rgb888::RED)));
        assert_eq!(raster.pixel(2, 2), Some(Rgba::opaque(Rgb888::RED)));
        assert_eq!(raster.pixel(3, 3), Some(Rgba::TRANSPARENT));
        assert_eq!(raster.pixel(10, 0), None);
    }

    #[test]
    fn test_fill_polygon_square() {
        let mut raster = Raster::new(10, 10);
        raster.fill_polygon(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], Rgb888::GREEN);
        let filled = raster.pixels().iter().filter(|p| p.a == 255).count();
        assert_eq!(filled, 16);
        assert_eq!(raster.pixel(2, 2).unwrap().a, 255);
        assert_eq!(raster.pixel(5, 5).unwrap().a, 255);
        assert_eq!(raster.pixel(6, 6).unwrap().a, 0);
    }

    #[test]
    fn test_fill_polygon_triangle_is_inside_bounds() {
        let mut raster = Raster::new(20, 20);
        raster.fill_polygon(&[(10.0, 0.0), (20.0, 20.0), (0.0, 20.0)], Rgb888::BLUE);
        assert_eq!(raster.pixel(10, 18).unwrap().a, 255);
        assert_eq!(raster.pixel(1, 1).unwrap().a, 0);
        assert_eq!(raster.pixel(18, 1).unwrap().a, 0);
    }

    #[test]
    fn test_downsample_produces_partial_alpha_edges() {
        let mut raster = Raster::new(8, 8);
        // Covers half of the right 4x4 block
        raster.fill_solid(&Rectangle::new(Point::new(0, 0), Size::new(6, 8)), Rgb888::WHITE).ok();
        let small = raster.downsample(4);
        assert_eq!(small.width(), 2);
        assert_eq!(small.pixel(0, 0).unwrap(), Rgba::opaque(Rgb888::WHITE));
        let edge = small.pixel(1, 0).unwrap();
        assert_eq!(edge.a, 128);
        // Premultiplied averaging keeps the color, only alpha drops
        assert_eq!((edge.r, edge.g, edge.b), (255, 255, 255));
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let mut raster = Raster::new(9, 9);
        raster.fill_solid(&Rectangle::new(Point::new(6, 4), Size::new(2, 1)), Rgb888::RED).ok();
        assert_eq!(raster.rotated(0.0), raster);
    }

    #[test]
    fn test_rotate_positive_is_counter_clockwise() {
        let mut raster = Raster::new(21, 21);
        // Blob right of center
        raster.fill_solid(&Rectangle::new(Point::new(15, 9), Size::new(3, 3)), Rgb888::WHITE).ok();
        let rotated = raster.rotated(90.0);
        let (x, y) = alpha_centroid(&rotated);
        // Counter-clockwise on screen moves "right of center" to "above center"
        assert!((x - 10.0).abs() < 1.0, "x = {x}");
        assert!(y < 6.0, "y = {y}");
    }

    #[test]
    fn test_rotate_preserves_opaque_interior_color() {
        let mut raster = Raster::new(32, 32);
        raster.fill_solid(&Rectangle::new(Point::new(8, 8), Size::new(16, 16)), Rgb888::new(200, 100, 50)).ok();
        let rotated = raster.rotated(30.0);
        let center = rotated.pixel(16, 16).unwrap();
        assert_eq!(center.a, 255);
        assert_eq!((center.r, center.g, center.b), (200, 100, 50));
    }

    #[test]
    fn test_blit_blends_translucent_pixels() {
        let mut dst = Raster::filled(4, 4, Rgb888::BLACK);
        let mut src = Raster::new(2, 2);
        src.set_pixel(0, 0, Rgba::opaque(Rgb888::WHITE));
        src.set_pixel(1, 0, Rgba { r: 255, g: 255, b: 255, a: 128 });
        dst.blit(&src, Point::new(1, 1));

        assert_eq!(dst.pixel(1, 1), Some(Rgba::opaque(Rgb888::WHITE)));
        assert_eq!(dst.pixel(2, 1), Some(Rgba { r: 128, g: 128, b: 128, a: 255 }));
        // Transparent source pixels leave the destination alone
        assert_eq!(dst.pixel(1, 2), Some(Rgba::opaque(Rgb888::BLACK)));
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut dst = Raster::filled(4, 4, Rgb888::BLACK);
        let src = Raster::filled(3, 3, Rgb888::WHITE);
        dst.blit(&src, Point::new(-1, 2));
        assert_eq!(dst.pixel(0, 2), Some(Rgba::opaque(Rgb888::WHITE)));
        assert_eq!(dst.pixel(1, 3), Some(Rgba::opaque(Rgb888::WHITE)));
        assert_eq!(dst.pixel(2, 2), Some(Rgba::opaque(Rgb888::BLACK)));
    }

    #[test]
    fn test_tint() {
        let mut raster = Raster::filled(2, 2, Rgb888::BLACK);
        raster.tint(Rgb888::RED, 0.0);
        assert_eq!(raster.pixel(0, 0), Some(Rgba::opaque(Rgb888::BLACK)));

        raster.tint(Rgb888::RED, 0.5);
        assert_eq!(raster.pixel(0, 0), Some(Rgba { r: 128, g: 0, b: 0, a: 255 }));

        raster.tint(Rgb888::RED, 2.0);
        assert_eq!(raster.pixel(1, 1), Some(Rgba::opaque(Rgb888::RED)));
    }
}
