//! Finished frames in the panel's native pixel format.
//!
//! Round SPI panels (GC9A01, ST7789) take RGB565 with the high byte first.
//! A [`Frame`] holds exactly that, so a sink can stream
//! [`Frame::as_bytes`] straight to the controller without another pass.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;

use crate::error::SinkFault;
use crate::raster::Raster;

/// Bytes per RGB565 pixel.
pub const BYTES_PER_PIXEL: usize = 2;

#[inline]
fn pack(color: Rgb888) -> [u8; BYTES_PER_PIXEL] {
    let raw: RawU16 = Rgb565::from(color).into();
    raw.into_inner().to_be_bytes()
}

/// One complete frame, RGB565 big-endian, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl Frame {
    /// Pack a composed raster. Alpha is ignored; the composer only ever
    /// hands over opaque rasters.
    pub fn from_raster(raster: &Raster) -> Self {
        let mut bytes = Vec::with_capacity(raster.pixels().len() * BYTES_PER_PIXEL);
        for px in raster.pixels() {
            bytes.extend_from_slice(&pack(px.rgb()));
        }
        Self {
            width: raster.width(),
            height: raster.height(),
            bytes,
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    #[inline]
    pub const fn size(&self) -> Size { Size::new(self.width, self.height) }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] { &self.bytes }

    /// Decode a single pixel.
    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) as usize * BYTES_PER_PIXEL;
        Some(Rgb565::from(RawU16::new(u16::from_be_bytes([self.bytes[i], self.bytes[i + 1]]))))
    }

    /// Decoded pixels in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.bytes
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|pair| Rgb565::from(RawU16::new(u16::from_be_bytes([pair[0], pair[1]]))))
    }

    /// Check this frame fits a display of `expected` size.
    pub fn check_fits(
        &self,
        expected: Size,
    ) -> Result<(), SinkFault> {
        if self.size() != expected {
            return Err(SinkFault::SizeMismatch {
                expected_width: expected.width,
                expected_height: expected.height,
                actual_width: self.width,
                actual_height: self.height,
            });
        }
        let expected_len = (expected.width * expected.height) as usize * BYTES_PER_PIXEL;
        if self.bytes.len() != expected_len {
            return Err(SinkFault::BufferLength {
                expected: expected_len,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }
}

/// Where finished frames go: a panel driver, a simulator window, a test
/// recorder. The size is fixed when the sink is created.
pub trait DisplaySink {
    fn size(&self) -> Size;

    /// Present one whole frame. A frame that doesn't match [`size`] is
    /// rejected with [`SinkFault::SizeMismatch`].
    ///
    /// [`size`]: DisplaySink::size
    fn show(
        &mut self,
        frame: &Frame,
    ) -> Result<(), SinkFault>;
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::RgbColor;

    use super::*;
    use crate::raster::Rgba;

    #[test]
    fn test_pack_is_big_endian_rgb565() {
        assert_eq!(pack(Rgb888::RED), [0xF8, 0x00]);
        assert_eq!(pack(Rgb888::GREEN), [0x07, 0xE0]);
        assert_eq!(pack(Rgb888::BLUE), [0x00, 0x1F]);
        assert_eq!(pack(Rgb888::WHITE), [0xFF, 0xFF]);
    }

    #[test]
    fn test_from_raster_layout() {
        let mut raster = Raster::filled(3, 2, Rgb888::BLACK);
        raster.set_pixel(2, 1, Rgba::opaque(Rgb888::RED));
        let frame = Frame::from_raster(&raster);

        assert_eq!(frame.as_bytes().len(), 3 * 2 * BYTES_PER_PIXEL);
        assert_eq!(frame.pixel(0, 0), Some(Rgb565::BLACK));
        assert_eq!(frame.pixel(2, 1), Some(Rgb565::RED));
        assert_eq!(frame.pixel(3, 0), None);
        assert_eq!(frame.colors().filter(|c| *c == Rgb565::RED).count(), 1);
    }

    #[test]
    fn test_check_fits() {
        let frame = Frame::from_raster(&Raster::filled(4, 4, Rgb888::BLACK));
        assert_eq!(frame.check_fits(Size::new(4, 4)), Ok(()));
        assert_eq!(
            frame.check_fits(Size::new(5, 4)),
            Err(SinkFault::SizeMismatch {
                expected_width: 5,
                expected_height: 4,
                actual_width: 4,
                actual_height: 4,
            })
        );
    }
}
