//! Full-screen and banner overlays.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::alert::{AxisSet, FlashPhase};
use crate::colors::{ACCENT, BLACK};
use crate::config::GaugeConfig;
use crate::styles::{ALARM_FONT, BANNER_STYLE, CENTERED};

/// Vertical distance between the two alarm lines, in design units.
const ALARM_LINE_SPACING: f32 = 60.0;

const BANNER_WIDTH: f32 = 260.0;
const BANNER_HEIGHT: f32 = 44.0;

const BANNER_BORDER: PrimitiveStyle<Rgb888> = PrimitiveStyle::with_stroke(ACCENT, 2);
const BANNER_FILL: PrimitiveStyle<Rgb888> = PrimitiveStyle::with_fill(BLACK);

/// Replace the whole frame with the critical alarm: solid flash color,
/// "CRITICAL" above the offending axis name(s).
pub fn draw_critical_screen<D>(
    display: &mut D,
    config: &GaugeConfig,
    axes: AxisSet,
    phase: FlashPhase,
) where
    D: DrawTarget<Color = Rgb888>,
{
    display.clear(phase.background()).ok();

    let style = MonoTextStyle::new(ALARM_FONT, phase.text());
    let half = ALARM_LINE_SPACING / 2.0;
    Text::with_text_style("CRITICAL", config.design_point(0.0, -half), style, CENTERED)
        .draw(display)
        .ok();
    Text::with_text_style(axes.label(), config.design_point(0.0, half), style, CENTERED)
        .draw(display)
        .ok();
}

/// "CALIBRATING..." box in the middle of the dial.
pub fn draw_calibration_banner<D>(
    display: &mut D,
    config: &GaugeConfig,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let scale = config.scale();
    let size = Size::new(
        crate::math::round(BANNER_WIDTH * scale) as u32,
        crate::math::round(BANNER_HEIGHT * scale) as u32,
    );
    let banner = Rectangle::with_center(config.center(), size);

    banner.into_styled(BANNER_FILL).draw(display).ok();
    banner.into_styled(BANNER_BORDER).draw(display).ok();

    Text::with_text_style("CALIBRATING...", config.center(), BANNER_STYLE, CENTERED)
        .draw(display)
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{RED, WHITE};
    use crate::raster::{Raster, Rgba};

    #[test]
    fn test_critical_screen_is_full_frame() {
        let config = GaugeConfig::DEFAULT;
        let mut raster = Raster::new(config.size, config.size);
        draw_critical_screen(&mut raster, &config, AxisSet { roll: true, pitch: false }, FlashPhase::Lit);

        let red = raster.pixels().iter().filter(|p| **p == Rgba::opaque(RED)).count();
        let white = raster.pixels().iter().filter(|p| **p == Rgba::opaque(WHITE)).count();
        assert_eq!(red + white, raster.pixels().len(), "only flash colors on screen");
        assert!(white > 0, "text is drawn");
        // Corners are background
        assert_eq!(raster.pixel(0, 0), Some(Rgba::opaque(RED)));
        assert_eq!(raster.pixel(239, 239), Some(Rgba::opaque(RED)));
    }

    #[test]
    fn test_calibration_banner_centered() {
        let config = GaugeConfig::DEFAULT;
        let mut raster = Raster::filled(config.size, config.size, WHITE);
        draw_calibration_banner(&mut raster, &config);
        // Corners untouched, banner border drawn left of the text
        assert_eq!(raster.pixel(0, 0), Some(Rgba::opaque(WHITE)));
        let has_accent = raster.pixels().iter().any(|p| *p == Rgba::opaque(ACCENT));
        assert!(has_accent);
    }
}
