//! Pre-computed static text styles to avoid per-frame object construction.
//!
//! `MonoTextStyle` and `TextStyle` are `const` here so they live in read-only
//! data and are never rebuilt in the render loop. Styles whose color changes
//! at runtime (readouts during a warning, the critical flash) expose their
//! font instead, so callers only vary the color.
//!
//! # Fonts
//!
//! Readouts need the degree sign, which the ASCII fonts lack, so they use
//! the ISO 8859-1 variants. The critical screen uses `ProFont` 24pt, which
//! only has to render capitals and a slash.

use embedded_graphics::mono_font::iso_8859_1::{FONT_6X10, FONT_7X13, FONT_9X15_BOLD, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_24_POINT;

use crate::colors::{ACCENT, TEXT_DIM, TEXT_LABEL};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered on the bounding box both ways: the anchor point is the middle of
/// the text. Used for every piece of text on the dial.
pub const CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Font References (for dynamic color styles)
// =============================================================================

/// Roll/pitch readouts ("-12°").
pub const READOUT_FONT: &MonoFont = &FONT_10X20;

/// "CRITICAL" and the offending axis name.
pub const ALARM_FONT: &MonoFont = &PROFONT_24_POINT;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// Axis labels under the readouts.
pub const AXIS_LABEL_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_7X13, TEXT_LABEL);

/// Scale numerals on the backdrop.
pub const NUMERAL_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_6X10, TEXT_DIM);

/// "CALIBRATING..." status banner.
pub const BANNER_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_9X15_BOLD, ACCENT);
