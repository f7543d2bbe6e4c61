//! Simulator window as the gauge's display sink.
//!
//! Frames arrive already packed as RGB565, so presenting one is a single
//! `fill_contiguous` into the [`SimulatorDisplay`] followed by a window
//! update. No drawing happens here.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use inclinometer_common::{DisplaySink, Frame, SinkFault};

pub struct SimulatorSink {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl SimulatorSink {
    pub fn new(
        side: u32,
        scale: u32,
        title: &str,
    ) -> Self {
        let output_settings = OutputSettingsBuilder::new().scale(scale).build();
        Self {
            display: SimulatorDisplay::new(Size::new(side, side)),
            window: Window::new(title, &output_settings),
        }
    }

    /// Pending window events. Only valid after the first [`show`](DisplaySink::show).
    pub fn events(&mut self) -> impl Iterator<Item = SimulatorEvent> + '_ { self.window.events() }
}

impl DisplaySink for SimulatorSink {
    fn size(&self) -> Size { self.display.size() }

    fn show(
        &mut self,
        frame: &Frame,
    ) -> Result<(), SinkFault> {
        copy_frame(&mut self.display, frame)?;
        self.window.update(&self.display);
        Ok(())
    }
}

/// Copy `frame` into `display`, rejecting mismatched sizes.
fn copy_frame<D>(
    display: &mut D,
    frame: &Frame,
) -> Result<(), SinkFault>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    frame.check_fits(display.size())?;
    display
        .fill_contiguous(&Rectangle::new(Point::zero(), frame.size()), frame.colors())
        .map_err(|_| SinkFault::Disconnected)
}
