use embedded_hal::digital::OutputPin;

use crate::channel_order::{as_wire_order, to_wire_order_in_place};
use crate::engine::{self, CycleCounter, Watchdog};
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::timing::PulseTiming;
use crate::BYTES_PER_LED;

/// One WS2812 strip on one pin, plus the frame it is showing.
///
/// Direct writes go straight to the strip and are mirrored into the frame
/// buffer, so later edits through [`StripDriver::frame_mut`] start from what
/// is lit. [`StripDriver::flush`] sends the frame buffer.
pub struct StripDriver<P, C, W> {
    pin: P,
    clock: C,
    watchdog: W,
    frame: FrameBuffer,
}

impl<P, C, W> StripDriver<P, C, W>
where
    P: OutputPin,
    C: CycleCounter,
    W: Watchdog,
{
    /// `pin` must already be configured as an output.
    pub fn new(pin: P, clock: C, watchdog: W) -> Self {
        Self {
            pin,
            clock,
            watchdog,
            frame: FrameBuffer::new(),
        }
    }

    /// Send RGB triples, reordering them to GRB **in the caller's buffer**.
    ///
    /// `rgb` is left in wire order afterwards:
    ///
    /// ```text
    /// let mut colors = [255, 0, 128];
    /// strip.write_rgb(&mut colors)?;
    /// // colors == [0, 255, 128]
    /// ```
    ///
    /// A trailing partial triple is neither reordered nor sent. Use
    /// [`StripDriver::write_grb`] to keep the input intact.
    pub fn write_rgb(&mut self, rgb: &mut [u8]) -> Result<()> {
        to_wire_order_in_place(rgb);
        let whole_leds = &rgb[..rgb.len() - rgb.len() % BYTES_PER_LED];
        self.frame.initialize(whole_leds)?;
        self.send(whole_leds);
        Ok(())
    }

    /// Send bytes that are already GRB. The input is not modified.
    pub fn write_grb(&mut self, grb: &[u8]) -> Result<()> {
        let grb = as_wire_order(grb);
        self.frame.initialize(grb)?;
        self.send(grb);
        Ok(())
    }

    /// Send the frame buffer as it is now.
    pub fn flush(&mut self) {
        let Self {
            pin,
            clock,
            watchdog,
            frame,
        } = self;
        Self::prepare(pin, clock);
        engine::transmit(pin, clock, watchdog, frame.as_bytes());
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// Give back the hardware. The frame buffer is dropped.
    pub fn release(self) -> (P, C, W) {
        (self.pin, self.clock, self.watchdog)
    }

    fn send(&mut self, bytes: &[u8]) {
        Self::prepare(&mut self.pin, &self.clock);
        engine::transmit(&mut self.pin, &self.clock, &mut self.watchdog, bytes);
    }

    fn prepare(pin: &mut P, clock: &C) {
        let timing = PulseTiming::from_cpu_clock(clock.frequency());
        if !timing.is_valid() {
            log::warn!(
                "{} MHz cpu clock is too slow for ws2812 timing: {:?}",
                clock.frequency().to_MHz(),
                timing
            );
        }
        pin.set_low().ok();
    }
}
