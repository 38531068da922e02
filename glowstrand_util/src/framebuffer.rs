//! Persistent copy of everything the strip should show, stored in wire order.
//!
//! Every operation takes LED indices and clips against the current length:
//! writes that do not fit are cut short or dropped, never reported. Only
//! [`FrameBuffer::initialize`] changes the length.

use alloc::vec::Vec;

use smart_leds::RGB8;

use crate::channel_order::{rgb_to_wire, wire_to_rgb};
use crate::error::{Error, Result};
use crate::BYTES_PER_LED;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    // capacity == len at all times
    bytes: Vec<u8>,
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Replace the whole frame with wire-order `bytes`, dropping a trailing
    /// partial LED.
    ///
    /// A frame of a different length gets a fresh allocation sized exactly
    /// to fit. If that allocation fails the old frame is kept and
    /// [`Error::Alloc`] is returned.
    pub fn initialize(&mut self, bytes: &[u8]) -> Result<()> {
        let length = bytes.len() - bytes.len() % BYTES_PER_LED;
        let bytes = &bytes[..length];

        if length == self.bytes.len() {
            self.bytes.copy_from_slice(bytes);
            return Ok(());
        }

        let mut frame = Vec::new();
        frame
            .try_reserve_exact(length)
            .map_err(|source| Error::alloc(length, source))?;
        frame.extend_from_slice(bytes);
        self.bytes = frame;

        log::debug!("frame buffer resized to {} leds", self.led_count());
        Ok(())
    }

    pub fn overwrite_led(&mut self, index: usize, color: RGB8) {
        if let Some(led) = self.led_mut(index) {
            *led = rgb_to_wire(color);
        }
    }

    /// Copy wire-order `bytes` in starting at LED `start`. Only the part that
    /// fits before the end of the frame is written.
    pub fn overwrite_range(&mut self, start: usize, bytes: &[u8]) {
        if let Some(target) = self.range_mut(start, bytes.len()) {
            let fitting = target.len();
            target.copy_from_slice(&bytes[..fitting]);
        }
    }

    /// OR `color` into the LED at `index`.
    pub fn merge_led(&mut self, index: usize, color: RGB8) {
        if let Some(led) = self.led_mut(index) {
            for (channel, value) in led.iter_mut().zip(rgb_to_wire(color)) {
                *channel |= value;
            }
        }
    }

    /// OR wire-order `bytes` in starting at LED `start`, clipped like
    /// [`FrameBuffer::overwrite_range`].
    pub fn merge_range(&mut self, start: usize, bytes: &[u8]) {
        if let Some(target) = self.range_mut(start, bytes.len()) {
            for (channel, value) in target.iter_mut().zip(bytes) {
                *channel |= value;
            }
        }
    }

    /// Color of the LED at `index`, back in RGB order.
    pub fn read_led(&self, index: usize) -> Option<RGB8> {
        let offset = index.checked_mul(BYTES_PER_LED)?;
        let led = self.bytes.get(offset..offset.checked_add(BYTES_PER_LED)?)?;
        Some(wire_to_rgb([led[0], led[1], led[2]]))
    }

    /// Move every LED `leds` positions toward the end. LEDs pushed past the
    /// end are lost and the freed LEDs at the start turn off.
    pub fn shift_right(&mut self, leds: usize) {
        let length = self.bytes.len();
        let Some(offset) = self.shift_offset(leds) else {
            self.clear();
            return;
        };
        self.bytes.copy_within(..length - offset, offset);
        self.bytes[..offset].fill(0);
    }

    /// Move every LED `leds` positions toward the start. LEDs pushed past the
    /// start are lost and the freed LEDs at the end turn off.
    pub fn shift_left(&mut self, leds: usize) {
        let length = self.bytes.len();
        let Some(offset) = self.shift_offset(leds) else {
            self.clear();
            return;
        };
        self.bytes.copy_within(offset.., 0);
        self.bytes[length - offset..].fill(0);
    }

    /// Turn every LED off without changing the length.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn led_count(&self) -> usize {
        self.bytes.len() / BYTES_PER_LED
    }

    fn led_mut(&mut self, index: usize) -> Option<&mut [u8; BYTES_PER_LED]> {
        let offset = index.checked_mul(BYTES_PER_LED)?;
        let led = self.bytes.get_mut(offset..offset.checked_add(BYTES_PER_LED)?)?;
        led.try_into().ok()
    }

    /// Up to `len` bytes starting at LED `start`, clipped to the frame.
    fn range_mut(&mut self, start: usize, len: usize) -> Option<&mut [u8]> {
        let offset = start.checked_mul(BYTES_PER_LED)?;
        let available = self.bytes.len().checked_sub(offset)?;
        self.bytes.get_mut(offset..offset + len.min(available))
    }

    /// Byte offset for a shift, or `None` when the shift empties the frame.
    fn shift_offset(&self, leds: usize) -> Option<usize> {
        leds.checked_mul(BYTES_PER_LED)
            .filter(|&offset| offset < self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(bytes: &[u8]) -> FrameBuffer {
        let mut frame = FrameBuffer::new();
        frame.initialize(bytes).unwrap();
        frame
    }

    fn numbered(leds: u8) -> FrameBuffer {
        let bytes: Vec<u8> = (1..=leds * 3).collect();
        frame(&bytes)
    }

    #[test]
    fn initialize_truncates_partial_led() {
        let frame = frame(&[1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(frame.as_bytes(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(frame.led_count(), 2);
    }

    #[test]
    fn initialize_allocates_exactly() {
        let mut frame = numbered(4);
        assert_eq!(frame.bytes.capacity(), 12);

        frame.initialize(&[9; 30]).unwrap();
        assert_eq!(frame.bytes.capacity(), 30);

        frame.initialize(&[7; 3]).unwrap();
        assert_eq!(frame.bytes.capacity(), 3);
        assert_eq!(frame.as_bytes(), &[7, 7, 7]);
    }

    #[test]
    fn overwrite_then_read_round_trips_every_led() {
        let mut frame = frame(&[0; 15]);

        for index in 0..5u8 {
            let color = RGB8::new(index, 100 + index, 200 + index);
            frame.overwrite_led(usize::from(index), color);
            assert_eq!(frame.read_led(usize::from(index)), Some(color));
        }
    }

    #[test]
    fn overwrite_led_stores_wire_order() {
        let mut frame = frame(&[0; 6]);

        frame.overwrite_led(1, RGB8::new(255, 0, 128));

        assert_eq!(frame.as_bytes(), &[0, 0, 0, 0, 255, 128]);
    }

    #[test]
    fn out_of_bounds_led_is_ignored() {
        let mut frame = numbered(2);
        let before = frame.clone();

        frame.overwrite_led(2, RGB8::new(1, 1, 1));
        frame.merge_led(usize::MAX, RGB8::new(1, 1, 1));

        assert_eq!(frame, before);
        assert_eq!(frame.read_led(2), None);
        assert_eq!(frame.read_led(usize::MAX), None);
    }

    #[test]
    fn merge_led_ors_and_is_idempotent() {
        let mut frame = frame(&[0b0001, 0b0010, 0b0100]);
        let color = RGB8::new(0b1000, 0b1000, 0b1000);

        frame.merge_led(0, color);
        let once = frame.clone();
        frame.merge_led(0, color);

        assert_eq!(frame, once);
        assert_eq!(frame.as_bytes(), &[0b1001, 0b1010, 0b1100]);
    }

    #[test]
    fn overwrite_range_copies_fitting_prefix() {
        let mut frame = numbered(3);

        frame.overwrite_range(2, &[0xaa, 0xbb, 0xcc, 0xdd, 0xee]);

        assert_eq!(frame.as_bytes(), &[1, 2, 3, 4, 5, 6, 0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn overwrite_range_inside_leaves_the_rest() {
        let mut frame = numbered(3);

        frame.overwrite_range(1, &[0, 0]);

        assert_eq!(frame.as_bytes(), &[1, 2, 3, 0, 0, 6, 7, 8, 9]);
    }

    #[test]
    fn range_starting_past_the_end_is_ignored() {
        let mut frame = numbered(2);
        let before = frame.clone();

        frame.overwrite_range(2, &[0xff; 3]);
        frame.overwrite_range(7, &[0xff; 3]);
        frame.merge_range(usize::MAX, &[0xff; 3]);

        assert_eq!(frame, before);
    }

    #[test]
    fn merge_range_ors_fitting_prefix() {
        let mut frame = frame(&[0x01; 6]);

        frame.merge_range(1, &[0x10, 0x20, 0x40, 0x80]);

        assert_eq!(frame.as_bytes(), &[0x01, 0x01, 0x01, 0x11, 0x21, 0x41]);
    }

    #[test]
    fn shift_right_zero_fills_the_start() {
        let mut frame = numbered(4);

        frame.shift_right(1);

        assert_eq!(frame.as_bytes(), &[0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn shift_left_zero_fills_the_end() {
        let mut frame = numbered(4);

        frame.shift_left(3);

        assert_eq!(frame.as_bytes(), &[10, 11, 12, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn shift_right_then_left_restores_all_but_the_tail() {
        let original = numbered(5);

        for shift in 0..=6 {
            let mut frame = original.clone();
            frame.shift_right(shift);
            frame.shift_left(shift);

            let kept = 5usize.saturating_sub(shift) * BYTES_PER_LED;
            assert_eq!(&frame.as_bytes()[..kept], &original.as_bytes()[..kept]);
            assert!(frame.as_bytes()[kept..].iter().all(|&byte| byte == 0));
            assert_eq!(frame.len(), original.len());
        }
    }

    #[test]
    fn oversized_shift_clears() {
        let mut frame = numbered(2);

        frame.shift_left(usize::MAX);
        assert_eq!(frame.as_bytes(), &[0; 6]);

        let mut frame = numbered(2);
        frame.shift_right(2);
        assert_eq!(frame.as_bytes(), &[0; 6]);
    }

    #[test]
    fn operations_on_empty_frame_do_nothing() {
        let mut frame = FrameBuffer::new();

        frame.overwrite_led(0, RGB8::new(1, 2, 3));
        frame.merge_range(0, &[1, 2, 3]);
        frame.shift_right(1);
        frame.shift_left(0);

        assert!(frame.is_empty());
        assert_eq!(frame.read_led(0), None);
        assert!(frame.as_bytes().is_empty());
    }
}
