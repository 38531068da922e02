//! Conversion from caller-facing RGB to the GRB order WS2812 expects on the
//! wire.

use smart_leds::RGB8;

use crate::BYTES_PER_LED;

/// Reorder RGB triples to GRB by swapping the first two bytes of each one.
///
/// **This rewrites the caller's buffer.** After the call `bytes` holds wire
/// order and stays that way:
///
/// ```
/// let mut colors = [255, 0, 128];
/// glowstrand_util::channel_order::to_wire_order_in_place(&mut colors);
/// assert_eq!(colors, [0, 255, 128]);
/// ```
///
/// A trailing partial triple is left alone. Use [`as_wire_order`] for data
/// that is already GRB and must not be touched.
pub fn to_wire_order_in_place(bytes: &mut [u8]) {
    for led in bytes.chunks_exact_mut(BYTES_PER_LED) {
        led.swap(0, 1);
    }
}

/// Data that is already GRB, passed through without changes.
#[inline(always)]
pub fn as_wire_order(bytes: &[u8]) -> &[u8] {
    bytes
}

#[inline(always)]
pub fn rgb_to_wire(color: RGB8) -> [u8; BYTES_PER_LED] {
    [color.g, color.r, color.b]
}

#[inline(always)]
pub fn wire_to_rgb([g, r, b]: [u8; BYTES_PER_LED]) -> RGB8 {
    RGB8::new(r, g, b)
}
