#![no_std]

extern crate alloc;

pub use error::{Error, Result};
pub use smart_leds::RGB8;

/// Channels per LED on the wire: green, red, blue.
pub const BYTES_PER_LED: usize = 3;

pub mod channel_order;
pub mod driver;
pub mod engine;
mod error;
pub mod framebuffer;
pub mod timing;

pub use driver::StripDriver;
pub use engine::{CycleCounter, Watchdog};
pub use framebuffer::FrameBuffer;
pub use timing::PulseTiming;
