//! Bit-banged WS2812 transmission.
//!
//! Each bit is a high pulse of `t0h` or `t1h` cycles followed by a low phase
//! that completes a `ttot` cycle period. Timing is measured against a free
//! running cycle counter rather than counted loops, so the same code works
//! at any CPU clock.

use embedded_hal::digital::OutputPin;
use fugit::HertzU32;

use crate::timing::PulseTiming;

/// Low phases that run past this many cycles feed the watchdog once.
///
/// A feed can cost several register writes, so it only ever happens while
/// the line is low, where it stretches the bit period and never a high pulse.
/// WS2812 only latches after ~50us low, far beyond one feed.
pub const WATCHDOG_FEED_THRESHOLD: u32 = 10;

/// Free running CPU cycle counter. Reads must be cheap and may wrap.
pub trait CycleCounter {
    fn cycles(&self) -> u32;

    /// Rate at which `cycles` advances.
    fn frequency(&self) -> HertzU32;
}

pub trait Watchdog {
    fn feed(&mut self);
}

/// Send `bytes` MSB first on `pin`, blocking until the last bit is out.
///
/// Runs inside a critical section: an interrupt during a pulse stretches it
/// and the strip latches garbage. Long strips would starve the watchdog, so
/// it is fed during each low phase and once on each side of the transmission.
pub fn transmit<P, C, W>(pin: &mut P, clock: &C, watchdog: &mut W, bytes: &[u8])
where
    P: OutputPin,
    C: CycleCounter,
    W: Watchdog,
{
    let timing = PulseTiming::from_cpu_clock(clock.frequency());

    watchdog.feed();
    critical_section::with(|_| send_bits(pin, clock, watchdog, &timing, bytes));
    watchdog.feed();
}

fn send_bits<P, C, W>(pin: &mut P, clock: &C, watchdog: &mut W, timing: &PulseTiming, bytes: &[u8])
where
    P: OutputPin,
    C: CycleCounter,
    W: Watchdog,
{
    // Pretend a full period has already passed so the first bit goes out at once.
    let mut start_time = clock.cycles().wrapping_sub(timing.ttot);

    for &byte in bytes {
        let mut mask: u8 = 0x80;
        while mask != 0 {
            let high_time = timing.high_time(byte & mask != 0);

            // Low phase of the previous bit.
            let now = wait_low(clock, watchdog, start_time, timing.ttot);
            pin.set_high().ok();
            start_time = now;

            wait_high(clock, start_time, high_time);
            pin.set_low().ok();

            mask >>= 1;
        }
    }
}

/// Spin until `cycles` have passed since `since`, returning the counter
/// value that ended the wait. Feeds the watchdog at most once.
#[inline(always)]
fn wait_low<C, W>(clock: &C, watchdog: &mut W, since: u32, cycles: u32) -> u32
where
    C: CycleCounter,
    W: Watchdog,
{
    let mut fed = false;
    loop {
        let now = clock.cycles();
        let elapsed = now.wrapping_sub(since);
        if elapsed >= cycles {
            return now;
        }
        if !fed && elapsed > WATCHDOG_FEED_THRESHOLD {
            watchdog.feed();
            fed = true;
        }
    }
}

#[inline(always)]
fn wait_high<C: CycleCounter>(clock: &C, since: u32, cycles: u32) {
    while clock.cycles().wrapping_sub(since) < cycles {}
}
