//! WS2812 pulse widths expressed in CPU cycles.
//!
//! High times sit at the short end of the datasheet windows (T0H 0.35us and
//! T1H 0.70us, both +- 0.15us). The datasheet allows a bit period down to
//! about 0.85us, but strips fed anything under 1.25us start to glitch after
//! a while, so the period is pinned there.

use fugit::HertzU32;

/// 0.30us (datasheet 0.35 +- 0.15)
const T0H_DIVISOR: u32 = 3333;
/// 0.60us (datasheet 0.70 +- 0.15)
const T1H_DIVISOR: u32 = 1666;
/// 1.25us, must not be shorter
const TTOT_DIVISOR: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    /// High time of a 0 bit.
    pub t0h: u32,
    /// High time of a 1 bit.
    pub t1h: u32,
    /// Full bit period, high plus low.
    pub ttot: u32,
}

impl PulseTiming {
    pub fn from_cpu_clock(cpu_clock: HertzU32) -> Self {
        let scaled = cpu_clock.to_MHz().saturating_mul(1000);
        Self {
            t0h: scaled / T0H_DIVISOR,
            t1h: scaled / T1H_DIVISOR,
            ttot: scaled / TTOT_DIVISOR,
        }
    }

    /// High time for a single bit.
    #[inline(always)]
    pub fn high_time(&self, bit: bool) -> u32 {
        if bit {
            self.t1h
        } else {
            self.t0h
        }
    }

    /// `t0h < t1h < ttot` with a non-zero short pulse. A clock this check
    /// rejects will not drive a strip correctly, but nothing stops it from
    /// trying.
    pub fn is_valid(&self) -> bool {
        self.t0h > 0 && self.t0h < self.t1h && self.t1h < self.ttot
    }
}
