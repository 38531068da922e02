use esp_hal::{
    clock::ClockControl,
    delay::Delay,
    gpio::{GpioPin, Io, Level, Output},
    peripherals::{Peripherals, TIMG0},
    prelude::*,
    system::SystemControl,
    timer::timg::{TimerGroup, Wdt},
    xtensa_lx,
};
use fugit::{HertzU32, MicrosDurationU64};
use glowstrand_util::{CycleCounter, StripDriver, Watchdog};

use crate::config;

pub type Strip = StripDriver<Output<'static, GpioPin<4>>, CpuCycles, TimerWatchdog>;

/// The Xtensa `CCOUNT` register, ticking once per CPU cycle.
pub struct CpuCycles {
    cpu_clock: HertzU32,
}

impl CycleCounter for CpuCycles {
    #[inline(always)]
    fn cycles(&self) -> u32 {
        xtensa_lx::timer::get_cycle_count()
    }

    fn frequency(&self) -> HertzU32 {
        self.cpu_clock
    }
}

pub struct TimerWatchdog {
    wdt: Wdt<TIMG0, esp_hal::Blocking>,
}

impl Watchdog for TimerWatchdog {
    #[inline(always)]
    fn feed(&mut self) {
        self.wdt.feed();
    }
}

pub fn init() -> (Strip, Delay) {
    let peripherals = Peripherals::take();
    let system = SystemControl::new(peripherals.SYSTEM);
    let clocks = ClockControl::max(system.clock_control).freeze();

    let io = Io::new(peripherals.GPIO, peripherals.IO_MUX);
    // Idle low so the first rising edge is the first bit.
    let data = Output::new(io.pins.gpio4, Level::Low);

    let timg0 = TimerGroup::new(peripherals.TIMG0, &clocks);
    let mut wdt = timg0.wdt;
    wdt.set_timeout(MicrosDurationU64::millis(config::STRIP.watchdog_timeout_ms));
    wdt.enable();

    log::info!(
        "cpu at {} MHz, driving {} leds on gpio4",
        clocks.cpu_clock.to_MHz(),
        config::STRIP.led_count
    );

    let cycles = CpuCycles {
        cpu_clock: clocks.cpu_clock,
    };
    let strip = StripDriver::new(data, cycles, TimerWatchdog { wdt });

    (strip, Delay::new(&clocks))
}
