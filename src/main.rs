#![no_std]
#![no_main]

extern crate alloc;

use core::{mem::MaybeUninit, ptr::addr_of_mut};

use esp_backtrace as _;
use esp_hal::entry;
use glowstrand_util::RGB8;

mod config;
mod driver;

#[global_allocator]
static ALLOCATOR: esp_alloc::EspHeap = esp_alloc::EspHeap::empty();

fn init_heap() {
    static mut HEAP: MaybeUninit<[u8; config::HEAP_SIZE]> = MaybeUninit::uninit();

    unsafe {
        ALLOCATOR.init(addr_of_mut!(HEAP) as *mut u8, config::HEAP_SIZE);
    }
}

const COMET: [RGB8; 3] = [
    RGB8::new(255, 40, 0),
    RGB8::new(0, 180, 60),
    RGB8::new(40, 0, 255),
];

#[entry]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    init_heap();
    log::info!("Starting");

    let (mut strip, delay) = driver::init();

    // Dim blue on every LED. write_rgb reorders this array in place.
    let mut background = [[0u8, 0, 4]; config::STRIP.led_count];
    strip.write_rgb(background.as_flattened_mut()).unwrap();
    let backdrop = background[0];
    log::debug!("backdrop in wire order: {:?}", backdrop);

    let mut frame_count: usize = 0;
    loop {
        let frame = strip.frame_mut();
        frame.shift_right(1);

        if frame_count % config::STRIP.comet_spacing == 0 {
            let color = COMET[frame_count / config::STRIP.comet_spacing % COMET.len()];
            frame.overwrite_led(0, color);
        } else if let Some(trail) = frame.read_led(1) {
            // Fading tail behind the head.
            frame.overwrite_led(0, RGB8::new(trail.r / 4, trail.g / 4, trail.b / 4));
        }
        frame.merge_range(0, &backdrop);

        strip.flush();

        frame_count = frame_count.wrapping_add(1);
        delay.delay_millis(config::STRIP.frame_delay_ms);
    }
}
