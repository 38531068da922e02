pub(crate) struct StripConfig {
    pub led_count: usize,
    pub frame_delay_ms: u32,
    /// New comet every this many frames.
    pub comet_spacing: usize,
    pub watchdog_timeout_ms: u64,
}

pub(crate) const STRIP: StripConfig = StripConfig {
    led_count: 60,
    frame_delay_ms: 30,
    comet_spacing: 12,
    watchdog_timeout_ms: 500,
};

pub(crate) const HEAP_SIZE: usize = 16 * 1024;
