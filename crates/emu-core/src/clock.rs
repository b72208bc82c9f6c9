//! Master clock configuration.

use crate::Ticks;

/// Configured run rate for the emulated CPU.
///
/// The host frame loop derives a per-frame cycle budget from this: run the
/// CPU for `frequency_hz * frame_seconds` cycles, then hand control back to
/// devices and the renderer.
#[derive(Debug, Clone, Copy)]
pub struct MasterClock {
    /// CPU frequency in Hz (the DCPU-16 reference implementation targets
    /// 100 kHz).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Cycle budget for one frame at the given frame rate (integer division).
    #[must_use]
    pub const fn ticks_per_frame(&self, frames_per_second: u64) -> Ticks {
        Ticks::new(self.frequency_hz / frames_per_second)
    }
}
