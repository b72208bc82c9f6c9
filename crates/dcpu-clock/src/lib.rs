//! Generic Clock: a DCPU-16 peripheral that ticks at a programmable rate
//! and optionally raises an interrupt on every tick.
//!
//! Driven by an explicit `delta_seconds` per `update` call rather than a
//! wall-clock sample, so it can be stepped deterministically in tests.

use dcpu16::{Bus, DeviceIdentity, HardwareDevice, Register};

const HARDWARE_ID: u32 = 0x12D0_B402;
const MANUFACTURER_ID: u32 = 0x1C6C_8B36;
const VERSION: u16 = 1;

/// `GenericClock` as described in the DCPU-16 hardware docs: ticks `60/B`
/// times per second once armed with `SET_RATE` (A=0), reports elapsed
/// ticks with `GET_TICKS` (A=1), and can be told to raise an interrupt on
/// every tick with `SET_INT` (A=2).
pub struct GenericClock {
    tick_interval_seconds: f64,
    elapsed_seconds: f64,
    ticks: u16,
    interrupt_message: Option<u16>,
}

impl Default for GenericClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_interval_seconds: 0.0,
            elapsed_seconds: 0.0,
            ticks: 0,
            interrupt_message: None,
        }
    }

    #[must_use]
    pub fn ticks(&self) -> u16 {
        self.ticks
    }
}

impl HardwareDevice for GenericClock {
    fn identity(&self) -> DeviceIdentity {
        DeviceIdentity {
            hardware_id: HARDWARE_ID,
            version: VERSION,
            manufacturer_id: MANUFACTURER_ID,
        }
    }

    fn interrupt(&mut self, bus: &mut dyn Bus) {
        match bus.get_register(Register::A) {
            0 => {
                let b = bus.get_register(Register::B);
                self.tick_interval_seconds = if b == 0 { 0.0 } else { f64::from(b) / 60.0 };
                self.elapsed_seconds = 0.0;
                self.ticks = 0;
            }
            1 => bus.set_register(Register::C, self.ticks),
            2 => {
                let b = bus.get_register(Register::B);
                self.interrupt_message = if b == 0 { None } else { Some(b) };
            }
            _ => {}
        }
    }

    fn update(&mut self, delta_seconds: f64, bus: &mut dyn Bus) {
        if self.tick_interval_seconds <= 0.0 {
            return;
        }
        self.elapsed_seconds += delta_seconds;
        while self.elapsed_seconds >= self.tick_interval_seconds {
            self.elapsed_seconds -= self.tick_interval_seconds;
            self.ticks = self.ticks.wrapping_add(1);
            if let Some(message) = self.interrupt_message {
                bus.raise_interrupt(message);
            }
        }
    }
}
