//! Generic Keyboard: a 16-entry cyclic event buffer plus a 256-bit
//! pressed-key table.
//!
//! `translate` maps a host-neutral [`PhysicalKey`] to a DCPU keycode so
//! this crate never has to know about any particular windowing toolkit;
//! the runner is the one that knows how its window library reports keys.

use dcpu16::{Bus, DeviceIdentity, HardwareDevice, Register};

const HARDWARE_ID: u32 = 0x30CF_7406;
const MANUFACTURER_ID: u32 = 0x1C6C_8B36;
const VERSION: u16 = 1;
const BUFFER_SIZE: usize = 16;

pub const KB_BACKSPACE: u16 = 0x10;
pub const KB_RETURN: u16 = 0x11;
pub const KB_INSERT: u16 = 0x12;
pub const KB_DELETE: u16 = 0x13;
pub const KB_ASCII_BEG: u16 = 0x20;
pub const KB_ASCII_END: u16 = 0x7F;
pub const KB_UP: u16 = 0x80;
pub const KB_DOWN: u16 = 0x81;
pub const KB_LEFT: u16 = 0x82;
pub const KB_RIGHT: u16 = 0x83;
pub const KB_SHIFT: u16 = 0x90;
pub const KB_CONTROL: u16 = 0x91;

/// A key as reported by a host window toolkit, independent of any specific
/// one. The runner is responsible for mapping its toolkit's key events
/// into this shape before calling [`Keyboard::key_pressed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalKey {
    Char(char),
    Backspace,
    Return,
    Insert,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Shift,
    Control,
}

/// Map a host key event to the DCPU-16 keycode space, or `None` if the key
/// has no DCPU-16 representation.
#[must_use]
pub fn translate(key: PhysicalKey) -> Option<u16> {
    match key {
        PhysicalKey::Char(c) => {
            let code = u16::from(c as u32 as u16);
            (KB_ASCII_BEG..=KB_ASCII_END).contains(&code).then_some(code)
        }
        PhysicalKey::Backspace => Some(KB_BACKSPACE),
        PhysicalKey::Return => Some(KB_RETURN),
        PhysicalKey::Insert => Some(KB_INSERT),
        PhysicalKey::Delete => Some(KB_DELETE),
        PhysicalKey::Up => Some(KB_UP),
        PhysicalKey::Down => Some(KB_DOWN),
        PhysicalKey::Left => Some(KB_LEFT),
        PhysicalKey::Right => Some(KB_RIGHT),
        PhysicalKey::Shift => Some(KB_SHIFT),
        PhysicalKey::Control => Some(KB_CONTROL),
    }
}

pub struct Keyboard {
    buffer: [u16; BUFFER_SIZE],
    head: usize,
    len: usize,
    pressed: [bool; 256],
    interrupt_message: Option<u16>,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: [0; BUFFER_SIZE],
            head: 0,
            len: 0,
            pressed: [false; 256],
            interrupt_message: None,
        }
    }

    fn push_event(&mut self, code: u16) {
        let tail = (self.head + self.len) % BUFFER_SIZE;
        self.buffer[tail] = code;
        if self.len == BUFFER_SIZE {
            self.head = (self.head + 1) % BUFFER_SIZE;
        } else {
            self.len += 1;
        }
    }

    fn pop_event(&mut self) -> u16 {
        if self.len == 0 {
            return 0;
        }
        let code = self.buffer[self.head];
        self.head = (self.head + 1) % BUFFER_SIZE;
        self.len -= 1;
        code
    }

    /// Record a key going down: marks it pressed, queues a "typed" event,
    /// and raises the configured interrupt (if any) immediately.
    pub fn key_pressed(&mut self, code: u16, bus: &mut dyn Bus) {
        self.pressed[code as usize & 0xff] = true;
        self.push_event(code);
        if let Some(message) = self.interrupt_message {
            bus.raise_interrupt(message);
        }
    }

    pub fn key_released(&mut self, code: u16) {
        self.pressed[code as usize & 0xff] = false;
    }

    #[must_use]
    pub fn is_pressed(&self, code: u16) -> bool {
        self.pressed[code as usize & 0xff]
    }
}

impl HardwareDevice for Keyboard {
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
                self.buffer = [0; BUFFER_SIZE];
                self.head = 0;
                self.len = 0;
            }
            1 => {
                let code = self.pop_event();
                bus.set_register(Register::C, code);
            }
            2 => {
                let key = bus.get_register(Register::B);
                let pressed = u16::from(self.is_pressed(key));
                bus.set_register(Register::C, pressed);
            }
            3 => {
                let message = bus.get_register(Register::B);
                self.interrupt_message = if message == 0 { None } else { Some(message) };
            }
            _ => {}
        }
    }
}
