//! Windowed run loop: follows the reference implementation's cycle-budget
//! pattern (`cycles_target = cycles_so_far + FREQUENCY * frame_time`),
//! stepping the CPU until that target is met or it halts, then updating
//! devices and presenting a frame.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use dcpu16::{Bus, Dcpu, DeviceIdentity, HardwareDevice};
use dcpu_clock::GenericClock;
use dcpu_keyboard::{translate, Keyboard, PhysicalKey};
use dcpu_lem1802::{Lem1802, PIXEL_HEIGHT, PIXEL_WIDTH};
use minifb::{Key, Window, WindowOptions};

use crate::cli::CliError;
use crate::memory_dump;

/// Reference cycle rate: the DCPU-16 spec targets 100 kHz.
const FREQUENCY_HZ: u64 = 100_000;
const FRAME_RATE_HZ: f64 = 60.0;

/// Delegates to a shared, `Rc<RefCell<_>>`-held device so the run loop can
/// also read its state (for rendering, or for injecting key events) without
/// reaching inside the CPU's own device list.
struct Shared<D>(Rc<RefCell<D>>);

impl HardwareDevice for Shared<Lem1802> {
    fn identity(&self) -> DeviceIdentity {
        self.0.borrow().identity()
    }
    fn interrupt(&mut self, bus: &mut dyn Bus) {
        self.0.borrow_mut().interrupt(bus);
    }
}

impl HardwareDevice for Shared<Keyboard> {
    fn identity(&self) -> DeviceIdentity {
        self.0.borrow().identity()
    }
    fn interrupt(&mut self, bus: &mut dyn Bus) {
        self.0.borrow_mut().interrupt(bus);
    }
}

fn minifb_key_to_physical(key: Key) -> Option<PhysicalKey> {
    use Key::*;
    Some(match key {
        A => PhysicalKey::Char('a'),
        B => PhysicalKey::Char('b'),
        C => PhysicalKey::Char('c'),
        D => PhysicalKey::Char('d'),
        E => PhysicalKey::Char('e'),
        F => PhysicalKey::Char('f'),
        G => PhysicalKey::Char('g'),
        H => PhysicalKey::Char('h'),
        I => PhysicalKey::Char('i'),
        J => PhysicalKey::Char('j'),
        K => PhysicalKey::Char('k'),
        L => PhysicalKey::Char('l'),
        M => PhysicalKey::Char('m'),
        N => PhysicalKey::Char('n'),
        O => PhysicalKey::Char('o'),
        P => PhysicalKey::Char('p'),
        Q => PhysicalKey::Char('q'),
        R => PhysicalKey::Char('r'),
        S => PhysicalKey::Char('s'),
        T => PhysicalKey::Char('t'),
        U => PhysicalKey::Char('u'),
        V => PhysicalKey::Char('v'),
        W => PhysicalKey::Char('w'),
        X => PhysicalKey::Char('x'),
        Y => PhysicalKey::Char('y'),
        Z => PhysicalKey::Char('z'),
        Key0 => PhysicalKey::Char('0'),
        Key1 => PhysicalKey::Char('1'),
        Key2 => PhysicalKey::Char('2'),
        Key3 => PhysicalKey::Char('3'),
        Key4 => PhysicalKey::Char('4'),
        Key5 => PhysicalKey::Char('5'),
        Key6 => PhysicalKey::Char('6'),
        Key7 => PhysicalKey::Char('7'),
        Key8 => PhysicalKey::Char('8'),
        Key9 => PhysicalKey::Char('9'),
        Space => PhysicalKey::Char(' '),
        Up => PhysicalKey::Up,
        Down => PhysicalKey::Down,
        Left => PhysicalKey::Left,
        Right => PhysicalKey::Right,
        Backspace => PhysicalKey::Backspace,
        Enter => PhysicalKey::Return,
        Insert => PhysicalKey::Insert,
        Delete => PhysicalKey::Delete,
        LeftShift | RightShift => PhysicalKey::Shift,
        LeftCtrl | RightCtrl => PhysicalKey::Control,
        _ => return None,
    })
}

pub fn run(program_path: &str) -> Result<(), CliError> {
    let path = Path::new(program_path);
    let source = std::fs::read_to_string(path).map_err(|e| CliError::Io(e.to_string()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let preprocessed = format_dcpu_asm::preprocess(&source, base_dir, &mut |p| {
        std::fs::read_to_string(p)
    })
    .map_err(|e| CliError::Preprocess(e.to_string()))?;
    let image = format_dcpu_asm::assemble(&preprocessed)
        .map_err(|e| CliError::Assemble(e.to_string()))?;

    let mut cpu = Dcpu::new();
    cpu.load_program(&image);
    memory_dump::dump(Path::new("dump0.txt"), cpu.memory()).map_err(|e| CliError::Io(e.to_string()))?;

    let lem = Rc::new(RefCell::new(Lem1802::new()));
    let keyboard = Rc::new(RefCell::new(Keyboard::new()));
    cpu.connect(Box::new(Shared(Rc::clone(&lem))));
    cpu.connect(Box::new(Shared(Rc::clone(&keyboard))));
    cpu.connect(Box::new(GenericClock::new()));

    let mut window = Window::new(
        "DCPU-16",
        PIXEL_WIDTH * 4,
        PIXEL_HEIGHT * 4,
        WindowOptions::default(),
    )
    .map_err(|e| CliError::Io(e.to_string()))?;
    window.limit_update_rate(Some(std::time::Duration::from_secs_f64(1.0 / FRAME_RATE_HZ)));

    let mut pressed_last_frame: Vec<Key> = Vec::new();
    let cycles_per_frame = (FREQUENCY_HZ as f64 / FRAME_RATE_HZ) as u64;

    while window.is_open() && !window.is_key_down(Key::Escape) && !cpu.is_broken() {
        let target = cpu.cycles() + cycles_per_frame;
        while cpu.cycles() < target && !cpu.is_broken() {
            cpu.step();
        }

        let pressed_now = window.get_keys();
        for key in &pressed_now {
            if !pressed_last_frame.contains(key) {
                if let Some(physical) = minifb_key_to_physical(*key) {
                    if let Some(code) = translate(physical) {
                        keyboard.borrow_mut().key_pressed(code, &mut cpu);
                    }
                }
            }
        }
        for key in &pressed_last_frame {
            if !pressed_now.contains(key) {
                if let Some(physical) = minifb_key_to_physical(*key) {
                    if let Some(code) = translate(physical) {
                        keyboard.borrow_mut().key_released(code);
                    }
                }
            }
        }
        pressed_last_frame = pressed_now;

        cpu.update_devices(1.0 / FRAME_RATE_HZ);

        let buffer = lem.borrow().render(|addr| cpu.memory().read(addr));
        window
            .update_with_buffer(&buffer, PIXEL_WIDTH, PIXEL_HEIGHT)
            .map_err(|e| CliError::Io(e.to_string()))?;
    }

    memory_dump::dump(Path::new("dump1.txt"), cpu.memory()).map_err(|e| CliError::Io(e.to_string()))?;
    Ok(())
}
