//! End-to-end scenarios exercising more than one instruction at a time.

use dcpu16::{Bus, Dcpu, DeviceIdentity, HardwareDevice, Register};

fn basic(opcode: u8, b: u8, a: u8) -> u16 {
    (u16::from(a) << 10) | (u16::from(b) << 5) | u16::from(opcode)
}

fn special(op: u8, a: u8) -> u16 {
    (u16::from(a) << 10) | (u16::from(op) << 5)
}

const NEXT_WORD: u8 = 0x1f;
const PUSH_POP: u8 = 0x18;

/// Operand code for the short literal `value` (0..=30).
fn short_literal(value: u8) -> u8 {
    0x21 + value
}

#[test]
fn push_writes_below_sp_and_decrements_it() {
    let mut cpu = Dcpu::new();
    // SET PUSH, 0x55
    let set_push = basic(0x01, PUSH_POP, NEXT_WORD);
    cpu.load_program(&[set_push, 0x0055]);
    cpu.step();
    assert_eq!(cpu.registers().sp, 0xffff);
    assert_eq!(cpu.memory().read(0xffff), 0x55);
}

#[test]
fn jsr_then_return_round_trips_through_the_stack() {
    let mut cpu = Dcpu::new();
    // JSR 0x0003
    let jsr = special(0x01, NEXT_WORD);
    // at address 3: SET PC, POP  (returns to whatever JSR pushed)
    let ret = basic(0x01, 0x1c, PUSH_POP);
    let program = [jsr, 0x0003, 0x0000, ret];
    cpu.load_program(&program);
    cpu.step(); // JSR -> pushes PC (=2) onto stack, jumps to 3
    assert_eq!(cpu.registers().pc, 3);
    assert_eq!(cpu.registers().sp, 0xffff);
    cpu.step(); // SET PC, POP -> returns to address 2
    assert_eq!(cpu.registers().pc, 2);
    assert_eq!(cpu.registers().sp, 0);
}

#[test]
fn conditional_chain_skips_consecutive_failed_ifs() {
    let mut cpu = Dcpu::new();
    // IFE A, 1 (A=0, fails) ; IFE A, 1 (also fails, chained skip) ; SET B, 9 (executes)
    let ife1 = basic(0x12, 0x00, short_literal(1));
    let ife2 = basic(0x12, 0x00, short_literal(1));
    let set_b9 = basic(0x01, 0x01, short_literal(9));
    cpu.load_program(&[ife1, ife2, set_b9]);
    cpu.step();
    assert_eq!(cpu.registers().pc, 3);
    cpu.step();
    assert_eq!(cpu.registers().get(Register::B), 9);
}

#[test]
fn interrupt_queueing_defers_delivery_until_drained() {
    let mut cpu = Dcpu::new();
    // IAS 0x1000 ; IAQ 1 (enable queueing) ; INT 7 ; SET B, 3
    let ias = special(0x0a, NEXT_WORD);
    let iaq_on = special(0x0c, short_literal(1));
    let int7 = special(0x08, short_literal(7));
    let set_b3 = basic(0x01, 0x01, short_literal(3));
    cpu.load_program(&[ias, 0x1000, iaq_on, int7, set_b3]);
    cpu.step(); // IAS
    cpu.step(); // IAQ 1
    cpu.step(); // INT 7 -> queued, not delivered while queueing is on
    assert_ne!(cpu.registers().pc, 0x1000);
    cpu.step(); // SET B, 3 still runs; the queued interrupt waits for RFI
    assert_eq!(cpu.registers().get(Register::B), 3);
}

#[test]
fn hwq_reports_a_connected_device_identity() {
    struct FixedDevice(DeviceIdentity);
    impl HardwareDevice for FixedDevice {
        fn identity(&self) -> DeviceIdentity {
            self.0
        }
        fn interrupt(&mut self, _bus: &mut dyn Bus) {}
    }
    let id = DeviceIdentity {
        hardware_id: 0x7349_f615,
        version: 0x1802,
        manufacturer_id: 0x1c6c_8b36,
    };
    let mut cpu = Dcpu::new();
    cpu.connect(Box::new(FixedDevice(id)));
    // HWQ A: special=0x11, a=Register A (index 0)
    let hwq = special(0x11, 0x00);
    cpu.load_program(&[hwq]);
    cpu.step();
    assert_eq!(cpu.registers().get(Register::A), 0xf615);
    assert_eq!(cpu.registers().get(Register::B), 0x7349);
    assert_eq!(cpu.registers().get(Register::C), 0x1802);
}
