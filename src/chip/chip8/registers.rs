use ux::u4;

use crate::chip::chip8::constants::{
    CHIP8_FLAG_REGISTER, CHIP8_PROGRAM_OFFSET, CHIP8_REGISTER_COUNT,
};

/// The register file of the CHIP-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    /// 16 general purpose registers V0..VF. VF doubles as the flag register.
    v: [u8; CHIP8_REGISTER_COUNT],

    /// The index register, used as a memory address operand.
    i: u16,

    /// Address of the next instruction.
    pc: u16,

    /// Points to the topmost occupied slot of the call stack.
    sp: u8,

    /// The delay timer.
    dt: u8,

    /// The sound timer. A tone plays while it is nonzero.
    st: u8,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; CHIP8_REGISTER_COUNT],
            i: 0,
            pc: CHIP8_PROGRAM_OFFSET,
            sp: 0,
            dt: 0,
            st: 0,
        }
    }

    /// Restores the power-on values.
    pub fn reset_all(&mut self) {
        *self = Registers::new();
    }

    pub fn v(&self, index: u4) -> u8 {
        self.v[usize::from(u8::from(index))]
    }

    pub fn set_v(&mut self, index: u4, value: u8) {
        self.v[usize::from(u8::from(index))] = value;
    }

    /// V0 through `last`, inclusive.
    pub fn v_range(&self, last: u4) -> &[u8] {
        &self.v[..=usize::from(u8::from(last))]
    }

    /// Overwrites V0 onwards with `values`.
    pub fn set_v_range(&mut self, values: &[u8]) {
        self.v[..values.len()].copy_from_slice(values);
    }

    pub fn flag(&self) -> u8 {
        self.v[CHIP8_FLAG_REGISTER]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[CHIP8_FLAG_REGISTER] = set as u8;
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, value: u16) {
        self.i = value;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    pub fn set_sp(&mut self, value: u8) {
        self.sp = value;
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.dt = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.st
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.st = value;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Registers::new()
    }
}
