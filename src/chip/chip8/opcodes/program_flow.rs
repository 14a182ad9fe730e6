use crate::chip::{
    chip8::{
        opcodes::{Address, Operands, RegAndValue, Register},
        util::{self, conditional_skip},
        Chip8,
    },
    io::InputSource,
};

pub(super) fn jump(state: &mut Chip8, operands: Address) {
    state.registers.set_pc(u16::from(operands.address));
}

/// `BNNN`: jumps to `NNN + V0`. The target may lie beyond addressable memory, in which case
/// the next fetch fails.
pub(super) fn jump_with_offset(state: &mut Chip8, operands: Address) {
    let v0 = state.registers.v(ux::u4::new(0));
    state
        .registers
        .set_pc(u16::from(operands.address) + u16::from(v0));
}

/// `2NNN`: pushes the address of the next instruction and jumps to `NNN`.
pub(super) fn call(state: &mut Chip8, operands: Address) {
    let sp = state.registers.sp().wrapping_add(1);
    state.registers.set_sp(sp);
    state.memory.write_stack(sp, state.registers.pc());
    state.registers.set_pc(u16::from(operands.address));
}

pub(super) fn skip_if_equal(state: &mut Chip8, operands: RegAndValue) {
    conditional_skip(&operands, state, |o, s| s.registers.v(o.reg) == o.value);
}

pub(super) fn skip_if_not_equal(state: &mut Chip8, operands: RegAndValue) {
    conditional_skip(&operands, state, |o, s| s.registers.v(o.reg) != o.value);
}

pub(super) fn skip_if_registers_equal(state: &mut Chip8, operands: Operands) {
    conditional_skip(&operands, state, |o, s| {
        s.registers.v(o.x) == s.registers.v(o.y)
    });
}

pub(super) fn skip_if_registers_not_equal(state: &mut Chip8, operands: Operands) {
    conditional_skip(&operands, state, |o, s| {
        s.registers.v(o.x) != s.registers.v(o.y)
    });
}

/// `EX9E`
pub(super) fn skip_if_key(state: &mut Chip8, operands: Register, input: &mut dyn InputSource) {
    if is_key_pressed(state, operands, input) {
        util::increment_program_counter(state);
    }
}

/// `EXA1`
pub(super) fn skip_unless_key(state: &mut Chip8, operands: Register, input: &mut dyn InputSource) {
    if !is_key_pressed(state, operands, input) {
        util::increment_program_counter(state);
    }
}

/// A register holding a value above 0xF never matches a key.
fn is_key_pressed(state: &Chip8, operands: Register, input: &mut dyn InputSource) -> bool {
    input.pressed_key().map(u8::from) == Some(state.registers.v(operands.reg))
}
