use rand::Rng;
use ux::u4;

use crate::chip::chip8::{
    opcodes::{Operands, RegAndValue, RegOp},
    Chip8,
};

/// `6XKK`
pub(super) fn load(state: &mut Chip8, operands: RegAndValue) {
    state.registers.set_v(operands.reg, operands.value);
}

/// `7XKK`: adds without touching the flag register.
pub(super) fn add(state: &mut Chip8, operands: RegAndValue) {
    let value = state.registers.v(operands.reg).wrapping_add(operands.value);
    state.registers.set_v(operands.reg, value);
}

/// `8XY_`. Operations producing a flag write `VF` before `VX`, so when `X` is `F` the result
/// wins over the flag.
pub(super) fn register(state: &mut Chip8, op: RegOp, operands: Operands) {
    fn modify_registers(
        state: &mut Chip8,
        r1: u4,
        r2: u4,
        f: fn(u8, u8) -> (u8, Option<bool>),
    ) {
        let (val, flag) = f(state.registers.v(r1), state.registers.v(r2));
        if let Some(flag) = flag {
            state.registers.set_flag(flag);
        }
        state.registers.set_v(r1, val);
    }

    let (x, y) = (operands.x, operands.y);
    match op {
        RegOp::Mov => modify_registers(state, x, y, |_, v2| (v2, None)),
        RegOp::Or => modify_registers(state, x, y, |v1, v2| (v1 | v2, None)),
        RegOp::And => modify_registers(state, x, y, |v1, v2| (v1 & v2, None)),
        RegOp::Xor => modify_registers(state, x, y, |v1, v2| (v1 ^ v2, None)),
        RegOp::Add => modify_registers(state, x, y, |v1, v2| {
            let (result, overflow) = v1.overflowing_add(v2);
            (result, Some(overflow))
        }),
        RegOp::Sub => modify_registers(state, x, y, |v1, v2| {
            (v1.wrapping_sub(v2), Some(v1 > v2))
        }),
        RegOp::Shr => modify_registers(state, x, y, |v1, _| (v1 >> 1, Some(v1 & 1 != 0))),
        // Same difference as `Sub`, only the flag reports the opposite comparison.
        RegOp::Subn => modify_registers(state, x, y, |v1, v2| {
            (v1.wrapping_sub(v2), Some(v2 > v1))
        }),
        RegOp::Shl => modify_registers(state, x, y, |v1, _| {
            (v1 << 1, Some(v1 & 0x80 != 0))
        }),
    }
}

/// `CXKK`: a random byte masked with `KK`.
pub(super) fn random(state: &mut Chip8, operands: RegAndValue) {
    let byte = match state.random_override {
        Some(byte) => byte,
        None => state.rng.gen::<u8>(),
    };
    state.registers.set_v(operands.reg, byte & operands.value);
}
