use log::debug;

use crate::chip::{
    chip8::{
        constants::{CHIP8_CHARSET_GLYPH_LEN, CHIP8_CHARSET_OFFSET},
        opcodes::{Address, LduOp, Register},
        Chip8,
    },
    io::InputSource,
    Error,
};

/// `ANNN`
pub(super) fn load_index(state: &mut Chip8, operands: Address) {
    state.registers.set_i(u16::from(operands.address));
}

/// The `FX__` group. Memory transfers validate the whole range at `I` before any byte moves.
pub(super) fn execute(
    state: &mut Chip8,
    op: LduOp,
    operands: Register,
    input: &mut dyn InputSource,
) -> Result<(), Error> {
    let x = operands.reg;
    let vx = state.registers.v(x);

    match op {
        LduOp::ReadDelay => state.registers.set_v(x, state.registers.delay_timer()),
        LduOp::WaitKey => match input.pressed_key() {
            Some(key) => state.registers.set_v(x, u8::from(key)),
            None => {
                debug!("waiting for a key press into V{:X}", u8::from(x));
                state.awaiting_key = Some(x);
            }
        },
        LduOp::SetDelay => state.registers.set_delay_timer(vx),
        LduOp::SetSound => state.registers.set_sound_timer(vx),
        LduOp::AddIndex => {
            let i = state.registers.i().wrapping_add(u16::from(vx));
            state.registers.set_i(i);
        }
        LduOp::Glyph => state
            .registers
            .set_i(CHIP8_CHARSET_OFFSET + u16::from(vx) * CHIP8_CHARSET_GLYPH_LEN),
        LduOp::Bcd => {
            let digits = [vx / 100, vx / 10 % 10, vx % 10];
            state.memory.write_range(state.registers.i(), &digits)?;
        }
        LduOp::Store => {
            state
                .memory
                .write_range(state.registers.i(), state.registers.v_range(x))?;
        }
        LduOp::Load => {
            let len = usize::from(u8::from(x)) + 1;
            let values = state.memory.read_range(state.registers.i(), len)?;
            state.registers.set_v_range(values);
        }
    }
    Ok(())
}
