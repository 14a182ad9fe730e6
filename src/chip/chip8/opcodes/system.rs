use crate::chip::{
    chip8::{
        constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH},
        opcodes::Operands,
        Chip8,
    },
    Error,
};

/// Sprites are at most 15 rows tall.
const MAX_SPRITE_ROWS: usize = 15;

/// `00E0`: turns every pixel off.
pub(super) fn clear_screen(state: &mut Chip8) {
    state.memory.clear_pixels();
}

/// `00EE`: pops the return address into the program counter.
pub(super) fn return_from_subroutine(state: &mut Chip8) -> Result<(), Error> {
    let sp = state.registers.sp();
    let return_address = state.memory.read_stack(sp)?;
    state.registers.set_pc(return_address);
    state.registers.set_sp(sp.wrapping_sub(1));
    Ok(())
}

/// `DXYN`: XORs the `n` row sprite at `I` onto the display at `(VX, VY)`, wrapping around
/// both edges. `VF` is set if any lit pixel was turned off.
pub(super) fn draw(state: &mut Chip8, operands: Operands) -> Result<(), Error> {
    let origin_x = state.registers.v(operands.x) as usize;
    let origin_y = state.registers.v(operands.y) as usize;
    let rows = usize::from(u8::from(operands.n));

    let mut sprite = [0u8; MAX_SPRITE_ROWS];
    sprite[..rows].copy_from_slice(state.memory.read_range(state.registers.i(), rows)?);

    let mut collision = false;
    for (row, bits) in sprite[..rows].iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for column in 0..8 {
            if bits & (0x80 >> column) == 0 {
                continue;
            }
            let x = (origin_x + column) % DISPLAY_WIDTH;
            let lit = state.memory.get_pixel(x, y);
            collision |= lit;
            state.memory.set_pixel(x, y, !lit);
        }
    }

    state.registers.set_flag(collision);
    Ok(())
}
