use crate::chip::chip8::Chip8;

pub fn conditional_skip<T>(operands: &T, state: &mut Chip8, f: fn(&T, &Chip8) -> bool) {
    if f(operands, state) {
        increment_program_counter(state);
    }
}

pub fn increment_program_counter(state: &mut Chip8) {
    let pc = state.registers.pc();
    state.registers.set_pc(pc.wrapping_add(2));
}
