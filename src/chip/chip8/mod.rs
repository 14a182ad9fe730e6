/// CHIP-8 constants.
mod constants;
/// Cursive display output.
pub mod cursive_display;
/// Main memory, call stack and framebuffer.
mod memory;
/// Decoding of opcodes and their execution.
mod opcodes;
/// The register file.
mod registers;
/// Convenience functions for modification of the CHIP-8 state.
mod util;

#[cfg(test)]
mod tests;

use std::fs;

use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};
use ux::u4;

pub use constants::{
    CHIP8_INSTRUCTION_FREQUENCY, CHIP8_MAX_PROGRAM_SIZE, CHIP8_PROGRAM_OFFSET,
    CHIP8_TIMER_FREQUENCY, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};
pub use memory::Memory;
pub use opcodes::{
    Address, Instruction, LduOp, Opcode, Operands, RegAndValue, RegOp, Register,
};
pub use registers::Registers;

use crate::chip::{io::InputSource, Chip, CycleOutcome, Error, FrameBuffer};

/// Represents the state of the CHIP-8.
pub struct Chip8 {
    /// 4096 bytes of main memory, the call stack and the framebuffer.
    memory: Memory,

    /// V0..VF, the index register, the program counter, the stack pointer and both timers.
    registers: Registers,

    /// Source of the bytes `CXKK` masks.
    rng: StdRng,

    /// When set, `CXKK` uses this byte instead of drawing one from `rng`.
    random_override: Option<u8>,

    /// The register an `FX0A` is waiting to fill. While set, cycles poll the input instead of
    /// fetching.
    awaiting_key: Option<u4>,
}

impl Chip for Chip8 {
    fn load_program(&mut self, path: &str) -> Result<usize, Error> {
        let program = fs::read(path).map_err(|source| Error::CouldNotReadProgram {
            path: path.to_string(),
            source,
        })?;
        self.load_program_bytes(&program)?;
        info!("Successfully loaded program {} ({} bytes)", path, program.len());

        Ok(program.len())
    }

    fn cycle(&mut self, input: &mut dyn InputSource) -> Result<CycleOutcome, Error> {
        if let Some(reg) = self.awaiting_key {
            return Ok(match input.pressed_key() {
                Some(key) => {
                    self.registers.set_v(reg, u8::from(key));
                    self.awaiting_key = None;
                    debug!("key {:X} pressed, resuming", u8::from(key));
                    CycleOutcome::KeyReceived(key)
                }
                None => CycleOutcome::AwaitingKey,
            });
        }

        let pc = self.registers.pc();
        let opcode = self.next_instruction()?;
        let instruction = Instruction::decode(opcode.raw())?;
        trace!("{:#05X}: {} {}", pc, opcode, instruction);

        util::increment_program_counter(self);
        if let Err(err) = instruction.execute(self, input) {
            self.registers.set_pc(pc);
            return Err(err);
        }

        Ok(CycleOutcome::Executed(opcode.raw()))
    }

    fn decay_timers(&mut self) {
        let dt = self.registers.delay_timer();
        self.registers.set_delay_timer(dt.saturating_sub(1));
        let st = self.registers.sound_timer();
        self.registers.set_sound_timer(st.saturating_sub(1));
    }

    fn is_awaiting_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    fn read_output_pins(&self) -> &FrameBuffer {
        self.memory.pixels()
    }

    fn sound_active(&self) -> bool {
        self.registers.sound_timer() > 0
    }
}

impl Chip8 {
    /// Constructs a new CHIP-8 with the glyphs loaded, the program counter at
    /// `CHIP8_PROGRAM_OFFSET` and a randomly seeded random number generator. Note that no
    /// program is loaded upon initialization.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Like [`Chip8::new`], but `CXKK` draws from a generator seeded with `seed`, making runs
    /// reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            memory: Memory::new(),
            registers: Registers::new(),
            rng,
            random_override: None,
            awaiting_key: None,
        }
    }

    /// Returns to the power-on state, discarding any loaded program.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.registers.reset_all();
        self.awaiting_key = None;
    }

    /// Copies `program` to `CHIP8_PROGRAM_OFFSET`. Nothing is written if it does not fit.
    pub fn load_program_bytes(&mut self, program: &[u8]) -> Result<(), Error> {
        self.memory.load_program(program)
    }

    /// Makes every following `CXKK` use `byte` before masking, or restores the generator
    /// with `None`.
    pub fn set_random_override(&mut self, byte: Option<u8>) {
        self.random_override = byte;
    }

    /// The register a pending `FX0A` will fill.
    pub fn awaiting_key(&self) -> Option<u4> {
        self.awaiting_key
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Fetches the opcode the program counter points to. Both bytes must be addressable.
    fn next_instruction(&self) -> Result<Opcode, Error> {
        let bytes = self.memory.read_range(self.registers.pc(), 2)?;
        Ok(Opcode::new([bytes[0], bytes[1]]))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}
