pub mod chip8;
/// Errors raised while loading or executing programs.
mod error;
/// Interfaces to the input and output devices surrounding an interpreter.
pub mod io;
/// Pacing of instruction cycles, timer decay and display refresh.
pub mod scheduler;

pub use error::Error;

use crate::chip::io::InputSource;

/// The framebuffer of an interpreter, indexed as `[y][x]`.
pub type FrameBuffer = [[bool; chip8::DISPLAY_WIDTH]; chip8::DISPLAY_HEIGHT];

/// What a single call to [`Chip::cycle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// An opcode was fetched, decoded and executed.
    Executed(u16),
    /// The interpreter is blocked waiting for a key press; nothing was fetched.
    AwaitingKey,
    /// A key press arrived and completed a pending wait.
    KeyReceived(ux::u4),
}

/// The host-facing view of an interpreter. The scheduler and the binary only talk to an
/// interpreter through this trait.
pub trait Chip {
    /// Loads the program stored at `path` and returns its size in bytes.
    fn load_program(&mut self, path: &str) -> Result<usize, Error>;

    /// Runs a single fetch/decode/execute step, polling `input` where the program asks for it.
    fn cycle(&mut self, input: &mut dyn InputSource) -> Result<CycleOutcome, Error>;

    /// Decrements both timers by one if they are nonzero.
    fn decay_timers(&mut self);

    /// Whether execution is suspended until a key is pressed.
    fn is_awaiting_key(&self) -> bool;

    /// The framebuffer as it currently stands, indexed as `[y][x]`.
    fn read_output_pins(&self) -> &FrameBuffer;

    /// Whether the sound timer is currently nonzero.
    fn sound_active(&self) -> bool;
}
