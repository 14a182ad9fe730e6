use thiserror::Error;

/// Everything that can go wrong while loading or running a program. None of these are recovered
/// from inside a cycle; they are handed to the caller, which decides whether to halt.
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory address {address:#05X} out of range, 0x000 to 0xFFF are allowed")]
    OutOfRangeAddress { address: usize },

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("program is too large ({size} bytes), at most {max} bytes fit into memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("stack pointer {pointer:#04X} is outside of the call stack")]
    StackOutOfRange { pointer: u8 },

    #[error("could not read program {path}: {source}")]
    CouldNotReadProgram {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("output sink disconnected")]
    OutputDisconnected,
}
