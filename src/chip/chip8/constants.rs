/// Number of addressable bytes, 0x000 to 0xFFF.
pub const CHIP8_MEMORY_SIZE: usize = 4096;

pub const CHIP8_MAX_ADDRESS: u16 = 0xFFF;

/// Programs are loaded here and the program counter starts here.
pub const CHIP8_PROGRAM_OFFSET: u16 = 0x200;

pub const CHIP8_MAX_PROGRAM_SIZE: usize =
    CHIP8_MAX_ADDRESS as usize - CHIP8_PROGRAM_OFFSET as usize + 1;

/// Depth of the call stack, in 16-bit slots.
pub const CHIP8_STACK_DEPTH: usize = 16;

pub const CHIP8_REGISTER_COUNT: usize = 16;

/// Index of the register doubling as carry, borrow and collision flag.
pub const CHIP8_FLAG_REGISTER: usize = 0xF;

pub const DISPLAY_WIDTH: usize = 64;

pub const DISPLAY_HEIGHT: usize = 32;

/// The glyphs are stored from address 0, so the glyph for digit `d` starts at `d * 5`.
pub const CHIP8_CHARSET_OFFSET: u16 = 0x000;

pub const CHIP8_CHARSET_GLYPH_LEN: u16 = 5;

pub const CHIP8_CHARSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Default number of instructions executed per second.
pub const CHIP8_INSTRUCTION_FREQUENCY: u32 = 500;

/// Rate at which the timers decay and the display refreshes.
pub const CHIP8_TIMER_FREQUENCY: u32 = 60;
