use log::warn;

use crate::chip::{
    chip8::constants::{
        CHIP8_CHARSET, CHIP8_CHARSET_OFFSET, CHIP8_MAX_ADDRESS, CHIP8_MAX_PROGRAM_SIZE,
        CHIP8_MEMORY_SIZE, CHIP8_PROGRAM_OFFSET, CHIP8_STACK_DEPTH, DISPLAY_HEIGHT, DISPLAY_WIDTH,
    },
    Error, FrameBuffer,
};

/// Main memory, the call stack and the framebuffer of the CHIP-8.
///
/// Layout of main memory:
///   0x000-0x04f  hexadecimal glyphs, five bytes per digit
///   0x050-0x1ff  unused (the interpreter lived here on the COSMAC VIP)
///   0x200-0xfff  program and working data
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; CHIP8_MEMORY_SIZE],
    stack: [u16; CHIP8_STACK_DEPTH],
    pixels: FrameBuffer,
}

impl Memory {
    /// Creates zeroed memory with the glyph sprites loaded at `CHIP8_CHARSET_OFFSET`.
    pub fn new() -> Self {
        let mut bytes = [0; CHIP8_MEMORY_SIZE];
        let offset = CHIP8_CHARSET_OFFSET as usize;
        bytes[offset..offset + CHIP8_CHARSET.len()].copy_from_slice(&CHIP8_CHARSET);

        Memory {
            bytes,
            stack: [0; CHIP8_STACK_DEPTH],
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn read(&self, address: u16) -> Result<u8, Error> {
        Self::check_address(address)?;
        Ok(self.bytes[address as usize])
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Error> {
        Self::check_address(address)?;
        self.bytes[address as usize] = value;
        Ok(())
    }

    /// Reads `len` consecutive bytes starting at `address`. Either every address is valid
    /// or nothing is returned.
    pub fn read_range(&self, address: u16, len: usize) -> Result<&[u8], Error> {
        let start = address as usize;
        if len > 0 {
            Self::check_address_usize(start + len - 1)?;
        }
        Ok(&self.bytes[start..start + len])
    }

    /// Writes `data` to consecutive addresses starting at `address`. The whole range is
    /// validated before the first byte is written.
    pub fn write_range(&mut self, address: u16, data: &[u8]) -> Result<(), Error> {
        let start = address as usize;
        if !data.is_empty() {
            Self::check_address_usize(start + data.len() - 1)?;
        }
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Copies a program verbatim to `CHIP8_PROGRAM_OFFSET`.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > CHIP8_MAX_PROGRAM_SIZE {
            return Err(Error::RomTooLarge {
                size: program.len(),
                max: CHIP8_MAX_PROGRAM_SIZE,
            });
        }
        self.write_range(CHIP8_PROGRAM_OFFSET, program)
    }

    pub fn read_stack(&self, pointer: u8) -> Result<u16, Error> {
        self.stack
            .get(pointer as usize)
            .copied()
            .ok_or(Error::StackOutOfRange { pointer })
    }

    /// Stores a return address. A pointer beyond the stack depth is ignored so that programs
    /// nesting calls too deeply keep running.
    pub fn write_stack(&mut self, pointer: u8, value: u16) {
        match self.stack.get_mut(pointer as usize) {
            Some(slot) => *slot = value,
            None => warn!(
                "dropping return address {:#05X}, stack pointer {} is beyond the stack depth",
                value, pointer
            ),
        }
    }

    /// Callers wrap coordinates before calling, `x < DISPLAY_WIDTH` and `y < DISPLAY_HEIGHT`.
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: bool) {
        self.pixels[y][x] = value;
    }

    pub fn clear_pixels(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    pub fn pixels(&self) -> &FrameBuffer {
        &self.pixels
    }

    fn check_address(address: u16) -> Result<(), Error> {
        Self::check_address_usize(address as usize)
    }

    fn check_address_usize(address: usize) -> Result<(), Error> {
        if address > CHIP8_MAX_ADDRESS as usize {
            return Err(Error::OutOfRangeAddress { address });
        }
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
