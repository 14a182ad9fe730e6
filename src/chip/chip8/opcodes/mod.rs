#[macro_use]
mod macros;
mod arithmetic_and_logic;
mod loads;
mod program_flow;
mod system;

use std::fmt;

use ux::{u12, u4};

use crate::chip::{chip8::Chip8, io::InputSource, Error};

/// Represents a CHIP-8 opcode. A CHIP-8 opcode is two bytes long, stored most significant
/// byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    /// Constructs a new `Opcode` given its byte representation.
    pub fn new(bytes: [u8; 2]) -> Opcode {
        Opcode(u16::from(bytes[0]) << 8 | u16::from(bytes[1]))
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    /// The most significant nibble, selecting the operation group.
    pub fn instruction_class(self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// The low 12 bits, `_NNN`.
    pub fn address(self) -> u12 {
        u12::new(self.0 & 0x0FFF)
    }

    /// The low byte, `__KK`.
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// Bits 8-11, `_X__`.
    pub fn x(self) -> u4 {
        u4::new(((self.0 & 0x0F00) >> 8) as u8)
    }

    /// Bits 4-7, `__Y_`.
    pub fn y(self) -> u4 {
        u4::new(((self.0 & 0x00F0) >> 4) as u8)
    }

    /// The low nibble, `___N`.
    pub fn n(self) -> u4 {
        u4::new((self.0 & 0x000F) as u8)
    }
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Opcode(raw)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

define_operands!(
    /// Payload of `_NNN` instructions.
    Address { address: u12 = address }
);

define_operands!(
    /// Payload of `_XKK` instructions.
    RegAndValue { reg: u4 = x, value: u8 = kk }
);

define_operands!(
    /// Payload of `_XYN` instructions. `n` is the sprite height for draws and selects the
    /// operation for register-to-register instructions.
    Operands { x: u4 = x, y: u4 = y, n: u4 = n }
);

define_operands!(
    /// Payload of `_X__` instructions whose low byte selects the operation.
    Register { reg: u4 = x }
);

/// Register-to-register operations of the `8XY_` group, selected by the low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegOp {
    Mov,
    Or,
    And,
    Xor,
    Add,
    Sub,
    Shr,
    Subn,
    Shl,
}

impl RegOp {
    fn decode(selector: u4) -> Option<RegOp> {
        match u8::from(selector) {
            0x0 => Some(RegOp::Mov),
            0x1 => Some(RegOp::Or),
            0x2 => Some(RegOp::And),
            0x3 => Some(RegOp::Xor),
            0x4 => Some(RegOp::Add),
            0x5 => Some(RegOp::Sub),
            0x6 => Some(RegOp::Shr),
            0x7 => Some(RegOp::Subn),
            0xE => Some(RegOp::Shl),
            _ => None,
        }
    }
}

/// Timer, index and memory transfer operations of the `FX__` group, selected by the low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LduOp {
    ReadDelay,
    WaitKey,
    SetDelay,
    SetSound,
    AddIndex,
    Glyph,
    Bcd,
    Store,
    Load,
}

impl LduOp {
    fn decode(selector: u8) -> Option<LduOp> {
        match selector {
            0x07 => Some(LduOp::ReadDelay),
            0x0A => Some(LduOp::WaitKey),
            0x15 => Some(LduOp::SetDelay),
            0x18 => Some(LduOp::SetSound),
            0x1E => Some(LduOp::AddIndex),
            0x29 => Some(LduOp::Glyph),
            0x33 => Some(LduOp::Bcd),
            0x55 => Some(LduOp::Store),
            0x65 => Some(LduOp::Load),
            _ => None,
        }
    }
}

/// A decoded instruction. Produced by [`Instruction::decode`] and matched exhaustively on
/// execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0`
    Cls,
    /// `00EE`
    Ret,
    /// `1NNN`
    Jmp(Address),
    /// `2NNN`
    Call(Address),
    /// `3XKK`
    Se(RegAndValue),
    /// `4XKK`
    Sne(RegAndValue),
    /// `5XY0`
    Sre(Operands),
    /// `6XKK`
    Ldr(RegAndValue),
    /// `7XKK`
    Add(RegAndValue),
    /// `8XY_`
    Reg(RegOp, Operands),
    /// `9XY0`
    Srne(Operands),
    /// `ANNN`
    Ld(Address),
    /// `BNNN`
    Jmpr(Address),
    /// `CXKK`
    Rnd(RegAndValue),
    /// `DXYN`
    Drw(Operands),
    /// `EX9E`
    Skp(Register),
    /// `EXA1`
    Sknp(Register),
    /// `FX__`
    Ldu(LduOp, Register),
}

impl Instruction {
    /// Decodes a raw opcode. Does not touch any interpreter state.
    pub fn decode(raw: u16) -> Result<Instruction, Error> {
        let opcode = Opcode::from(raw);
        let unknown = || Error::UnknownOpcode { opcode: raw };

        let instruction = match opcode.instruction_class() {
            0x0 => match raw {
                0x00E0 => Instruction::Cls,
                0x00EE => Instruction::Ret,
                _ => return Err(unknown()),
            },
            0x1 => Instruction::Jmp(opcode.into()),
            0x2 => Instruction::Call(opcode.into()),
            0x3 => Instruction::Se(opcode.into()),
            0x4 => Instruction::Sne(opcode.into()),
            0x5 if u8::from(opcode.n()) == 0 => Instruction::Sre(opcode.into()),
            0x6 => Instruction::Ldr(opcode.into()),
            0x7 => Instruction::Add(opcode.into()),
            0x8 => Instruction::Reg(RegOp::decode(opcode.n()).ok_or_else(unknown)?, opcode.into()),
            0x9 if u8::from(opcode.n()) == 0 => Instruction::Srne(opcode.into()),
            0xA => Instruction::Ld(opcode.into()),
            0xB => Instruction::Jmpr(opcode.into()),
            0xC => Instruction::Rnd(opcode.into()),
            0xD => Instruction::Drw(opcode.into()),
            0xE => match opcode.kk() {
                0x9E => Instruction::Skp(opcode.into()),
                0xA1 => Instruction::Sknp(opcode.into()),
                _ => return Err(unknown()),
            },
            0xF => Instruction::Ldu(LduOp::decode(opcode.kk()).ok_or_else(unknown)?, opcode.into()),
            _ => return Err(unknown()),
        };
        Ok(instruction)
    }

    /// Executes `self` relative to the given state. The program counter has already been
    /// advanced past this instruction. Either the whole instruction takes effect, or an error
    /// is returned before anything but the program counter was modified.
    pub(super) fn execute(
        self,
        state: &mut Chip8,
        input: &mut dyn InputSource,
    ) -> Result<(), Error> {
        match self {
            Instruction::Cls => system::clear_screen(state),
            Instruction::Ret => system::return_from_subroutine(state)?,
            Instruction::Drw(operands) => system::draw(state, operands)?,
            Instruction::Jmp(address) => program_flow::jump(state, address),
            Instruction::Call(address) => program_flow::call(state, address),
            Instruction::Jmpr(address) => program_flow::jump_with_offset(state, address),
            Instruction::Se(operands) => program_flow::skip_if_equal(state, operands),
            Instruction::Sne(operands) => program_flow::skip_if_not_equal(state, operands),
            Instruction::Sre(operands) => program_flow::skip_if_registers_equal(state, operands),
            Instruction::Srne(operands) => {
                program_flow::skip_if_registers_not_equal(state, operands)
            }
            Instruction::Skp(register) => program_flow::skip_if_key(state, register, input),
            Instruction::Sknp(register) => program_flow::skip_unless_key(state, register, input),
            Instruction::Ldr(operands) => arithmetic_and_logic::load(state, operands),
            Instruction::Add(operands) => arithmetic_and_logic::add(state, operands),
            Instruction::Reg(op, operands) => arithmetic_and_logic::register(state, op, operands),
            Instruction::Rnd(operands) => arithmetic_and_logic::random(state, operands),
            Instruction::Ld(address) => loads::load_index(state, address),
            Instruction::Ldu(op, register) => loads::execute(state, op, register, input)?,
        };
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn v(reg: u4) -> String {
            format!("V{:X}", u8::from(reg))
        }

        match *self {
            Instruction::Cls => write!(f, "CLS"),
            Instruction::Ret => write!(f, "RET"),
            Instruction::Jmp(a) => write!(f, "JP {:#05X}", u16::from(a.address)),
            Instruction::Call(a) => write!(f, "CALL {:#05X}", u16::from(a.address)),
            Instruction::Se(o) => write!(f, "SE {}, {:#04X}", v(o.reg), o.value),
            Instruction::Sne(o) => write!(f, "SNE {}, {:#04X}", v(o.reg), o.value),
            Instruction::Sre(o) => write!(f, "SE {}, {}", v(o.x), v(o.y)),
            Instruction::Ldr(o) => write!(f, "LD {}, {:#04X}", v(o.reg), o.value),
            Instruction::Add(o) => write!(f, "ADD {}, {:#04X}", v(o.reg), o.value),
            Instruction::Reg(op, o) => {
                let mnemonic = match op {
                    RegOp::Mov => "LD",
                    RegOp::Or => "OR",
                    RegOp::And => "AND",
                    RegOp::Xor => "XOR",
                    RegOp::Add => "ADD",
                    RegOp::Sub => "SUB",
                    RegOp::Shr => "SHR",
                    RegOp::Subn => "SUBN",
                    RegOp::Shl => "SHL",
                };
                write!(f, "{} {}, {}", mnemonic, v(o.x), v(o.y))
            }
            Instruction::Srne(o) => write!(f, "SNE {}, {}", v(o.x), v(o.y)),
            Instruction::Ld(a) => write!(f, "LD I, {:#05X}", u16::from(a.address)),
            Instruction::Jmpr(a) => write!(f, "JP V0, {:#05X}", u16::from(a.address)),
            Instruction::Rnd(o) => write!(f, "RND {}, {:#04X}", v(o.reg), o.value),
            Instruction::Drw(o) => write!(f, "DRW {}, {}, {}", v(o.x), v(o.y), u8::from(o.n)),
            Instruction::Skp(r) => write!(f, "SKP {}", v(r.reg)),
            Instruction::Sknp(r) => write!(f, "SKNP {}", v(r.reg)),
            Instruction::Ldu(op, r) => match op {
                LduOp::ReadDelay => write!(f, "LD {}, DT", v(r.reg)),
                LduOp::WaitKey => write!(f, "LD {}, K", v(r.reg)),
                LduOp::SetDelay => write!(f, "LD DT, {}", v(r.reg)),
                LduOp::SetSound => write!(f, "LD ST, {}", v(r.reg)),
                LduOp::AddIndex => write!(f, "ADD I, {}", v(r.reg)),
                LduOp::Glyph => write!(f, "LD F, {}", v(r.reg)),
                LduOp::Bcd => write!(f, "LD B, {}", v(r.reg)),
                LduOp::Store => write!(f, "LD [I], {}", v(r.reg)),
                LduOp::Load => write!(f, "LD {}, [I]", v(r.reg)),
            },
        }
    }
}
