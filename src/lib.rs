//! An interpreter for the CHIP-8 virtual machine. The implementation follows the instruction set
//! described [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table): programs are copied to
//! address 0x200, executed one 16-bit opcode at a time, and paced by a scheduler that decouples
//! the instruction rate from the 60 Hz timer and display cadence.
//! For graphical output the bundled binary relies on the cursive text user interface library.
pub mod chip;
