//! The full implementation of the chip8 emulator, from the machine state over the
//! instruction handlers to an option to pretty print them.
mod chipset;
mod interpreter;
mod opcodes;
mod print;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
pub use interpreter::Interpreter;
