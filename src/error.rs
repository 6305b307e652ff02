use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid memory access '{0}'.")]
    Memory(#[from] MemoryError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("There is no key with the index {0:#X}.")]
    InvalidKey(usize),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("There is no font glyph for the value {0:#X}.")]
    InvalidDigit(u8),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum MemoryError {
    #[error("Memory location {address:#06X} is out of bounds, memory len is {len}")]
    OutOfBounds { address: usize, len: usize },
    #[error("The rom has {size} bytes, but only {max} bytes fit into memory")]
    RomTooLarge { size: usize, max: usize },
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Overflow,
    #[error("Stack is empty!")]
    Underflow,
}
