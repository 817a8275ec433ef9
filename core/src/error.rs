use std::io;

use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Only `StackUnderflow` is recoverable: the machine has already corrected itself by the time it
/// is reported. Every other kind means the run loop should stop calling `cycle`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown instruction {opcode:#06X} at {pc:#05X}")]
    UnknownInstruction { opcode: u16, pc: u16 },

    #[error("stack overflow calling from {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("unable to read ROM: {0}")]
    RomUnreadable(#[from] io::Error),
}

impl Error {
    /// Whether execution can continue after this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::StackUnderflow { .. })
    }
}
