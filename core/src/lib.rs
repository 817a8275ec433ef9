pub use chip8::Chip8;
pub use config::{BorrowFlag, Config, Quirks, ShiftSource, SpriteEdges, TimerMode};
pub use constants::{CLOCK_SPEED, TIMER_SPEED};
pub use error::Error;
pub use frame_buffer::FrameBuffer;
pub use instruction::{decode, AluOp, Instruction, KeyOp, MiscOp, SystemOp};

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
mod opcode;
mod operations;
mod state;
