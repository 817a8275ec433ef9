use std::ops::Range;

use crate::constants::{MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_ADDRESS, STACK_DEPTH};
use crate::error::Error;
use crate::frame_buffer::FrameBuffer;
use crate::opcode;

/// A snapshot of the machine's internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - When the sound timer runs out it raises the sound flag
///
/// ## Memory
/// - 16 entry stack of return addresses for subroutine calls
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Flags
/// - (draw_flag) the frame buffer changed since the host last cleared this
/// - (sound_flag) the sound timer ran out since the host last cleared this
#[derive(Clone, Debug)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub sound_flag: bool,
}

/// How the program counter moves once an instruction has executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Move on to the following instruction
    Next,
    /// Skip over the following instruction
    Skip,
    /// Continue from an explicit address
    Jump(u16),
    /// Execute the same instruction again next cycle
    Wait,
}

impl State {
    pub fn new() -> Self {
        // 0x000 - 0x050 holds the sprite sheet
        let mut memory = [0; MEMORY_SIZE];
        let sheet = SPRITE_SHEET_ADDRESS as usize;
        memory[sheet..sheet + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            sound_flag: false,
        }
    }

    /// Gets the opcode currently pointed at by the pc.
    ///
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<u16, Error> {
        let span = self.span(self.pc, 2)?;
        Ok(opcode::from_bytes(
            self.memory[span.start],
            self.memory[span.start + 1],
        ))
    }

    /// The range of `len` bytes of memory starting at `address`, if all of it exists
    pub fn span(&self, address: u16, len: usize) -> Result<Range<usize>, Error> {
        let start = address as usize;
        let end = start + len;
        if len == 0 {
            let start = start.min(MEMORY_SIZE);
            return Ok(start..start);
        }
        if end > MEMORY_SIZE {
            return Err(Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }

    pub fn advance(&mut self, flow: Flow) {
        self.pc = match flow {
            Flow::Next => self.pc.wrapping_add(2),
            Flow::Skip => self.pc.wrapping_add(4),
            Flow::Jump(address) => address,
            Flow::Wait => self.pc,
        };
    }

    /// Counts both timers down by one.
    /// The sound flag is raised when the sound timer goes from 1 to 0.
    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            if self.sound_timer == 1 {
                self.sound_flag = true;
            }
            self.sound_timer -= 1;
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
