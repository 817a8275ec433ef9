/// The display is 64 pixels wide and 32 pixels tall
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
pub const DISPLAY_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// 4096 bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// 0x000 - 0x1FF is reserved for the interpreter; ROMs are loaded at 0x200
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Return addresses for up to 16 nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// The sprite sheet is resident at the very start of memory
pub const SPRITE_SHEET_ADDRESS: u16 = 0x000;
/// Each hexadecimal glyph is 5 rows of 8 pixels
pub const SPRITE_HEIGHT: u16 = 5;

/// Nanoseconds per CPU cycle at the conventional 500Hz clock
pub const CLOCK_SPEED: u64 = 2_000_000;

/// Nanoseconds per timer tick; the timers count down at 60Hz
pub const TIMER_SPEED: u64 = 16_666_667;

/// Built-in sprites for the hexadecimal digits 0..F
///
/// Each glyph is 4 pixels wide, stored in the high nibble of each row.
/// ```text
/// 0xF0  ████
/// 0x90  █  █
/// 0x90  █  █
/// 0x90  █  █
/// 0xF0  ████
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
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
