use std::io::Read;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, TimerMode};
use crate::constants::{MAX_ROM_SIZE, PROGRAM_START};
use crate::error::Error;
use crate::frame_buffer::FrameBuffer;
use crate::instruction::decode;
use crate::operations::Context;
use crate::state::{Flow, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - the `config` it was built with and the random source used by Cxkk
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Nothing here blocks or sleeps. A program waiting on a key simply doesn't advance until the
/// host presses one, and the host decides how often `cycle` gets called.
pub struct Chip8 {
    state: State,
    pressed_keys: [bool; 16],
    config: Config,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            pressed_keys: [false; 16],
            config,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clears all state, reloads the sprite sheet and points the pc at the start of the program.
    /// The config and random source are kept.
    pub fn reset(&mut self) {
        debug!("resetting");
        self.state = State::new();
        self.pressed_keys = [false; 16];
    }

    /// Load a rom from a source file
    ///
    /// Reading stops one byte past the size limit, so an oversized source reports that size.
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Error> {
        // one byte past the limit is enough to tell an oversized ROM apart
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        reader
            .take(MAX_ROM_SIZE as u64 + 1)
            .read_to_end(&mut rom)?;
        self.load_bytes(&rom)
    }

    /// Copies `rom` into memory at the start of the program area.
    /// Registers and the pc are left alone.
    pub fn load_bytes(&mut self, rom: &[u8]) -> Result<(), Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte ROM at {:#05X}", rom.len(), start);
        Ok(())
    }

    /// Advances the CPU by a single cycle
    /// - gets, decodes and executes the next opcode
    /// - moves the pc on
    /// - ticks the timers unless the host drives them
    ///
    /// A recoverable error is returned after the machine has corrected itself and moved on.
    /// After a fatal error nothing has changed and the pc still points at the culprit.
    pub fn advance_cycle(&mut self) -> Result<(), Error> {
        let pc = self.state.pc;
        let op = self.state.fetch()?;
        let instruction = decode(op).ok_or(Error::UnknownInstruction { opcode: op, pc })?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            pc
        );

        let mut context = Context {
            keys: &self.pressed_keys,
            quirks: &self.config.quirks,
            rng: &mut self.rng,
        };
        let (flow, outcome) = match instruction.execute(&mut self.state, &mut context) {
            Ok(flow) => (flow, Ok(())),
            Err(err) if !err.is_fatal() => {
                warn!("{}", err);
                (Flow::Next, Err(err))
            }
            Err(err) => return Err(err),
        };

        self.state.advance(flow);
        if self.config.timers == TimerMode::PerCycle {
            self.state.tick_timers();
        }
        outcome
    }

    /// Shorthand for `advance_cycle`
    pub fn cycle(&mut self) -> Result<(), Error> {
        self.advance_cycle()
    }

    /// Counts the delay and sound timers down by one.
    /// Only needs calling by hosts that use `TimerMode::External`.
    pub fn tick_timers(&mut self) {
        self.state.tick_timers();
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn draw_flag(&self) -> bool {
        self.state.draw_flag
    }

    pub fn clear_draw_flag(&mut self) {
        self.state.draw_flag = false;
    }

    /// Whether the sound timer has run out since the flag was last cleared
    pub fn sound_flag(&self) -> bool {
        self.state.sound_flag
    }

    pub fn clear_sound_flag(&mut self) {
        self.state.sound_flag = false;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the hexadecimal keypad value 0x0..=0xF
    /// * `pressed` whether it is being held down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        match self.pressed_keys.get_mut(key as usize) {
            Some(state) => *state = pressed,
            None => warn!("ignoring key {:#X} outside the keypad", key),
        }
    }

    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed_keys
            .get(key as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    /// The value of register V`reg`
    pub fn v(&self, reg: usize) -> u8 {
        self.state.v[reg & 0xF]
    }

    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quirks;
    use crate::constants::SPRITE_SHEET;
    use std::io;

    fn with_program(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_config(Config {
            seed: Some(0),
            ..Config::default()
        });
        chip8.load_bytes(program).unwrap();
        chip8
    }

    struct Unreadable;

    impl Read for Unreadable {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_cycles_through_program() {
        let mut chip8 = with_program(&[0x00, 0xE0]);
        let starting_pc = chip8.pc();
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), starting_pc + 0x2);
        assert!(chip8.draw_flag());
    }

    #[test]
    fn test_loads_rom_from_reader() {
        let mut chip8 = Chip8::new();
        let mut rom: &[u8] = &[0x12, 0x34, 0x56];
        chip8.load_rom(&mut rom).unwrap();
        assert_eq!(chip8.memory()[0x200..0x203], [0x12, 0x34, 0x56]);
        assert_eq!(chip8.pc(), 0x200);
    }

    #[test]
    fn test_loads_rom_filling_memory() {
        let mut chip8 = Chip8::new();
        chip8.load_bytes(&[0xAB; MAX_ROM_SIZE]).unwrap();
        assert_eq!(chip8.memory()[0xFFF], 0xAB);
    }

    #[test]
    fn test_rejects_oversized_rom() {
        let mut chip8 = Chip8::new();
        let result = chip8.load_bytes(&[0xAB; MAX_ROM_SIZE + 1]);
        assert!(matches!(
            result,
            Err(Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        ));
        assert_eq!(chip8.memory()[0x200], 0x00);
    }

    #[test]
    fn test_stops_reading_an_oversized_rom() {
        let mut chip8 = Chip8::new();
        let mut rom = io::repeat(0xAB);
        let result = chip8.load_rom(&mut rom);
        assert!(matches!(
            result,
            Err(Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        ));
        assert_eq!(chip8.memory()[0x200], 0x00);
    }

    #[test]
    fn test_rejects_unreadable_rom() {
        let mut chip8 = Chip8::new();
        let result = chip8.load_rom(&mut Unreadable);
        assert!(matches!(result, Err(Error::RomUnreadable(_))));
    }

    #[test]
    fn test_reset_clears_state() {
        let mut chip8 = with_program(&[0x61, 0x22, 0xA3, 0x00, 0x00, 0xE0]);
        chip8.key_press(0x4);
        chip8.cycle().unwrap();
        chip8.cycle().unwrap();
        chip8.cycle().unwrap();
        chip8.reset();
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.v(0x1), 0x0);
        assert_eq!(chip8.i(), 0x0);
        assert!(!chip8.draw_flag());
        assert!(!chip8.is_key_pressed(0x4));
        assert_eq!(chip8.memory()[0x200], 0x0);
        assert_eq!(chip8.memory()[..80], SPRITE_SHEET[..]);
    }

    #[test]
    fn test_unknown_instruction_is_fatal() {
        let mut chip8 = with_program(&[0x81, 0x2F]);
        let result = chip8.cycle();
        assert!(matches!(
            result,
            Err(Error::UnknownInstruction {
                opcode: 0x812F,
                pc: 0x200
            })
        ));
        assert!(result.unwrap_err().is_fatal());
        assert_eq!(chip8.pc(), 0x200);
    }

    #[test]
    fn test_zeroed_memory_is_fatal() {
        let mut chip8 = Chip8::new();
        assert!(matches!(
            chip8.cycle(),
            Err(Error::UnknownInstruction { opcode: 0x0000, .. })
        ));
    }

    #[test]
    fn test_running_off_the_end_of_memory_is_fatal() {
        // jump to the last byte of memory
        let mut chip8 = with_program(&[0x1F, 0xFF]);
        chip8.cycle().unwrap();
        assert!(matches!(
            chip8.cycle(),
            Err(Error::MemoryOutOfBounds { address: 0x1000 })
        ));
    }

    #[test]
    fn test_stack_underflow_recovers() {
        let mut chip8 = with_program(&[0x00, 0xEE, 0x60, 0x05]);
        let result = chip8.cycle();
        assert!(matches!(result, Err(Error::StackUnderflow { pc: 0x200 })));
        assert_eq!(chip8.sp(), 0);
        assert_eq!(chip8.pc(), 0x202);
        chip8.cycle().unwrap();
        assert_eq!(chip8.v(0x0), 0x05);
    }

    #[test]
    fn test_call_and_return_pair_up() {
        // 0x200 call 0x206; 0x206 return
        let mut chip8 = with_program(&[0x22, 0x06, 0x00, 0xE0, 0x00, 0x00, 0x00, 0xEE]);
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), 0x206);
        assert_eq!(chip8.sp(), 1);
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), 0x202);
        assert_eq!(chip8.sp(), 0);
    }

    #[test]
    fn test_seventeenth_nested_call_overflows() {
        // call itself forever
        let mut chip8 = with_program(&[0x22, 0x00]);
        for _ in 0..16 {
            chip8.cycle().unwrap();
        }
        assert!(matches!(
            chip8.cycle(),
            Err(Error::StackOverflow { pc: 0x200 })
        ));
        assert_eq!(chip8.sp(), 16);
    }

    #[test]
    fn test_timers_count_down_per_cycle() {
        // DT = V0 = 2, then spin
        let mut chip8 = with_program(&[0x60, 0x02, 0xF0, 0x15, 0x12, 0x04]);
        chip8.cycle().unwrap();
        chip8.cycle().unwrap();
        assert_eq!(chip8.delay_timer(), 1);
        chip8.cycle().unwrap();
        assert_eq!(chip8.delay_timer(), 0);
        chip8.cycle().unwrap();
        assert_eq!(chip8.delay_timer(), 0);
    }

    #[test]
    fn test_external_timers_only_tick_when_asked() {
        let mut chip8 = Chip8::with_config(Config {
            timers: TimerMode::External,
            ..Config::default()
        });
        chip8
            .load_bytes(&[0x60, 0x02, 0xF0, 0x15, 0x12, 0x04])
            .unwrap();
        for _ in 0..4 {
            chip8.cycle().unwrap();
        }
        assert_eq!(chip8.delay_timer(), 2);
        chip8.tick_timers();
        assert_eq!(chip8.delay_timer(), 1);
    }

    #[test]
    fn test_sound_flag_is_raised_once() {
        // ST = V0 = 1, then spin
        let mut chip8 = with_program(&[0x60, 0x01, 0xF0, 0x18, 0x12, 0x04]);
        chip8.cycle().unwrap();
        assert!(!chip8.sound_flag());
        chip8.cycle().unwrap();
        assert!(chip8.sound_flag());
        chip8.clear_sound_flag();
        chip8.cycle().unwrap();
        assert!(!chip8.sound_flag());
    }

    #[test]
    fn test_waits_for_key_press() {
        let mut chip8 = with_program(&[0xF3, 0x0A]);
        chip8.cycle().unwrap();
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), 0x200);
        chip8.key_press(0xB);
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), 0x202);
        assert_eq!(chip8.v(0x3), 0xB);
    }

    #[test]
    fn test_ignores_keys_off_the_keypad() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0x10);
        assert!(!chip8.is_key_pressed(0x10));
        assert!((0..16).all(|key| !chip8.is_key_pressed(key)));
    }

    #[test]
    fn test_get_frame_follows_draw_flag() {
        let mut chip8 = with_program(&[0x00, 0xE0]);
        assert!(chip8.get_frame().is_none());
        chip8.cycle().unwrap();
        assert!(chip8.get_frame().is_some());
        chip8.clear_draw_flag();
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_quirks_reach_instructions() {
        let mut chip8 = Chip8::with_config(Config {
            quirks: Quirks::legacy(),
            seed: Some(0),
            ..Config::default()
        });
        // V1 = 0x30, V2 = 0x20, V1 -= V2
        chip8
            .load_bytes(&[0x61, 0x30, 0x62, 0x20, 0x81, 0x25])
            .unwrap();
        for _ in 0..3 {
            chip8.cycle().unwrap();
        }
        assert_eq!(chip8.v(0x1), 0x10);
        // legacy flag is V2 > V1 after the subtraction
        assert_eq!(chip8.v(0xF), 0x1);
        assert_eq!(chip8.config().quirks, Quirks::legacy());
    }
}
