/// Which register the shift instructions (8xy6, 8xyE) read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSource {
    /// Vx = Vx >> 1
    Vx,
    /// Vx = Vy >> 1, as on the original COSMAC VIP interpreter
    Vy,
}

/// How the subtraction instructions (8xy5, 8xy7) derive VF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowFlag {
    /// VF = 1 when the original operands don't borrow
    Operands,
    /// VF is computed by comparing the already updated Vx against Vy
    Legacy,
}

/// What happens to sprite pixels that fall past the edge of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteEdges {
    /// Pixels wrap around to the opposite edge
    Wrap,
    /// The start position wraps, pixels past the edge are dropped
    Clip,
}

/// Who is responsible for counting the timers down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Every executed instruction ticks both timers once
    PerCycle,
    /// The host calls `Chip8::tick_timers` itself, normally at 60Hz
    External,
}

/// # Quirks
/// Points where interpreters for this architecture disagree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    pub shift: ShiftSource,
    pub borrow: BorrowFlag,
    pub sprites: SpriteEdges,
}

impl Quirks {
    /// The flag behaviour of the legacy interpreter this machine descends from
    pub fn legacy() -> Self {
        Quirks {
            borrow: BorrowFlag::Legacy,
            ..Quirks::default()
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift: ShiftSource::Vx,
            borrow: BorrowFlag::Operands,
            sprites: SpriteEdges::Wrap,
        }
    }
}

/// Settings fixed for the lifetime of a `Chip8`; they survive `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    pub timers: TimerMode,
    /// Seed for Cxkk; `None` seeds from the operating system
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            timers: TimerMode::PerCycle,
            seed: None,
        }
    }
}
