use std::path::PathBuf;

use clap::Parser;

use vm8_core::{BorrowFlag, Config, Quirks, ShiftSource, SpriteEdges, TimerMode, CLOCK_SPEED};

/// Instructions per second at the machine's nominal clock period
const DEFAULT_SPEED: u32 = (1_000_000_000 / CLOCK_SPEED) as u32;

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(name = "vm8", about = "Runs a CHIP-8 ROM in an SDL2 window.")]
struct Args {
    /// ROM image to load at 0x200.
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// Instructions executed per second.
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: u32,

    /// Window pixels per display pixel.
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Shift Vy into Vx instead of shifting Vx in place (8xy6, 8xyE).
    #[arg(long)]
    shift_vy: bool,

    /// Derive the subtraction borrow flag from the updated Vx (8xy5, 8xy7).
    #[arg(long)]
    legacy_borrow: bool,

    /// Drop sprite pixels past the display edge instead of wrapping them.
    #[arg(long)]
    clip_sprites: bool,

    /// Seed for the random number instruction.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            quirks: Quirks {
                shift: if self.shift_vy {
                    ShiftSource::Vy
                } else {
                    ShiftSource::Vx
                },
                borrow: if self.legacy_borrow {
                    BorrowFlag::Legacy
                } else {
                    BorrowFlag::Operands
                },
                sprites: if self.clip_sprites {
                    SpriteEdges::Clip
                } else {
                    SpriteEdges::Wrap
                },
            },
            // the run loop counts the timers down at 60Hz on its own
            timers: TimerMode::External,
            seed: self.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run::run(&args.rom, args.config(), args.speed, args.scale)
}
