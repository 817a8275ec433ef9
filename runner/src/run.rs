use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{error, info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vm8_core::{Chip8, Config, TIMER_SPEED};
use vm8_display::Display;

use crate::keymap::keymap;

/// Never run more than this many instructions between two looks at the event queue
const MAX_CYCLES_PER_FRAME: u32 = 100;

pub fn run(rom: &Path, config: Config, speed: u32, scale: u32) -> anyhow::Result<()> {
    let mut chip8 = Chip8::with_config(config);

    // Load ROM
    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    chip8
        .load_rom(&mut BufReader::new(file))
        .with_context(|| format!("unable to load {}", rom.display()))?;
    info!("loaded {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // Set initial timing
    let cycle_time = Duration::from_secs(1) / speed.max(1);
    let timer_time = Duration::from_nanos(TIMER_SPEED);
    let mut last_cycle = Instant::now();
    let mut last_tick = Instant::now();

    // Whether or not the configured clock speed should be respected
    let mut fast_forward = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        let mut cycles = 0;
        while cycles < MAX_CYCLES_PER_FRAME && (fast_forward || last_cycle.elapsed() >= cycle_time)
        {
            last_cycle += cycle_time;
            cycles += 1;
            match chip8.cycle() {
                Ok(()) => {}
                Err(e) if !e.is_fatal() => warn!("continuing after {}", e),
                Err(e) => {
                    error!("halting at {:#05X}: {}", chip8.pc(), e);
                    return Err(e.into());
                }
            }
        }
        if cycles == MAX_CYCLES_PER_FRAME {
            // fell behind; don't try to catch up on the lost time
            last_cycle = Instant::now();
        }

        while last_tick.elapsed() >= timer_time {
            last_tick += timer_time;
            chip8.tick_timers();
        }

        if chip8.sound_flag() {
            info!("beep");
            chip8.clear_sound_flag();
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.get_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
            chip8.clear_draw_flag();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    Ok(())
}
