use vm8_core::constants::SPRITE_SHEET;
use vm8_core::{Chip8, Config, Error, TimerMode};

fn load(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_config(Config {
        seed: Some(8),
        ..Config::default()
    });
    chip8.load_bytes(program).unwrap();
    chip8
}

/// Cycles until the program jumps to itself, which is how these programs halt
fn run_until_loop(chip8: &mut Chip8) {
    for _ in 0..10_000 {
        let pc = chip8.pc();
        chip8.cycle().unwrap();
        if chip8.pc() == pc {
            return;
        }
    }
    panic!("program never settled, pc at {:#05X}", chip8.pc());
}

/// The cells a glyph's 4 pixel wide rows should light up
fn glyph_rows(digit: usize) -> Vec<[u8; 4]> {
    SPRITE_SHEET[digit * 5..digit * 5 + 5]
        .iter()
        .map(|row| {
            let mut cells = [0; 4];
            for (bit, cell) in cells.iter_mut().enumerate() {
                *cell = (row >> (7 - bit)) & 0x1;
            }
            cells
        })
        .collect()
}

#[test]
fn test_prints_a_number() {
    #[rustfmt::skip]
    let program = [
        0x60, 0xEA, // V0 = 234
        0xA3, 0x00, // I = 0x300
        0xF0, 0x33, // mem[I..I+3] = bcd(V0)
        0xF2, 0x65, // V0..=V2 = mem[I..I+3]
        0x63, 0x00, // V3 = 0
        0x64, 0x00, // V4 = 0
        0xF0, 0x29, // I = glyph(V0)
        0xD3, 0x45, // draw
        0x73, 0x05, // V3 += 5
        0xF1, 0x29, // I = glyph(V1)
        0xD3, 0x45, // draw
        0x73, 0x05, // V3 += 5
        0xF2, 0x29, // I = glyph(V2)
        0xD3, 0x45, // draw
        0x12, 0x1C, // halt
    ];
    let mut chip8 = load(&program);
    run_until_loop(&mut chip8);

    assert_eq!(chip8.memory()[0x300..0x303], [2, 3, 4]);
    assert_eq!(chip8.v(0xF), 0);
    assert!(chip8.draw_flag());

    let frame = chip8.frame_buffer();
    for (column, digit) in [(0, 2), (5, 3), (10, 4)] {
        for (row, cells) in glyph_rows(digit).iter().enumerate() {
            for (offset, &cell) in cells.iter().enumerate() {
                assert_eq!(
                    frame.get(row, column + offset),
                    Some(cell),
                    "digit {} at row {} column {}\n{:?}",
                    digit,
                    row,
                    column + offset,
                    frame
                );
            }
        }
    }
    let lit = frame.cells().iter().filter(|&&cell| cell == 1).count();
    let expected: usize = [2, 3, 4]
        .iter()
        .flat_map(|&digit| glyph_rows(digit))
        .map(|cells| cells.iter().filter(|&&cell| cell == 1).count())
        .sum();
    assert_eq!(lit, expected);
}

#[test]
fn test_counts_down_then_waits_for_a_key() {
    #[rustfmt::skip]
    let program = [
        0x60, 0x03, // V0 = 3
        0xF0, 0x15, // DT = V0
        0xF1, 0x07, // V1 = DT
        0x31, 0x00, // skip if V1 == 0
        0x12, 0x04, // jump back to reading DT
        0xF2, 0x0A, // V2 = wait for key
        0x12, 0x0C, // halt
    ];
    let mut chip8 = load(&program);
    while chip8.pc() != 0x20A {
        chip8.cycle().unwrap();
    }
    assert_eq!(chip8.delay_timer(), 0);

    for _ in 0..5 {
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), 0x20A);
    }
    chip8.key_press(0x5);
    chip8.cycle().unwrap();
    assert_eq!(chip8.pc(), 0x20C);
    assert_eq!(chip8.v(0x2), 0x5);
}

#[test]
fn test_external_timers_hold_the_countdown() {
    let program = [0x60, 0x03, 0xF0, 0x15, 0xF1, 0x07, 0x31, 0x00, 0x12, 0x04, 0x12, 0x0A];
    let mut chip8 = Chip8::with_config(Config {
        timers: TimerMode::External,
        ..Config::default()
    });
    chip8.load_bytes(&program).unwrap();
    for _ in 0..100 {
        chip8.cycle().unwrap();
    }
    assert_ne!(chip8.pc(), 0x20A);
    for _ in 0..3 {
        chip8.tick_timers();
    }
    run_until_loop(&mut chip8);
    assert_eq!(chip8.pc(), 0x20A);
}

#[test]
fn test_nested_subroutines_unwind() {
    #[rustfmt::skip]
    let program = [
        0x22, 0x06, // call A
        0x12, 0x02, // halt
        0x00, 0x00,
        0x70, 0x01, // A: V0 += 1
        0x22, 0x0C, //    call B
        0x00, 0xEE, //    return
        0x70, 0x10, // B: V0 += 0x10
        0x00, 0xEE, //    return
    ];
    let mut chip8 = load(&program);
    run_until_loop(&mut chip8);
    assert_eq!(chip8.pc(), 0x202);
    assert_eq!(chip8.sp(), 0);
    assert_eq!(chip8.v(0x0), 0x11);
}

#[test]
fn test_runaway_recursion_overflows() {
    // 0x200: V0 += 1; call 0x200
    let mut chip8 = load(&[0x70, 0x01, 0x22, 0x00]);
    let err = loop {
        if let Err(err) = chip8.cycle() {
            break err;
        }
    };
    assert!(matches!(err, Error::StackOverflow { pc: 0x202 }));
    assert!(err.is_fatal());
    assert_eq!(chip8.v(0x0), 17);
    assert_eq!(chip8.sp(), 16);
}
