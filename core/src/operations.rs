use log::warn;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{BorrowFlag, Quirks, ShiftSource, SpriteEdges};
use crate::constants::{SPRITE_HEIGHT, SPRITE_SHEET_ADDRESS, STACK_DEPTH};
use crate::error::Error;
use crate::state::{Flow, State};

/// What an instruction can see besides the machine state
pub struct Context<'a> {
    pub keys: &'a [bool; 16],
    pub quirks: &'a Quirks,
    pub rng: &'a mut StdRng,
}

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}

/// Vx = value; VF = flag
/// VF is written last so that it wins when x is F
fn set_with_flag(state: &mut State, x: usize, value: u8, flag: bool) -> Flow {
    state.v[x] = value;
    state.v[0xF] = u8::from(flag);
    Flow::Next
}

/// clear
pub fn cls(state: &mut State) -> Flow {
    state.frame_buffer.clear();
    state.draw_flag = true;
    Flow::Next
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Result<Flow, Error> {
    if state.sp == 0 {
        return Err(Error::StackUnderflow { pc: state.pc });
    }
    state.sp -= 1;
    Ok(Flow::Jump(state.stack[state.sp as usize].wrapping_add(2)))
}

/// call a machine code routine at addr
/// There is no host machine code to run so this does nothing.
pub fn sys(state: &State, addr: u16) -> Flow {
    warn!(
        "skipping unsupported machine code routine {:#05X} at {:#05X}",
        addr, state.pc
    );
    Flow::Next
}

/// PC = addr
pub fn jump(addr: u16) -> Flow {
    Flow::Jump(addr)
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<Flow, Error> {
    if state.sp as usize >= STACK_DEPTH {
        return Err(Error::StackOverflow { pc: state.pc });
    }
    state.stack[state.sp as usize] = state.pc;
    state.sp += 1;
    Ok(Flow::Jump(addr))
}

/// if Vx == kk then skip
pub fn ske(state: &State, x: usize, kk: u8) -> Flow {
    skip_if(state.v[x] == kk)
}

/// if Vx != kk then skip
pub fn skne(state: &State, x: usize, kk: u8) -> Flow {
    skip_if(state.v[x] != kk)
}

/// if Vx == Vy then skip
pub fn skre(state: &State, x: usize, y: usize) -> Flow {
    skip_if(state.v[x] == state.v[y])
}

/// if Vx != Vy then skip
pub fn skrne(state: &State, x: usize, y: usize) -> Flow {
    skip_if(state.v[x] != state.v[y])
}

/// Vx = kk
pub fn load(state: &mut State, x: usize, kk: u8) -> Flow {
    state.v[x] = kk;
    Flow::Next
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(state: &mut State, x: usize, kk: u8) -> Flow {
    state.v[x] = state.v[x].wrapping_add(kk);
    Flow::Next
}

/// Vx = Vy
pub fn mv(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] = state.v[y];
    Flow::Next
}

/// Vx |= Vy
pub fn or(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] |= state.v[y];
    Flow::Next
}

/// Vx &= Vy
pub fn and(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] &= state.v[y];
    Flow::Next
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] ^= state.v[y];
    Flow::Next
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: usize, y: usize) -> Flow {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    set_with_flag(state, x, res, over)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &mut State, x: usize, y: usize, borrow: BorrowFlag) -> Flow {
    let (res, under) = state.v[x].overflowing_sub(state.v[y]);
    state.v[x] = res;
    let flag = match borrow {
        BorrowFlag::Operands => !under,
        BorrowFlag::Legacy => state.v[y] > state.v[x],
    };
    set_with_flag(state, x, res, flag)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &mut State, x: usize, y: usize, borrow: BorrowFlag) -> Flow {
    let (res, under) = state.v[y].overflowing_sub(state.v[x]);
    state.v[x] = res;
    let flag = match borrow {
        BorrowFlag::Operands => !under,
        BorrowFlag::Legacy => state.v[x] > state.v[y],
    };
    set_with_flag(state, x, res, flag)
}

fn shift_source(state: &State, x: usize, y: usize, shift: ShiftSource) -> u8 {
    match shift {
        ShiftSource::Vx => state.v[x],
        ShiftSource::Vy => state.v[y],
    }
}

/// Vx = src >> 1; VF = the bit shifted out
pub fn shr(state: &mut State, x: usize, y: usize, shift: ShiftSource) -> Flow {
    let src = shift_source(state, x, y, shift);
    set_with_flag(state, x, src >> 1, src & 0x1 == 0x1)
}

/// Vx = src << 1; VF = the bit shifted out
pub fn shl(state: &mut State, x: usize, y: usize, shift: ShiftSource) -> Flow {
    let src = shift_source(state, x, y, shift);
    set_with_flag(state, x, src << 1, src >> 7 == 0x1)
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Flow {
    state.i = addr;
    Flow::Next
}

/// PC = V0 + addr
pub fn jumpi(state: &State, addr: u16) -> Flow {
    Flow::Jump(addr + u16::from(state.v[0x0]))
}

/// Vx = rand_byte & kk
pub fn rand(state: &mut State, x: usize, kk: u8, rng: &mut StdRng) -> Flow {
    let rand_byte: u8 = rng.gen();
    state.v[x] = rand_byte & kk;
    Flow::Next
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// Sets VF if any pixels were erased
pub fn draw(
    state: &mut State,
    x: usize,
    y: usize,
    n: u8,
    edges: SpriteEdges,
) -> Result<Flow, Error> {
    let sprite = state.span(state.i, n as usize)?;
    let (vx, vy) = (state.v[x], state.v[y]);
    let collision = state
        .frame_buffer
        .draw_sprite(vx, vy, &state.memory[sprite], edges);
    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
    Ok(Flow::Next)
}

/// Only the low nibble of Vx names a key
fn key_in(state: &State, x: usize, keys: &[bool; 16]) -> bool {
    keys[(state.v[x] & 0xF) as usize]
}

/// if Vx.pressed then skip
pub fn skpr(state: &State, x: usize, keys: &[bool; 16]) -> Flow {
    skip_if(key_in(state, x, keys))
}

/// if !Vx.pressed then skip
pub fn skup(state: &State, x: usize, keys: &[bool; 16]) -> Flow {
    skip_if(!key_in(state, x, keys))
}

/// Vx = DT
pub fn moved(state: &mut State, x: usize) -> Flow {
    state.v[x] = state.delay_timer;
    Flow::Next
}

/// await keypress for Vx
/// Holds the pc in place until some key is down; the highest pressed key wins.
pub fn keyd(state: &mut State, x: usize, keys: &[bool; 16]) -> Flow {
    match keys.iter().rposition(|&pressed| pressed) {
        Some(key) => {
            state.v[x] = key as u8;
            Flow::Next
        }
        None => Flow::Wait,
    }
}

/// DT = Vx
pub fn loads(state: &mut State, x: usize) -> Flow {
    state.delay_timer = state.v[x];
    Flow::Next
}

/// ST = Vx
pub fn ld(state: &mut State, x: usize) -> Flow {
    state.sound_timer = state.v[x];
    Flow::Next
}

/// I += Vx
pub fn addi(state: &mut State, x: usize) -> Flow {
    state.i = state.i.wrapping_add(u16::from(state.v[x]));
    Flow::Next
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: usize) -> Flow {
    state.i = SPRITE_SHEET_ADDRESS + u16::from(state.v[x]) * SPRITE_HEIGHT;
    Flow::Next
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: usize) -> Result<Flow, Error> {
    let digits = [state.v[x] / 100, state.v[x] / 10 % 10, state.v[x] % 10];
    let span = state.span(state.i, digits.len())?;
    state.memory[span].copy_from_slice(&digits);
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(state: &mut State, x: usize) -> Result<Flow, Error> {
    let span = state.span(state.i, x + 1)?;
    state.memory[span].copy_from_slice(&state.v[..=x]);
    state.i = state.i.wrapping_add(x as u16 + 1);
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(state: &mut State, x: usize) -> Result<Flow, Error> {
    let span = state.span(state.i, x + 1)?;
    state.v[..=x].copy_from_slice(&state.memory[span]);
    state.i = state.i.wrapping_add(x as u16 + 1);
    Ok(Flow::Next)
}
