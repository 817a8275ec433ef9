use crate::error::Error;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::{Flow, State};

/// The `0nnn` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemOp {
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `0nnn`, a routine in the host's machine code
    Machine(u16),
}

/// The `8xyn` family, selected by `n`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Load,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubNeg,
    ShiftLeft,
}

/// The `Exkk` family, selected by `kk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    SkipPressed,
    SkipReleased,
}

/// The `Fxkk` family, selected by `kk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    GetDelay,
    WaitKey,
    SetDelay,
    SetSound,
    AddIndex,
    Glyph,
    Bcd,
    Store,
    Read,
}

/// A decoded opcode.
///
/// Families whose low nibbles pick between several operations carry an inner op. Register
/// operands are indices into V0..VF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    System(SystemOp),
    Jump(u16),
    Call(u16),
    SkipEqualByte(usize, u8),
    SkipNotEqualByte(usize, u8),
    SkipEqual(usize, usize),
    LoadByte(usize, u8),
    AddByte(usize, u8),
    Alu(AluOp, usize, usize),
    SkipNotEqual(usize, usize),
    LoadIndex(u16),
    JumpOffset(u16),
    Random(usize, u8),
    Draw(usize, usize, u8),
    Key(KeyOp, usize),
    Misc(MiscOp, usize),
}

impl AluOp {
    fn from_nibble(n: u8) -> Option<Self> {
        match n {
            0x0 => Some(AluOp::Load),
            0x1 => Some(AluOp::Or),
            0x2 => Some(AluOp::And),
            0x3 => Some(AluOp::Xor),
            0x4 => Some(AluOp::Add),
            0x5 => Some(AluOp::Sub),
            0x6 => Some(AluOp::ShiftRight),
            0x7 => Some(AluOp::SubNeg),
            0xE => Some(AluOp::ShiftLeft),
            _ => None,
        }
    }
}

impl KeyOp {
    fn from_byte(kk: u8) -> Option<Self> {
        match kk {
            0x9E => Some(KeyOp::SkipPressed),
            0xA1 => Some(KeyOp::SkipReleased),
            _ => None,
        }
    }
}

impl MiscOp {
    fn from_byte(kk: u8) -> Option<Self> {
        match kk {
            0x07 => Some(MiscOp::GetDelay),
            0x0A => Some(MiscOp::WaitKey),
            0x15 => Some(MiscOp::SetDelay),
            0x18 => Some(MiscOp::SetSound),
            0x1E => Some(MiscOp::AddIndex),
            0x29 => Some(MiscOp::Glyph),
            0x33 => Some(MiscOp::Bcd),
            0x55 => Some(MiscOp::Store),
            0x65 => Some(MiscOp::Read),
            _ => None,
        }
    }
}

/// Selects the correct Instruction for a given Opcode
/// Returns None for encodings that don't name any instruction.
pub fn decode(op: u16) -> Option<Instruction> {
    use Instruction::*;

    let (x, y) = (op.x() as usize, op.y() as usize);
    let instruction = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => System(SystemOp::Clear),
        (0x0, 0x0, 0xE, 0xE) => System(SystemOp::Return),
        // zeroed memory rather than a routine at 0x000
        (0x0, 0x0, 0x0, 0x0) => return None,
        (0x0, ..) => System(SystemOp::Machine(op.addr())),
        (0x1, ..) => Jump(op.addr()),
        (0x2, ..) => Call(op.addr()),
        (0x3, ..) => SkipEqualByte(x, op.kk()),
        (0x4, ..) => SkipNotEqualByte(x, op.kk()),
        (0x5, .., 0x0) => SkipEqual(x, y),
        (0x6, ..) => LoadByte(x, op.kk()),
        (0x7, ..) => AddByte(x, op.kk()),
        (0x8, .., n) => Alu(AluOp::from_nibble(n)?, x, y),
        (0x9, .., 0x0) => SkipNotEqual(x, y),
        (0xA, ..) => LoadIndex(op.addr()),
        (0xB, ..) => JumpOffset(op.addr()),
        (0xC, ..) => Random(x, op.kk()),
        (0xD, ..) => Draw(x, y, op.n()),
        (0xE, ..) => Key(KeyOp::from_byte(op.kk())?, x),
        (0xF, ..) => Misc(MiscOp::from_byte(op.kk())?, x),
        _ => return None,
    };
    Some(instruction)
}

impl Instruction {
    /// Applies the instruction to `state` and reports how the pc should move afterwards
    pub fn execute(self, state: &mut State, context: &mut Context) -> Result<Flow, Error> {
        let quirks = context.quirks;
        let flow = match self {
            Instruction::System(SystemOp::Clear) => cls(state),
            Instruction::System(SystemOp::Return) => rts(state)?,
            Instruction::System(SystemOp::Machine(addr)) => sys(state, addr),
            Instruction::Jump(addr) => jump(addr),
            Instruction::Call(addr) => call(state, addr)?,
            Instruction::SkipEqualByte(x, kk) => ske(state, x, kk),
            Instruction::SkipNotEqualByte(x, kk) => skne(state, x, kk),
            Instruction::SkipEqual(x, y) => skre(state, x, y),
            Instruction::LoadByte(x, kk) => load(state, x, kk),
            Instruction::AddByte(x, kk) => add(state, x, kk),
            Instruction::Alu(op, x, y) => match op {
                AluOp::Load => mv(state, x, y),
                AluOp::Or => or(state, x, y),
                AluOp::And => and(state, x, y),
                AluOp::Xor => xor(state, x, y),
                AluOp::Add => addr(state, x, y),
                AluOp::Sub => sub(state, x, y, quirks.borrow),
                AluOp::ShiftRight => shr(state, x, y, quirks.shift),
                AluOp::SubNeg => subn(state, x, y, quirks.borrow),
                AluOp::ShiftLeft => shl(state, x, y, quirks.shift),
            },
            Instruction::SkipNotEqual(x, y) => skrne(state, x, y),
            Instruction::LoadIndex(addr) => loadi(state, addr),
            Instruction::JumpOffset(addr) => jumpi(state, addr),
            Instruction::Random(x, kk) => rand(state, x, kk, &mut *context.rng),
            Instruction::Draw(x, y, n) => draw(state, x, y, n, quirks.sprites)?,
            Instruction::Key(op, x) => match op {
                KeyOp::SkipPressed => skpr(state, x, context.keys),
                KeyOp::SkipReleased => skup(state, x, context.keys),
            },
            Instruction::Misc(op, x) => match op {
                MiscOp::GetDelay => moved(state, x),
                MiscOp::WaitKey => keyd(state, x, context.keys),
                MiscOp::SetDelay => loads(state, x),
                MiscOp::SetSound => ld(state, x),
                MiscOp::AddIndex => addi(state, x),
                MiscOp::Glyph => ldspr(state, x),
                MiscOp::Bcd => bcd(state, x)?,
                MiscOp::Store => stor(state, x)?,
                MiscOp::Read => read(state, x)?,
            },
        };
        Ok(flow)
    }
}
