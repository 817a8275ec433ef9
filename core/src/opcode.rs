/// # Opcodes
///
/// Every instruction is one big-endian 16-bit word. The high nibble picks the family; the
/// families that hold several instructions (0, 8, E, F) pick within themselves by the low
/// nibble or the low byte.
///
/// The remaining nibbles are operands:
/// - `[_nnn]` a 12-bit address
/// - `[__kk]` a byte that is assigned to and/or compared with Vx
/// - `[_x__]` the register Vx, or the last register of the range V0..=Vx
/// - `[__y_]` the register Vy
/// - `[___n]` the height of a sprite
pub trait Opcode {
    /// The instruction family, `[f___]`
    fn family(&self) -> u8;

    /// Returns the Opcode's component nibbles as `(family, x, y, n)`.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// Register index `[_x__]`
    fn x(&self) -> u8;

    /// Register index `[__y_]`
    fn y(&self) -> u8;

    /// 4-bit immediate `[___n]`
    fn n(&self) -> u8;

    /// 8-bit immediate `[__kk]`
    fn kk(&self) -> u8;

    /// 12-bit address `[_nnn]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn family(&self) -> u8 {
        (self >> 12) as u8
    }

    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self >> 8) & 0xF) as u8
    }

    fn y(&self) -> u8 {
        ((self >> 4) & 0xF) as u8
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0xFF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Combines two bytes of memory into a big-endian opcode
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from(high) << 8 | u16::from(low)
}
