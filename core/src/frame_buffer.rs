use std::fmt;

use crate::config::SpriteEdges;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_SIZE, DISPLAY_WIDTH};

/// # FrameBuffer
/// The contents of the next frame to be drawn.
///
/// 64x32 cells stored row-major, each either 0 (off) or 1 (on). A cell can be addressed linearly
/// (`row * 64 + col`) or by `(row, col)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer {
    cells: [u8; DISPLAY_SIZE],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: [0; DISPLAY_SIZE],
        }
    }

    /// The cell at `row`, `col` if it is on the display
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < DISPLAY_HEIGHT && col < DISPLAY_WIDTH {
            self.cell(row * DISPLAY_WIDTH + col)
        } else {
            None
        }
    }

    /// The cell at a linear `index` into the display
    pub fn cell(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied()
    }

    /// Every cell, row after row
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Iterates over the display one row of 64 cells at a time
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(DISPLAY_WIDTH)
    }

    pub fn clear(&mut self) {
        self.cells = [0; DISPLAY_SIZE];
    }

    /// XORs a sprite onto the display with its top left corner at `x`, `y`.
    ///
    /// Each byte of `sprite` is one row of 8 pixels, most significant bit leftmost. Returns true
    /// if any pixel that was on got switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8], edges: SpriteEdges) -> bool {
        let left = x as usize % DISPLAY_WIDTH;
        let top = y as usize % DISPLAY_HEIGHT;
        let mut collision = false;

        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if (byte >> (7 - bit)) & 0x1 == 0 {
                    continue;
                }
                let (x, y) = (left + bit, top + row);
                let index = match edges {
                    SpriteEdges::Wrap => (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + x % DISPLAY_WIDTH,
                    SpriteEdges::Clip if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT => {
                        y * DISPLAY_WIDTH + x
                    }
                    SpriteEdges::Clip => continue,
                };
                collision |= self.cells[index] == 0x1;
                self.cells[index] ^= 0x1;
            }
        }

        collision
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders lit cells as `#` so failed assertions show the picture
impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|&cell| if cell == 0 { '.' } else { '#' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
