use crate::constants::{DISPLAY_SIZE, DISPLAY_WIDTH};

/// # Display buffer
/// The Chip-8 display is composed of 64x32 black/white pixels, stored row-major as a flat
/// array of 2048 cells. It only ever changes through `clear` and `blit`.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    cells: [bool; DISPLAY_SIZE],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            cells: [false; DISPLAY_SIZE],
        }
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Whether the pixel at `(x, y)` is lit; coordinates wrap like sprite drawing does
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.cells[FrameBuffer::index(x, y)]
    }

    /// Rows of the buffer, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(DISPLAY_WIDTH)
    }

    pub fn clear(&mut self) {
        self.cells = [false; DISPLAY_SIZE];
    }

    /// XORs `sprite` onto the buffer with its top left corner at `(x, y)`.
    ///
    /// Each byte is one 8 pixel row, most significant bit leftmost. The linear index of every
    /// touched cell wraps around the end of the buffer.
    /// Returns true if any lit pixel was turned off.
    pub fn blit(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let cell = &mut self.cells[FrameBuffer::index(x + bit, y + row)];
                collision |= *cell;
                *cell ^= true;
            }
        }
        collision
    }

    fn index(x: usize, y: usize) -> usize {
        (y * DISPLAY_WIDTH + x) % DISPLAY_SIZE
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    /// One line per row, `#` for lit pixels
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&lit| if lit { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
