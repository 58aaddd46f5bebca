/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell is a 2x4 dot grid, so a canvas of `width` x `height`
/// characters exposes `width*2` x `height*4` addressable pixels.
/// Dot patterns live in U+2800..=U+28FF.
pub struct BrailleCanvas {
    width: usize,
    height: usize,
    /// One dot bitmask per character cell, row-major.
    cells: Vec<u8>,
}

/// Dot bit for a pixel within its cell. Braille dot layout:
/// ```text
/// (0,0) (1,0)   0x01 0x08
/// (0,1) (1,1)   0x02 0x10
/// (0,2) (1,2)   0x04 0x20
/// (0,3) (1,3)   0x40 0x80
/// ```
#[inline(always)]
fn dot_bit(x: usize, y: usize) -> u8 {
    const COL0: [u8; 4] = [0x01, 0x02, 0x04, 0x40];
    const COL1: [u8; 4] = [0x08, 0x10, 0x20, 0x80];
    if x % 2 == 0 {
        COL0[y % 4]
    } else {
        COL1[y % 4]
    }
}

impl BrailleCanvas {
    /// Create a blank canvas with the given character dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    /// Set the pixel at (x, y). Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= dot_bit(x, y);
    }

    /// Set a pixel from signed coordinates; negative values are ignored.
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Render one character row (for line-by-line widget drawing).
    pub fn row_to_string(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|&bits| char::from_u32(0x2800 + bits as u32).unwrap_or(' '))
            .collect()
    }

    /// Iterate all character rows as strings.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|row| self.row_to_string(row))
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.rows().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dot() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "\u{2801}");
    }

    #[test]
    fn full_cell() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "\u{28FF}");
    }

    #[test]
    fn out_of_bounds_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(100, 100);
        canvas.set_pixel_signed(-1, 3);
        assert_eq!(canvas.to_string(), "\u{2800}\u{2800}\n\u{2800}\u{2800}");
    }

    #[test]
    fn diagonal_spans_cells() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0, 0);
        canvas.set_pixel(1, 1);
        canvas.set_pixel(2, 2);
        canvas.set_pixel(3, 3);
        // First cell: 0x01 | 0x10, second cell: 0x04 | 0x80
        assert_eq!(canvas.to_string(), "\u{2811}\u{2884}");
    }
}
