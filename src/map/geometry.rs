use crate::braille::BrailleCanvas;

/// Draw a line with Bresenham's algorithm.
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a filled disc (single news markers).
pub fn draw_disc(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Draw a circle outline with the midpoint algorithm (cluster rings).
pub fn draw_ring(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    if radius <= 0 {
        canvas.set_pixel_signed(cx, cy);
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ] {
            canvas.set_pixel_signed(px, py);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_fills_a_row() {
        let mut canvas = BrailleCanvas::new(2, 1);
        draw_line(&mut canvas, 0, 0, 3, 0);
        // Both top dots in both cells: 0x01|0x08 = 0x09
        assert_eq!(canvas.to_string(), "\u{2809}\u{2809}");
    }

    #[test]
    fn single_point_line() {
        let mut canvas = BrailleCanvas::new(1, 1);
        draw_line(&mut canvas, 1, 1, 1, 1);
        assert_eq!(canvas.to_string(), "\u{2810}");
    }

    #[test]
    fn ring_leaves_center_empty() {
        let mut canvas = BrailleCanvas::new(4, 2);
        draw_ring(&mut canvas, 4, 4, 3);
        let outline_only = canvas.to_string();
        // Setting the center afterwards must change the raster, i.e. the
        // ring itself left it empty
        canvas.set_pixel(4, 4);
        assert_ne!(canvas.to_string(), outline_only);
    }

    #[test]
    fn disc_covers_center() {
        let mut canvas = BrailleCanvas::new(2, 1);
        draw_disc(&mut canvas, 1, 1, 1);
        assert!(canvas.to_string().contains(|c| c != '\u{2800}'));
    }
}
