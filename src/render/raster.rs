//! Pixel buffer helpers shared by the workers and the test backends

use crate::viewer::Rotation;

/// Rotate a packed RGB buffer clockwise by `rotation`.
///
/// Returns the new buffer with its width and height.
#[must_use]
pub fn rotate_rgb(pixels: &[u8], width: u32, height: u32, rotation: Rotation) -> (Vec<u8>, u32, u32) {
    let w = width as usize;
    let h = height as usize;
    if rotation == Rotation::NONE || w == 0 || h == 0 {
        return (pixels.to_vec(), width, height);
    }

    let mut out = vec![0u8; w * h * 3];
    let (out_w, out_h) = if rotation.swaps_axes() { (h, w) } else { (w, h) };

    for y in 0..h {
        for x in 0..w {
            let (nx, ny) = match rotation.quarter_turns() {
                1 => (h - 1 - y, x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (y, w - 1 - x),
            };
            let src = (y * w + x) * 3;
            let dst = (ny * out_w + nx) * 3;
            out[dst..dst + 3].copy_from_slice(&pixels[src..src + 3]);
        }
    }

    (out, out_w as u32, out_h as u32)
}

/// Solid-colour RGB buffer
#[must_use]
pub fn solid_rgb(width: u32, height: u32, rgb: (u8, u8, u8)) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for _ in 0..(width as usize) * (height as usize) {
        pixels.extend_from_slice(&[rgb.0, rgb.1, rgb.2]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x1 image: red, green
    fn strip() -> Vec<u8> {
        vec![255, 0, 0, 0, 255, 0]
    }

    #[test]
    fn quarter_turn_makes_strip_vertical() {
        let (out, w, h) = rotate_rgb(&strip(), 2, 1, Rotation::NONE.clockwise());
        assert_eq!((w, h), (1, 2));
        assert_eq!(out, vec![255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn half_turn_reverses_strip() {
        let half = Rotation::NONE.clockwise().clockwise();
        let (out, w, h) = rotate_rgb(&strip(), 2, 1, half);
        assert_eq!((w, h), (2, 1));
        assert_eq!(out, vec![0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn three_quarter_turn_puts_last_pixel_on_top() {
        let r = Rotation::from_degrees(270).unwrap();
        let (out, w, h) = rotate_rgb(&strip(), 2, 1, r);
        assert_eq!((w, h), (1, 2));
        assert_eq!(out, vec![0, 255, 0, 255, 0, 0]);
    }

    #[test]
    fn solid_fill_has_expected_length() {
        assert_eq!(solid_rgb(3, 2, (1, 2, 3)).len(), 18);
    }
}
