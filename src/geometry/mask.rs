use glam::IVec2;

use super::Rect;

/// Alpha values at or above this threshold count as opaque.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 127;

const WORD_BITS: u32 = u64::BITS;

/// A per-pixel opacity bitmap, one bit per pixel, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Creates a fully transparent mask.
    pub fn empty(width: u32, height: u32) -> Self {
        let words_per_row = width.div_ceil(WORD_BITS) as usize;
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Creates a fully opaque mask.
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Builds a mask by asking `opaque` about every pixel.
    pub fn from_fn(width: u32, height: u32, mut opaque: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Builds a mask from a row-major alpha channel (one byte per pixel).
    ///
    /// Returns `None` if `alpha` does not hold exactly `width * height` values.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Option<Self> {
        if alpha.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self::from_fn(width, height, |x, y| {
            alpha[(y * width + x) as usize] >= threshold
        }))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Whether the pixel at `(x, y)` is opaque. Out-of-bounds pixels are transparent.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        let (word, bit) = self.index(x as u32, y as u32);
        self.bits[word] & (1 << bit) != 0
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (word, bit) = self.index(x, y);
        if opaque {
            self.bits[word] |= 1 << bit;
        } else {
            self.bits[word] &= !(1 << bit);
        }
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|word| word.count_ones()).sum()
    }

    /// The mask mirrored left-to-right, used when a sprite faces the other way.
    pub fn mirrored(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| self.get((self.width - 1 - x) as i32, y as i32))
    }

    /// Tests whether any opaque pixel of `self` inside `region` is also opaque in `other`.
    ///
    /// `region` is in this mask's coordinates; `offset` is the position of `other` relative to `self`.
    pub fn overlaps_region(&self, other: &Mask, offset: IVec2, region: Rect) -> bool {
        let Some(region) = region.intersection(&self.bounds()) else {
            return false;
        };

        for y in region.top()..region.bottom() {
            for x in region.left()..region.right() {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }

    fn index(&self, x: u32, y: u32) -> (usize, u32) {
        let word = y as usize * self.words_per_row + (x / WORD_BITS) as usize;
        (word, x % WORD_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_count() {
        assert_eq!(Mask::filled(70, 3).count(), 210);
    }

    #[test]
    fn test_out_of_bounds_is_transparent() {
        let mask = Mask::filled(2, 2);
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(2, 1));
    }
}
