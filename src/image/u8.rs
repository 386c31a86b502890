use super::f32::ImageF32;
use super::traits::ImageView;

/// Borrowed 8-bit grayscale view; `stride` is the byte distance between rows.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl ImageU8<'_> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Scale to `[0, 1]` floats, dropping any row padding.
    pub fn to_f32(&self) -> ImageF32 {
        let data = self
            .rows()
            .flat_map(|row| row.iter().map(|&px| f32::from(px) / 255.0))
            .collect();
        ImageF32 {
            w: self.w,
            h: self.h,
            data,
        }
    }
}

impl ImageView for ImageU8<'_> {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
