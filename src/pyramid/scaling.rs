//! Coordinate transfer from a pyramid level back to the full image.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelScaling {
    pub sx: f32,
    pub sy: f32,
}

impl LevelScaling {
    pub fn identity() -> Self {
        Self { sx: 1.0, sy: 1.0 }
    }

    pub fn from_dimensions(level_w: usize, level_h: usize, full_w: usize, full_h: usize) -> Self {
        if level_w == 0 || level_h == 0 {
            return Self::identity();
        }
        Self {
            sx: full_w as f32 / level_w as f32,
            sy: full_h as f32 / level_h as f32,
        }
    }

    /// Map a pixel-centre coordinate on the level to the matching full
    /// resolution coordinate.
    #[inline]
    pub fn to_full(&self, p: [f32; 2]) -> [f32; 2] {
        [
            (p[0] + 0.5) * self.sx - 0.5,
            (p[1] + 0.5) * self.sy - 0.5,
        ]
    }
}
