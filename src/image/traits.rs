/// Row access shared by the borrowed u8 view and the owned f32 buffer.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Rows top to bottom, each exactly `width()` long.
    fn rows(&self) -> impl Iterator<Item = &[Self::Pixel]> + '_ {
        (0..self.height()).map(move |y| self.row(y))
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
