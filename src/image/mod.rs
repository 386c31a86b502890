//! Grayscale image containers used throughout the pipeline.
//!
//! - [`ImageU8`]: borrowed 8-bit view with an explicit stride (decoder output).
//! - [`ImageF32`]: owned float buffer in [0, 1] used by every numeric stage.
//! - [`io`]: decoding from bytes or disk, PNG/JSON writers for tooling.
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::io::GrayImageU8;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
