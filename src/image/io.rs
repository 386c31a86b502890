//! Decoding from bytes or disk, plus PNG and JSON writers for the tools.
use super::{ImageF32, ImageU8};
use crate::error::{Result, SudokuError};
use image::{DynamicImage, GrayImage, ImageDecoder, ImageError, ImageFormat, ImageReader, Luma};
use serde::Serialize;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

/// Owned, tightly packed 8-bit grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImageU8(GrayImage);

impl GrayImageU8 {
    /// Panics when `data` does not hold exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        match GrayImage::from_raw(width as u32, height as u32, data) {
            Some(img) if img.len() == width * height => Self(img),
            _ => panic!("gray buffer does not match {width}x{height}"),
        }
    }

    /// Round `[0, 1]` intensities to bytes.
    pub fn from_f32(image: &ImageF32) -> Self {
        Self(GrayImage::from_fn(image.w as u32, image.h as u32, |x, y| {
            let v = image.get(x as usize, y as usize);
            Luma([(v * 255.0).round().clamp(0.0, 255.0) as u8])
        }))
    }

    pub fn width(&self) -> usize {
        self.0.width() as usize
    }

    pub fn height(&self) -> usize {
        self.0.height() as usize
    }

    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width(),
            h: self.height(),
            stride: self.width(),
            data: self.0.as_raw(),
        }
    }
}

/// Decode PNG, JPEG or any other format the `image` crate knows to gray,
/// upright according to the EXIF orientation tag when there is one.
pub fn decode_grayscale(bytes: &[u8]) -> Result<GrayImageU8> {
    if bytes.is_empty() {
        return Err(SudokuError::decode("input buffer is empty"));
    }
    let format = image::guess_format(bytes)
        .map_err(|e| SudokuError::decode(format!("unrecognised image format: {e}")))?;
    let invalid = |e: ImageError| SudokuError::decode(format!("{format:?} payload is invalid: {e}"));
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .map_err(invalid)?;
    let orientation = decoder.orientation().map_err(invalid)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(invalid)?;
    img.apply_orientation(orientation);
    let gray = img.into_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return Err(SudokuError::decode("image has zero area"));
    }
    Ok(GrayImageU8(gray))
}

/// Read an image file from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8> {
    let bytes = fs::read(path).map_err(|source| SudokuError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_grayscale(&bytes)
}

pub fn encode_png(buffer: &GrayImageU8) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    buffer
        .0
        .write_to(&mut out, ImageFormat::Png)
        .map_err(encode_failure)?;
    Ok(out.into_inner())
}

fn encode_failure(e: ImageError) -> SudokuError {
    SudokuError::Encode {
        reason: format!("PNG: {e}"),
    }
}

/// Dump a float image as PNG, creating parent directories.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<()> {
    create_parent(path)?;
    GrayImageU8::from_f32(image)
        .0
        .save(path)
        .map_err(|e| match e {
            ImageError::IoError(source) => SudokuError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => encode_failure(other),
        })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    create_parent(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| io_error(path, e))?;
    fs::write(path, json).map_err(|source| SudokuError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn io_error(path: &Path, err: impl std::fmt::Display) -> SudokuError {
    SudokuError::Io {
        path: path.to_path_buf(),
        source: io::Error::other(err.to_string()),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| SudokuError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
