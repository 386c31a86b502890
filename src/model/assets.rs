//! Bundled resources addressed by logical name.
use std::io;

/// Logical name of the default model shipped with the crate.
pub const DEFAULT_MODEL_ASSET: &str = "data/default_model.json";

const DEFAULT_MODEL_BYTES: &[u8] = include_bytes!("../../assets/default_model.json");

/// Read-only resource loader.
pub trait AssetSource: Send + Sync {
    fn load(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Resources compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct BundledAssets;

impl AssetSource for BundledAssets {
    fn load(&self, name: &str) -> io::Result<Vec<u8>> {
        match name {
            DEFAULT_MODEL_ASSET => Ok(DEFAULT_MODEL_BYTES.to_vec()),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no bundled asset named {name}"),
            )),
        }
    }
}
