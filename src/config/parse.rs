//! Configuration for the `sudoku_parse` tool.
use super::{config_dir, read_json, resolve};
use crate::error::Result;
use crate::model::ModelSource;
use crate::parser::ParserParams;
use crate::puzzle::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParseOutputConfig {
    /// Full parse report (quad, homography, candidates, timings).
    pub json_out: Option<PathBuf>,
    /// Rectified grid dump for inspection.
    pub rectified_png: Option<PathBuf>,
    pub render: RenderOptions,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParseConfig {
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub model: ModelSource,
    #[serde(default)]
    pub params: ParserParams,
    #[serde(default)]
    pub output: ParseOutputConfig,
}

pub fn load_parse_config(path: &Path) -> Result<ParseConfig> {
    let mut config: ParseConfig = read_json(path)?;
    let base = config_dir(path);
    for input in config.inputs.iter_mut() {
        *input = resolve(&base, input);
    }
    match &mut config.model {
        ModelSource::File { path: file } => *file = resolve(&base, file),
        ModelSource::Cache { dir } => *dir = resolve(&base, dir),
        ModelSource::Bundled => {}
    }
    if let Some(p) = config.output.json_out.as_mut() {
        *p = resolve(&base, p);
    }
    if let Some(p) = config.output.rectified_png.as_mut() {
        *p = resolve(&base, p);
    }
    Ok(config)
}
