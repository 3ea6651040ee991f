//! Optional TOML layout file describing where an asset tree keeps its shader
//! scripts and textures, for games that deviate from the stock Quake 3
//! directory names.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout file {}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse layout file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("layout must name at least one texture directory")]
    NoTextureDirs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceLayout {
    #[serde(default = "default_shader_dir")]
    pub shader_dir: PathBuf,
    #[serde(default = "default_texture_dirs")]
    pub texture_dirs: Vec<PathBuf>,
}

fn default_shader_dir() -> PathBuf {
    PathBuf::from("scripts")
}

fn default_texture_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("textures")]
}

impl SourceLayout {
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| LayoutError::Io(path.to_path_buf(), source))?;
        let layout: SourceLayout = toml::from_str(&raw)?;
        if layout.texture_dirs.is_empty() {
            return Err(LayoutError::NoTextureDirs);
        }
        Ok(layout)
    }
}
