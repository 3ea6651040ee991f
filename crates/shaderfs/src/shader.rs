//! Data model for one shading rule, keyed by its logical shader path.
//! Explicit shaders come out of the definition parser; implicit shaders are
//! synthesized by the linker for textures with no matching definition.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quake3Shader {
    pub shader_path: PathBuf,
    pub editor_image: Option<PathBuf>,
    pub light_image: Option<PathBuf>,
    pub culling: Culling,
    pub surface_parms: BTreeSet<String>,
    pub stages: Vec<ShaderStage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Culling {
    #[default]
    Front,
    Back,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ShaderStage {
    pub map: Option<StageMap>,
    pub blend_func: Option<BlendFunc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageMap {
    Path(PathBuf),
    Lightmap,
    Whiteimage,
}

/// Source and destination blend factors, stored as the GL factor names used
/// in shader scripts (`GL_ONE`, `GL_SRC_ALPHA`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlendFunc {
    pub src: String,
    pub dest: String,
}

impl BlendFunc {
    pub fn new(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }
}

impl Quake3Shader {
    pub fn new(shader_path: PathBuf) -> Self {
        Self {
            shader_path,
            editor_image: None,
            light_image: None,
            culling: Culling::default(),
            surface_parms: BTreeSet::new(),
            stages: Vec::new(),
        }
    }

    /// Builds the implicit shader for a texture with no matching definition.
    /// Its attributes derive solely from the texture path.
    pub fn for_texture(shader_path: PathBuf, image: PathBuf) -> Self {
        let mut shader = Self::new(shader_path);
        shader.editor_image = Some(image);
        shader
    }

    /// The image this shader resolves to for display purposes: the editor
    /// image if declared, otherwise the first stage with a texture map,
    /// otherwise the light image.
    pub fn image(&self) -> Option<&Path> {
        if let Some(image) = &self.editor_image {
            return Some(image);
        }
        for stage in &self.stages {
            if let Some(StageMap::Path(path)) = &stage.map {
                return Some(path);
            }
        }
        self.light_image.as_deref()
    }
}
