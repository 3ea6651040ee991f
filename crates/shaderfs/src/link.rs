//! The reconciliation pipeline: reads shader definitions and texture trees
//! from the underlying file system and links them into one virtual namespace
//! of `Quake3Shader` entries.
//!
//! Three phases run in strict order inside `read_directory`:
//!
//! 1. `load_shaders` parses every `.shader` file directly under the shader
//!    search root into the pending set, tolerating malformed files.
//! 2. `link_textures` walks the texture search roots; each texture either
//!    claims its matching pending shader or gets an implicit shader
//!    synthesized for it. The unclaimed remainder is returned by value.
//! 3. `link_standalone` registers every leftover definition as-is; a
//!    definition with no backing texture is still a valid shader.
//!
//! The namespace is built privately and only returned on full success, so
//! callers never observe a partially linked state.
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fs::{FileSystem, FsError, PathInfo, PathMatcher, TraversalMode};
use crate::namespace::Namespace;
use crate::parser;
use crate::shader::Quake3Shader;

/// Extension of shader definition files, searched non-recursively.
pub const SHADER_EXTENSIONS: &[&str] = &["shader"];

/// Image extensions recognized as textures, searched recursively.
pub const IMAGE_EXTENSIONS: &[&str] = &["tga", "png", "jpg", "jpeg"];

/// Read-only virtual file system layering linked shaders over an asset tree.
/// Search roots are fixed at construction.
pub struct ShaderFileSystem<F> {
    fs: F,
    shader_search_path: PathBuf,
    texture_search_paths: Vec<PathBuf>,
}

impl<F: FileSystem> ShaderFileSystem<F> {
    pub fn new(
        fs: F,
        shader_search_path: impl Into<PathBuf>,
        texture_search_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            fs,
            shader_search_path: shader_search_path.into(),
            texture_search_paths,
        }
    }

    /// Runs the full pipeline and returns the linked namespace. Any hard
    /// error leaves no partial state visible to the caller.
    pub fn read_directory(&self) -> Result<Namespace<Quake3Shader>, FsError> {
        let mut namespace = Namespace::new();
        let shaders = self.load_shaders()?;
        info!("linking shaders");
        let remainder = self.link_textures(&mut namespace, shaders)?;
        self.link_standalone(&mut namespace, remainder);
        Ok(namespace)
    }

    /// Parses every definition file directly under the shader search root.
    /// A missing root means nothing to load. A file that fails to parse is
    /// skipped with a warning; listing and read failures are hard errors.
    fn load_shaders(&self) -> Result<Vec<Quake3Shader>, FsError> {
        if self.fs.path_info(&self.shader_search_path) != PathInfo::Directory {
            debug!(
                root = %self.shader_search_path.display(),
                "shader search root is not a directory, nothing to load"
            );
            return Ok(Vec::new());
        }

        let matcher = PathMatcher::extensions(SHADER_EXTENSIONS);
        let paths = self
            .fs
            .find(&self.shader_search_path, TraversalMode::Flat, &matcher)?;

        let mut shaders = Vec::new();
        let mut seen = BTreeSet::new();
        for path in paths {
            let text = self.fs.read_file(&path)?;
            match parser::parse(&text) {
                Ok(parsed) => {
                    for shader in parsed {
                        if seen.contains(&shader.shader_path) {
                            warn!(
                                file = %path.display(),
                                shader = %shader.shader_path.display(),
                                "duplicate shader definition, keeping the first"
                            );
                            continue;
                        }
                        seen.insert(shader.shader_path.clone());
                        shaders.push(shader);
                    }
                }
                Err(err) => {
                    warn!(
                        file = %path.display(),
                        error = %err,
                        "skipping malformed shader file"
                    );
                }
            }
        }

        info!(count = shaders.len(), "loaded shaders");
        Ok(shaders)
    }

    /// Links every discovered texture against the pending shader set, taking
    /// the set by value and returning the unclaimed remainder. Textures whose
    /// stripped path already resolves to a real file are left alone.
    fn link_textures(
        &self,
        namespace: &mut Namespace<Quake3Shader>,
        mut shaders: Vec<Quake3Shader>,
    ) -> Result<Vec<Quake3Shader>, FsError> {
        debug!("linking textures");
        for texture in self.find_textures()? {
            let shader_path = texture.with_extension("");

            // A real file at the stripped path wins over anything virtual.
            if self.fs.path_info(&shader_path) == PathInfo::File {
                continue;
            }

            let matched = shaders
                .iter()
                .position(|shader| shader.shader_path == shader_path);
            let shader = match matched {
                // Claim the matching definition so the standalone phase
                // does not see it again.
                Some(index) => Arc::new(shaders.remove(index)),
                None => Arc::new(Quake3Shader::for_texture(shader_path.clone(), texture)),
            };
            namespace.add_file(shader_path, move || Arc::clone(&shader));
        }
        Ok(shaders)
    }

    /// Flattened texture discovery across all search roots, in root order.
    /// Missing roots are skipped; a failing existing root is a hard error.
    fn find_textures(&self) -> Result<Vec<PathBuf>, FsError> {
        let matcher = PathMatcher::extensions(IMAGE_EXTENSIONS);
        let mut textures = Vec::new();
        for root in &self.texture_search_paths {
            if self.fs.path_info(root) != PathInfo::Directory {
                debug!(root = %root.display(), "texture search root missing, skipping");
                continue;
            }
            textures.extend(
                self.fs
                    .find(root, TraversalMode::Recursive, &matcher)?,
            );
        }
        Ok(textures)
    }

    /// Registers every definition left unclaimed by texture linking. No
    /// existence check here: a definition without a texture is intentional.
    fn link_standalone(
        &self,
        namespace: &mut Namespace<Quake3Shader>,
        shaders: Vec<Quake3Shader>,
    ) {
        debug!(count = shaders.len(), "linking standalone shaders");
        for shader in shaders {
            let path = shader.shader_path.clone();
            let shader = Arc::new(shader);
            namespace.add_file(path, move || Arc::clone(&shader));
        }
    }
}
