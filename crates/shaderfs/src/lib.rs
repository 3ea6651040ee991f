mod fs;
mod link;
mod namespace;
mod parser;
mod shader;

pub use fs::{DiskFileSystem, FileSystem, FsError, PathInfo, PathMatcher, TraversalMode};
pub use link::{ShaderFileSystem, IMAGE_EXTENSIONS, SHADER_EXTENSIONS};
pub use namespace::Namespace;
pub use parser::{parse, ParseError};
pub use shader::{BlendFunc, Culling, Quake3Shader, ShaderStage, StageMap};
