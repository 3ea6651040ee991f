use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shaderls",
    author,
    version,
    about = "Lists the virtual shader namespace linked from a Quake 3 asset tree"
)]
pub struct Cli {
    /// Asset tree to mount (the directory holding `scripts/`, `textures/`, ...).
    #[arg(value_name = "DIR")]
    pub mount: PathBuf,

    /// Directory under the mount searched for `.shader` files (non-recursive).
    #[arg(long, value_name = "DIR", default_value = "scripts")]
    pub shader_dir: PathBuf,

    /// Directory under the mount searched recursively for textures; repeatable.
    #[arg(long = "texture-dir", value_name = "DIR", default_value = "textures")]
    pub texture_dirs: Vec<PathBuf>,

    /// TOML layout file overriding --shader-dir and --texture-dir.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit the materialized shaders as a JSON array.
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
