mod cli;
mod config;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use config::SourceLayout;
use shaderfs::{DiskFileSystem, ShaderFileSystem};

fn main() -> Result<()> {
    let cli = cli::parse();
    initialise_tracing();
    run(cli)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: cli::Cli) -> Result<()> {
    let layout = match &cli.config {
        Some(path) => SourceLayout::load(path)
            .with_context(|| format!("failed to load layout file {}", path.display()))?,
        None => SourceLayout {
            shader_dir: cli.shader_dir.clone(),
            texture_dirs: cli.texture_dirs.clone(),
        },
    };

    let fs = DiskFileSystem::new(&cli.mount);
    let shader_fs = ShaderFileSystem::new(fs, layout.shader_dir, layout.texture_dirs);
    let namespace = shader_fs
        .read_directory()
        .with_context(|| format!("failed to link shaders under {}", cli.mount.display()))?;

    if cli.json {
        let shaders: Vec<_> = namespace
            .paths()
            .filter_map(|path| namespace.materialize(path))
            .collect();
        println!("{}", serde_json::to_string_pretty(&shaders)?);
    } else {
        for path in namespace.paths() {
            let shader = namespace
                .materialize(path)
                .context("registered path must materialize")?;
            match shader.image() {
                Some(image) => println!("{} -> {}", path.display(), image.display()),
                None => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}
