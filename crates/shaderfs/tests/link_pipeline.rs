//! End-to-end pipeline tests over a real on-disk asset tree.
use std::fs;
use std::path::Path;

use shaderfs::{DiskFileSystem, Quake3Shader, ShaderFileSystem};

fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, contents).expect("write file");
}

fn mount(root: &Path) -> ShaderFileSystem<DiskFileSystem> {
    ShaderFileSystem::new(
        DiskFileSystem::new(root),
        "scripts",
        vec!["textures".into(), "env".into()],
    )
}

#[test]
fn links_a_mixed_asset_tree() {
    let temp = tempfile::tempdir().unwrap();
    write_file(
        temp.path(),
        "scripts/base.shader",
        r#"
textures/brick
{
    qer_editorimage textures/brick_ed.tga
    {
        map textures/brick.tga
    }
}

textures/unused
{
    surfaceparm nonsolid
}
"#,
    );
    write_file(temp.path(), "scripts/broken.shader", "textures/broken {\n");
    write_file(temp.path(), "textures/brick.tga", "tga");
    write_file(temp.path(), "textures/plain.png", "png");
    write_file(temp.path(), "env/sky.jpg", "jpg");

    let namespace = mount(temp.path()).read_directory().expect("read directory");

    let paths: Vec<_> = namespace.paths().collect();
    assert_eq!(
        paths,
        vec![
            Path::new("env/sky"),
            Path::new("textures/brick"),
            Path::new("textures/plain"),
            Path::new("textures/unused"),
        ]
    );

    // Explicit definition claimed by its texture keeps its parsed attributes.
    let brick = namespace.materialize(Path::new("textures/brick")).unwrap();
    assert_eq!(
        brick.editor_image.as_deref(),
        Some(Path::new("textures/brick_ed.tga"))
    );
    assert_eq!(brick.stages.len(), 1);

    // Bare textures get implicit shaders pointing back at the image.
    let plain = namespace.materialize(Path::new("textures/plain")).unwrap();
    assert_eq!(
        plain.editor_image.as_deref(),
        Some(Path::new("textures/plain.png"))
    );
    let sky = namespace.materialize(Path::new("env/sky")).unwrap();
    assert_eq!(sky.editor_image.as_deref(), Some(Path::new("env/sky.jpg")));

    // The definition with no texture anywhere survives standalone.
    let unused = namespace.materialize(Path::new("textures/unused")).unwrap();
    assert!(unused.surface_parms.contains("nonsolid"));
}

#[test]
fn missing_roots_yield_an_empty_namespace() {
    let temp = tempfile::tempdir().unwrap();
    let namespace = mount(temp.path()).read_directory().expect("read directory");
    assert!(namespace.is_empty());
}

#[test]
fn real_file_at_stripped_path_takes_precedence() {
    let temp = tempfile::tempdir().unwrap();
    write_file(
        temp.path(),
        "scripts/base.shader",
        "textures/real { cull none }",
    );
    write_file(temp.path(), "textures/real.png", "png");
    write_file(temp.path(), "textures/real", "pre-existing real file");

    let namespace = mount(temp.path()).read_directory().expect("read directory");

    // The texture neither claimed the definition nor synthesized an entry,
    // so the definition fell through to standalone linking.
    let real: std::sync::Arc<Quake3Shader> =
        namespace.materialize(Path::new("textures/real")).unwrap();
    assert_eq!(real.culling, shaderfs::Culling::None);
    assert_eq!(real.editor_image, None);
}

#[test]
fn later_texture_for_same_path_does_not_displace_the_first() {
    let temp = tempfile::tempdir().unwrap();
    write_file(temp.path(), "textures/rock.png", "png");
    write_file(temp.path(), "textures/rock.tga", "tga");

    let namespace = mount(temp.path()).read_directory().expect("read directory");
    assert_eq!(namespace.len(), 1);

    // Discovery is name-ordered, so the .png is processed first and wins.
    let rock = namespace.materialize(Path::new("textures/rock")).unwrap();
    assert_eq!(
        rock.editor_image.as_deref(),
        Some(Path::new("textures/rock.png"))
    );
}
