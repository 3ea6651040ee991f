//! File system contract consumed by the shader linker, plus the disk-backed
//! implementation used in production. Everything above this module speaks in
//! logical, mount-relative paths; only `DiskFileSystem` knows where the mount
//! actually lives on disk.
//!
//! Types:
//!
//! - `PathInfo` classifies a logical path as a file, a directory, or missing.
//! - `TraversalMode` selects flat or recursive discovery for `find`.
//! - `PathMatcher` filters discovered files by extension, case-insensitively.
//! - `FileSystem` is the seam the linker is tested through.
//! - `DiskFileSystem` mounts a real directory tree.
//! - `FsError` carries the offending path alongside the underlying I/O error.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("failed to list directory {}: {source}", .path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathInfo {
    File,
    Directory,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    Flat,
    Recursive,
}

/// Case-insensitive extension filter applied to discovered files.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    extensions: Vec<String>,
}

impl PathMatcher {
    /// Builds a matcher from extensions given without the leading dot.
    pub fn extensions(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|candidate| *candidate == ext)
            })
            .unwrap_or(false)
    }
}

pub trait FileSystem {
    fn path_info(&self, path: &Path) -> PathInfo;

    /// Discovers files under `root` whose names satisfy `matcher`. Returned
    /// paths are mount-relative and keep the `root` prefix. Entries are
    /// visited in name order per directory so discovery order is stable.
    fn find(
        &self,
        root: &Path,
        mode: TraversalMode,
        matcher: &PathMatcher,
    ) -> Result<Vec<PathBuf>, FsError>;

    fn read_file(&self, path: &Path) -> Result<String, FsError>;
}

/// A mount-rooted view of a real directory tree.
#[derive(Debug, Clone)]
pub struct DiskFileSystem {
    mount: PathBuf,
}

impl DiskFileSystem {
    pub fn new(mount: impl Into<PathBuf>) -> Self {
        Self {
            mount: mount.into(),
        }
    }

    pub fn mount(&self) -> &Path {
        &self.mount
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        self.mount.join(path)
    }

    fn visit(
        &self,
        relative: &Path,
        mode: TraversalMode,
        matcher: &PathMatcher,
        out: &mut Vec<PathBuf>,
    ) -> Result<(), FsError> {
        let absolute = self.absolute(relative);
        let entries = fs::read_dir(&absolute).map_err(|source| FsError::List {
            path: relative.to_path_buf(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| FsError::List {
                path: relative.to_path_buf(),
                source,
            })?;
            names.push(entry.file_name());
        }
        names.sort();

        for name in names {
            let child = relative.join(&name);
            if self.absolute(&child).is_dir() {
                if mode == TraversalMode::Recursive {
                    self.visit(&child, mode, matcher, out)?;
                }
            } else if matcher.matches(&child) {
                out.push(child);
            }
        }
        Ok(())
    }
}

impl FileSystem for DiskFileSystem {
    fn path_info(&self, path: &Path) -> PathInfo {
        let absolute = self.absolute(path);
        if absolute.is_dir() {
            PathInfo::Directory
        } else if absolute.is_file() {
            PathInfo::File
        } else {
            PathInfo::Missing
        }
    }

    fn find(
        &self,
        root: &Path,
        mode: TraversalMode,
        matcher: &PathMatcher,
    ) -> Result<Vec<PathBuf>, FsError> {
        debug!(root = %root.display(), ?mode, "discovering files");
        let mut out = Vec::new();
        self.visit(root, mode, matcher, &mut out)?;
        Ok(out)
    }

    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        fs::read_to_string(self.absolute(path)).map_err(|source| FsError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}
