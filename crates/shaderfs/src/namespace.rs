//! Generic virtual namespace: an ordered map from logical paths to lazily
//! materialized entries. Sources register (path, producer) bindings through
//! `add_file` while building; once the build pass hands the namespace to the
//! caller it is read-only.
//!
//! Each entry's producer is captured at registration and invoked at most
//! once, on first materialization. Registration is first-wins: a later
//! binding for an already-taken path is dropped with a warning, which is the
//! deterministic tie-break for duplicate shader paths.
use std::collections::btree_map::Entry as MapEntry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::fs::PathInfo;

type Producer<T> = Box<dyn Fn() -> Arc<T> + Send + Sync>;

struct Entry<T> {
    produce: Producer<T>,
    cell: OnceLock<Arc<T>>,
}

pub struct Namespace<T> {
    entries: BTreeMap<PathBuf, Entry<T>>,
}

impl<T> Namespace<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Registers a lazy entry at `path`. The first registration for a path
    /// wins; later ones are dropped with a warning. Returns whether the
    /// binding was accepted.
    pub fn add_file<P>(&mut self, path: PathBuf, produce: P) -> bool
    where
        P: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        match self.entries.entry(path) {
            MapEntry::Occupied(occupied) => {
                warn!(
                    path = %occupied.key().display(),
                    "namespace entry already registered, keeping the first"
                );
                false
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry {
                    produce: Box::new(produce),
                    cell: OnceLock::new(),
                });
                true
            }
        }
    }

    /// Materializes the entry at `path`, invoking its producer on first use.
    pub fn materialize(&self, path: &Path) -> Option<Arc<T>> {
        self.entries
            .get(path)
            .map(|entry| Arc::clone(entry.cell.get_or_init(|| (entry.produce)())))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn path_info(&self, path: &Path) -> PathInfo {
        if self.entries.contains_key(path) {
            return PathInfo::File;
        }
        let is_ancestor = self
            .entries
            .range(path.to_path_buf()..)
            .next()
            .is_some_and(|(entry, _)| entry.starts_with(path));
        if is_ancestor {
            PathInfo::Directory
        } else {
            PathInfo::Missing
        }
    }

    /// Registered paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Namespace<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Namespace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("paths", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
