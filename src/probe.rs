//! Filesystem probing behind a trait so resolution can run against a fake tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Stateless existence and readability checks.
pub trait Probe {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_readable(&self, path: &Path) -> bool;

    /// Entry names directly under `dir`, sorted. Missing or unreadable
    /// directories list as empty.
    fn list_dir(&self, dir: &Path) -> Vec<String>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl Probe for DiskProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_readable(&self, path: &Path) -> bool {
        fs::File::open(path).is_ok()
    }

    fn list_dir(&self, dir: &Path) -> Vec<String> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// In-memory probe holding a set of fabricated file paths.
///
/// Every ancestor of a registered file counts as an existing directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProbe {
    files: BTreeSet<PathBuf>,
}

impl MemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl Probe for MemoryProbe {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .iter()
            .any(|file| file != path && file.starts_with(path))
    }

    fn is_readable(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn list_dir(&self, dir: &Path) -> Vec<String> {
        let names: BTreeSet<String> = self
            .files
            .iter()
            .filter_map(|file| file.strip_prefix(dir).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| first.as_os_str().to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .collect();
        names.into_iter().collect()
    }
}
