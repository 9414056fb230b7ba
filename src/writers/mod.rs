//! Idempotent config file writers
//!
//! Every generated file carries [`MARKER`]. On re-runs a file that contains
//! the marker is jskit's own and is replaced in place; a file without it
//! belongs to the user and is moved to a `*_backup` sibling first.

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod eslint;
pub mod stylelint;
pub mod typescript;
pub mod vite;

/// Substring identifying a file as generated by jskit.
pub const MARKER: &str = "managed by jskit";

/// First line / `$comment` value of every generated file.
pub const NOTICE: &str =
    "Generated and managed by jskit. Remove this notice to keep local edits across `jskit init`.";

const BACKUP_SUFFIX: &str = "_backup";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Created,
    Updated,
    Unchanged,
    /// A user-owned file was moved aside before writing.
    Replaced { backup: PathBuf },
    /// A user-owned file of the same purpose was moved aside.
    BackedUp { backup: PathBuf },
    /// A previously generated file under an outdated name was deleted.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub change: Change,
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.change {
            Change::Created => write!(f, "created {path}"),
            Change::Updated => write!(f, "updated {path}"),
            Change::Unchanged => write!(f, "{path} is up to date"),
            Change::Replaced { backup } => {
                write!(f, "replaced {path} (previous file kept as {})", backup.display())
            }
            Change::BackedUp { backup } => {
                write!(f, "moved {path} to {}", backup.display())
            }
            Change::Removed => write!(f, "removed outdated {path}"),
        }
    }
}

/// Whether `path` holds a file generated by jskit.
pub fn is_managed(path: &Path) -> Result<bool> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).contains(MARKER)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(Error::io("failed to read", path, err)),
    }
}

/// Write a generated file, backing up any user-owned file it would replace.
pub fn write_managed(path: &Path, contents: &str) -> Result<FileChange> {
    debug_assert!(contents.contains(MARKER), "generated files must carry the marker");

    let change = match fs::read(path) {
        Ok(existing) if String::from_utf8_lossy(&existing).contains(MARKER) => {
            if existing == contents.as_bytes() {
                Change::Unchanged
            } else {
                write_atomic(path, contents)?;
                Change::Updated
            }
        }
        Ok(_) => {
            let backup = back_up(path)?;
            write_atomic(path, contents)?;
            Change::Replaced { backup }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            write_atomic(path, contents)?;
            Change::Created
        }
        Err(err) => return Err(Error::io("failed to read", path, err)),
    };

    tracing::debug!("{}: {:?}", path.display(), change);
    Ok(FileChange {
        path: path.to_path_buf(),
        change,
    })
}

/// Clear a same-purpose file under an outdated name out of the way.
pub fn retire(path: &Path) -> Result<Option<FileChange>> {
    if fs::symlink_metadata(path).is_err() {
        return Ok(None);
    }

    let change = if is_managed(path)? {
        fs::remove_file(path).map_err(|err| Error::io("failed to remove", path, err))?;
        Change::Removed
    } else {
        Change::BackedUp {
            backup: back_up(path)?,
        }
    };

    tracing::debug!("{}: {:?}", path.display(), change);
    Ok(Some(FileChange {
        path: path.to_path_buf(),
        change,
    }))
}

/// Retire every existing file in `paths`.
pub fn retire_all(paths: &[PathBuf]) -> Result<Vec<FileChange>> {
    let mut changes = Vec::new();
    for path in paths {
        changes.extend(retire(path)?);
    }
    Ok(changes)
}

/// First free `<name>_backup`, `<name>_backup2`, ... sibling of `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut candidate = path.with_file_name(format!("{name}{BACKUP_SUFFIX}"));
    let mut n = 2;
    while fs::symlink_metadata(&candidate).is_ok() {
        candidate = path.with_file_name(format!("{name}{BACKUP_SUFFIX}{n}"));
        n += 1;
    }
    candidate
}

fn back_up(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    fs::rename(path, &backup).map_err(|err| Error::io("failed to back up", path, err))?;
    tracing::debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Replace `path` with `contents` in one rename so readers never see a
/// half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io("failed to create directory", parent, err))?;
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".{name}.jskit-tmp"));

    let result = fs::write(&staging, contents)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|err| Error::io("failed to write", path, err));

    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

/// Generated JS/TS files open with the notice as a line comment.
pub(crate) fn js_header() -> String {
    format!("// {NOTICE}\n")
}
