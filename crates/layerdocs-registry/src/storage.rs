//! # File Storage Layer
//!
//! Registries are small JSON documents that are read whole and written whole.
//! There is no partial or streaming write: a run loads the file, mutates the
//! in-memory registry, and replaces the file once at the end.
//!
//! ## Load Semantics
//!
//! | On disk | Result |
//! |---------|--------|
//! | File absent | empty registry (`T::default()`) |
//! | Valid JSON of the right shape | the registry |
//! | Anything else | `RegistryError::Parse` naming the file |
//!
//! ## Write Semantics
//!
//! The canonical text is written to a hidden sibling temp file which is then
//! renamed over the target, so a crash mid-write leaves the previous file in
//! place. Missing parent directories are created.
//!
//! Files that belong together are replaced as a group by
//! [`write_all_atomic`]:
//!
//! 1. **Stage**: snapshot every target's current bytes and write every temp file
//! 2. **Commit**: rename the temp files over their targets, in order
//! 3. **Roll back**: if a rename fails, restore the targets already replaced
//!    and delete every remaining temp file
//!
//! Either every target carries its new content or every target is as it was.

use crate::canonicalize::to_canonical_json;
use crate::models::{RegistryError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads a registry from `path`, or returns `T::default()` if no file exists yet.
///
/// # Errors
///
/// Returns `RegistryError::Io` if the file exists but cannot be read, and
/// `RegistryError::Parse` if its content is not a valid registry.
pub fn load_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No registry at {}, starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&text).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` to `path` in canonical form with `indent` spaces per level.
///
/// # Errors
///
/// Returns `RegistryError::Serialization` if the value cannot be encoded and
/// `RegistryError::Io` if the directory, temp file, or rename fails.
pub fn persist<T: Serialize>(value: &T, path: &Path, indent: usize) -> Result<()> {
    let text = to_canonical_json(value, indent)?;
    write_atomic(path, text.as_bytes())?;
    debug!("Persisted registry to {}", path.display());
    Ok(())
}

/// Replaces `path` with `contents` via a temp file and rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    write_all_atomic(&[(path, contents)])
}

/// Replaces every `(path, contents)` pair, or none of them.
///
/// # Errors
///
/// Returns `RegistryError::Io` naming the first file that could not be
/// snapshotted, staged, or renamed. By then every target has been restored
/// and no temp file is left behind.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, contents) in files {
        match StagedFile::stage(path, contents) {
            Ok(file) => staged.push(file),
            Err(e) => {
                staged.iter().for_each(StagedFile::discard);
                return Err(e);
            }
        }
    }

    let mut committed: Vec<StagedFile> = Vec::with_capacity(staged.len());
    let mut pending = staged.into_iter();
    while let Some(file) = pending.next() {
        if let Err(source) = fs::rename(&file.temp_path, &file.target) {
            file.discard();
            for rest in pending.by_ref() {
                rest.discard();
            }
            for done in committed.iter().rev() {
                done.restore();
            }
            return Err(RegistryError::Io {
                path: file.target,
                source,
            });
        }
        committed.push(file);
    }
    Ok(())
}

/// A temp file written next to its target, plus the target's prior content.
struct StagedFile {
    target: PathBuf,
    temp_path: PathBuf,
    original: Option<Vec<u8>>,
}

impl StagedFile {
    fn stage(target: &Path, contents: &[u8]) -> Result<Self> {
        let io_err = |source| RegistryError::Io {
            path: target.to_path_buf(),
            source,
        };

        let original = match fs::read(target) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(source) => return Err(io_err(source)),
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let temp_path = temp_sibling(target);
        if let Err(source) = fs::write(&temp_path, contents) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_err(source));
        }

        Ok(Self {
            target: target.to_path_buf(),
            temp_path,
            original,
        })
    }

    fn discard(&self) {
        let _ = fs::remove_file(&self.temp_path);
    }

    /// Puts the target back the way it was before the commit.
    fn restore(&self) {
        let restored = match &self.original {
            Some(bytes) => fs::write(&self.temp_path, bytes)
                .and_then(|()| fs::rename(&self.temp_path, &self.target)),
            None => fs::remove_file(&self.target),
        };
        if let Err(e) = restored {
            self.discard();
            warn!("Could not restore {}: {}", self.target.display(), e);
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "registry".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
