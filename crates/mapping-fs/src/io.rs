//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Distinguishes temp files staged by concurrent writers in one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial
/// file. An advisory lock is held on the temp file while writing.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();
    let temp_path = write_temp(&native_path, content)?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    tracing::trace!(path = %path, bytes = content.len(), "atomic write");
    Ok(())
}

/// Write content to `path` only if nothing exists there yet.
///
/// Returns `false` when the file already exists. The content is staged in
/// a temp file and hard-linked into place, so concurrent writers race on
/// the link: exactly one wins and readers never see a partial file.
pub fn write_new(path: &NormalizedPath, content: &[u8]) -> Result<bool> {
    let native_path = path.to_native();
    let temp_path = write_temp(&native_path, content)?;

    let linked = fs::hard_link(&temp_path, &native_path);
    fs::remove_file(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    match linked {
        Ok(()) => {
            tracing::trace!(path = %path, bytes = content.len(), "exclusive write");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Stage `content` in a locked hidden temp file next to `native_path`.
fn write_temp(native_path: &Path, content: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    FileExt::lock_exclusive(&temp_file).map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
        path: native_path.to_path_buf(),
    })?;

    Ok(temp_path)
}

/// Exclusive advisory lock on a file, released on drop.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: NormalizedPath,
}

impl FileLock {
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if FileExt::unlock(&self.file).is_err() {
            tracing::warn!(path = %self.path, "Failed to release file lock");
        }
    }
}

/// Block until an exclusive lock on `path` is held, creating the file if
/// needed.
///
/// The lock file is separate from any data file so data can still be
/// replaced by rename while the lock is held.
pub fn lock_exclusive(path: &NormalizedPath) -> Result<FileLock> {
    let native_path = path.to_native();
    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&native_path)
        .map_err(|e| Error::io(&native_path, e))?;

    FileExt::lock_exclusive(&file).map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    tracing::trace!(path = %path, "lock acquired");
    Ok(FileLock {
        file,
        path: path.clone(),
    })
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, treating a missing file as `None`.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match fs::read_to_string(path.to_native()) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path.to_native(), e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a file. Returns `false` if it was already gone.
pub fn remove_file(path: &NormalizedPath) -> Result<bool> {
    match fs::remove_file(path.to_native()) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path.to_native(), e)),
    }
}

/// List regular files in `dir` whose extension equals `extension`, sorted by name.
///
/// A missing directory yields an empty list. Hidden files (temp files
/// from [`write_atomic`]) are skipped.
pub fn list_files(dir: &NormalizedPath, extension: &str) -> Result<Vec<NormalizedPath>> {
    let entries = match fs::read_dir(dir.to_native()) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir.to_native(), e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir.to_native(), e))?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if hidden || !path.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == extension) {
            files.push(NormalizedPath::new(&path));
        }
    }
    files.sort();
    Ok(files)
}
