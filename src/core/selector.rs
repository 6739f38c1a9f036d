use crate::domain::model::{CandidateFile, Selection};
use crate::utils::error::SelectError;
use chrono::{DateTime, Utc};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    /// Consider entries whose name starts with a dot.
    pub include_hidden: bool,
    /// Canonical path of a directory never offered as a candidate, usually
    /// the destination when it lives inside the watch directory.
    pub skip: Option<PathBuf>,
}

/// Pick the most recent direct entry of `dir`.
///
/// Directories inside `dir` are entries like any other. Among entries with the
/// same timestamp the lexicographically greatest path wins, so repeated calls
/// over an unchanged directory agree. Entries that cannot be stat'ed are
/// skipped; only failing to read `dir` itself is an error.
pub fn select_latest(dir: &Path, options: &SelectOptions) -> Result<Selection, SelectError> {
    let metadata = fs::metadata(dir).map_err(|e| classify(dir, e))?;
    if !metadata.is_dir() {
        return Err(SelectError::NotFound {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| classify(dir, e))?;

    let mut latest: Option<CandidateFile> = None;
    for entry in entries {
        let entry = entry.map_err(|e| SelectError::Other {
            path: dir.to_path_buf(),
            source: e,
        })?;

        if !options.include_hidden && is_hidden(&entry.file_name()) {
            continue;
        }

        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(md) => md,
            // removed since listing, or a dangling symlink
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Skipping vanished entry {}", path.display());
                continue;
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                continue;
            }
        };

        if metadata.is_dir() && is_skipped(&path, options.skip.as_deref()) {
            tracing::debug!("Skipping destination directory {}", path.display());
            continue;
        }

        let recency = recency_of(&metadata);

        let newer = match &latest {
            None => true,
            Some(current) => (recency, &path) > (current.recency, &current.path),
        };
        if newer {
            latest = Some(CandidateFile { path, recency });
        }
    }

    Ok(match latest {
        Some(candidate) => {
            tracing::debug!(
                "Latest entry in {}: {} ({})",
                dir.display(),
                candidate.path.display(),
                candidate.recency
            );
            Selection::Found(candidate)
        }
        None => Selection::Empty,
    })
}

/// Inode change time on Unix; creation time elsewhere, falling back to mtime.
#[cfg(unix)]
pub fn recency_of(metadata: &Metadata) -> DateTime<Utc> {
    use std::os::unix::fs::MetadataExt;

    DateTime::from_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(not(unix))]
pub fn recency_of(metadata: &Metadata) -> DateTime<Utc> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::UNIX_EPOCH)
}

fn is_skipped(path: &Path, skip: Option<&Path>) -> bool {
    match skip {
        Some(skip) => fs::canonicalize(path).is_ok_and(|p| p == skip),
        None => false,
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn classify(dir: &Path, source: io::Error) -> SelectError {
    let path: PathBuf = dir.to_path_buf();
    match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            SelectError::NotFound { path, source }
        }
        _ => SelectError::Other { path, source },
    }
}
