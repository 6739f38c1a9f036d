use crate::utils::error::MoveError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Target path for `path` inside `destination`, keeping the base name.
pub fn target_path(path: &Path, destination: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    // collecting components drops doubled separators
    Some(destination.join(name).components().collect())
}

/// Move `path` into `destination`, replacing any entry of the same name.
///
/// Tries a rename first and falls back to copy-then-delete, so the move also
/// works across filesystems. The destination directory must already exist.
/// An existing entry at the target is only replaced once the new content is
/// fully in place next to it.
pub fn relocate(path: &Path, destination: &Path) -> Result<PathBuf, MoveError> {
    let other = |reason: String| MoveError::Other {
        path: path.to_path_buf(),
        destination: destination.to_path_buf(),
        reason,
    };

    let source_meta = fs::symlink_metadata(path).map_err(|e| not_found_or(path, destination, e))?;
    let is_dir = source_meta.is_dir();

    match fs::metadata(destination) {
        Ok(md) if md.is_dir() => {}
        Ok(_) => return Err(other("destination is not a directory".to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(other("destination directory does not exist".to_string()))
        }
        Err(e) => return Err(other(e.to_string())),
    }

    if is_dir && is_within(destination, path) {
        return Err(other("cannot move a directory into itself".to_string()));
    }

    let target = target_path(path, destination)
        .ok_or_else(|| other("source has no file name".to_string()))?;

    match fs::rename(path, &target) {
        Ok(()) => {
            tracing::debug!("Renamed {} -> {}", path.display(), target.display());
            return Ok(target);
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound && !exists(path) => {
            return Err(MoveError::NotFound {
                path: path.to_path_buf(),
                source: e,
            });
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rename failed, trying replace");
        }
    }

    // a directory cannot be renamed over a non-empty one; swap it in instead
    if is_dir && exists(&target) {
        match swap_into_place(path, &target) {
            Ok(()) => {
                tracing::debug!("Replaced {} with {}", target.display(), path.display());
                return Ok(target);
            }
            Err(e) => tracing::debug!(error = %e, "Replace failed, falling back to copy+remove"),
        }
    }

    copy_then_remove(path, &target, is_dir).map_err(|e| not_found_or(path, destination, e))?;

    tracing::debug!("Copied {} -> {} and removed source", path.display(), target.display());
    Ok(target)
}

/// Copy `path` to a staging name beside `target`, swap it into place, then
/// delete `path`. On failure `target` keeps its previous content.
pub fn copy_then_remove(path: &Path, target: &Path, is_dir: bool) -> io::Result<()> {
    let staged = sibling(target, "relay-staging");
    clear_path(&staged)?;

    let copied = if is_dir {
        copy_dir(path, &staged)
    } else {
        fs::copy(path, &staged).map(|_| ())
    };
    if let Err(e) = copied.and_then(|_| swap_into_place(&staged, target)) {
        if let Err(cleanup) = clear_path(&staged) {
            tracing::warn!("Could not remove {}: {}", staged.display(), cleanup);
        }
        return Err(e);
    }

    if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Rename `staged` onto `target`, parking any existing `target` aside first
/// and restoring it if the rename fails.
fn swap_into_place(staged: &Path, target: &Path) -> io::Result<()> {
    let backup = sibling(target, "relay-backup");
    let had_target = exists(target);

    if had_target {
        clear_path(&backup)?;
        fs::rename(target, &backup)?;
    }

    if let Err(e) = fs::rename(staged, target) {
        if had_target {
            if let Err(restore) = fs::rename(&backup, target) {
                tracing::error!(
                    "Could not restore {} from {}: {}",
                    target.display(),
                    backup.display(),
                    restore
                );
            }
        }
        return Err(e);
    }

    if had_target {
        if let Err(e) = clear_path(&backup) {
            tracing::warn!("Could not remove {}: {}", backup.display(), e);
        }
    }
    Ok(())
}

/// True when `inner` is `outer` or lies below it, after resolving links.
fn is_within(inner: &Path, outer: &Path) -> bool {
    match (fs::canonicalize(inner), fs::canonicalize(outer)) {
        (Ok(inner), Ok(outer)) => inner.starts_with(outer),
        _ => false,
    }
}

fn sibling(target: &Path, tag: &str) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}", name, tag))
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn not_found_or(path: &Path, destination: &Path, e: io::Error) -> MoveError {
    if e.kind() == io::ErrorKind::NotFound && !exists(path) {
        MoveError::NotFound {
            path: path.to_path_buf(),
            source: e,
        }
    } else {
        MoveError::Other {
            path: path.to_path_buf(),
            destination: destination.to_path_buf(),
            reason: e.to_string(),
        }
    }
}

fn clear_path(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(md) if md.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let out = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&out)?;
        } else {
            fs::copy(entry.path(), &out)?;
        }
    }
    Ok(())
}
