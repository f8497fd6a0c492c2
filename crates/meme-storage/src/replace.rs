//! Whole-file replacement visible to readers in other processes

use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Replace the contents of `path`.
///
/// The new contents go to a sibling temporary file which is renamed over
/// the target, so a concurrent reader sees either the old or the new file,
/// never a truncated one. A symlink is followed and its target replaced.
/// When the directory does not allow creating the temporary file, the
/// target is rewritten in place instead.
pub(crate) fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    let target = resolve(path)?;
    let tmp = temp_path(&target);

    let written = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, &target));
    match written {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            if e.kind() != ErrorKind::PermissionDenied {
                return Err(e);
            }
            tracing::debug!(path = %target.display(), "Directory not writable, rewriting in place");
            let mut file = OpenOptions::new().write(true).truncate(true).open(&target)?;
            file.write_all(contents.as_bytes())?;
            file.flush()
        }
    }
}

/// Follow symlinks to the file actually written
fn resolve(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(target) => Ok(target),
            // Dangling link: create the file it points at
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let link = fs::read_link(path)?;
                Ok(match path.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                })
            }
            Err(e) => Err(e),
        },
        _ => Ok(path.to_path_buf()),
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");
        fs::write(&path, "old\n").unwrap();

        replace_file(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_replace_through_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        let link = dir.path().join("link");
        fs::write(&real, "old\n").unwrap();
        std::os::unix::fs::symlink("real", &link).unwrap();

        replace_file(&link, "new\n").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "new\n");
    }

    #[test]
    fn test_replace_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");

        replace_file(&path, "x\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n");
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("data");

        assert!(replace_file(&path, "x\n").is_err());
    }
}
