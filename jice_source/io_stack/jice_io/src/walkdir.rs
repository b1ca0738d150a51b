use std::{fs, io, path::Path, path::PathBuf};

use crate::paths::normalize_path;

/// A file found by [`collect_files_with_extension`]: absolute path plus the
/// normalized slash-separated path relative to the walk base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundFile {
    pub path: PathBuf,
    pub rel: String,
}

/// Visits every file under `dir`, calling the callback for each one.
/// Directory entries are visited in name order so repeated walks of the same
/// tree see files in the same sequence.
pub fn walk_dir<F>(dir: &Path, callback: &mut F) -> io::Result<()>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, callback)?;
        } else if path.is_file() {
            callback(&path)?;
        }
    }
    Ok(())
}

/// Collects every file under `base` whose name ends in `extension`
/// (including the dot), sorted by relative path.
pub fn collect_files_with_extension(base: &Path, extension: &str) -> io::Result<Vec<FoundFile>> {
    let mut files = Vec::new();

    walk_dir(base, &mut |path| {
        let name = path.to_string_lossy();
        if !name.ends_with(extension) {
            return Ok(());
        }
        let rel = path.strip_prefix(base).unwrap_or(path);
        files.push(FoundFile {
            path: path.to_path_buf(),
            rel: normalize_path(rel),
        });
        Ok(())
    })?;

    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(files)
}

/// Collects every file under `base` except those ending in `skip_extension`,
/// sorted by relative path.
pub fn collect_files_skipping(base: &Path, skip_extension: &str) -> io::Result<Vec<FoundFile>> {
    let mut files = Vec::new();

    walk_dir(base, &mut |path| {
        let name = path.to_string_lossy();
        if name.ends_with(skip_extension) {
            return Ok(());
        }
        let rel = path.strip_prefix(base).unwrap_or(path);
        files.push(FoundFile {
            path: path.to_path_buf(),
            rel: normalize_path(rel),
        });
        Ok(())
    })?;

    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(files)
}
