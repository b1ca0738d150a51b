use std::fs;
use std::io;
use std::path::Path;

/// Writes `bytes` to `path` through a temp file in the same directory plus a
/// rename, so a failed write never leaves a truncated file behind. Parent
/// directories are created as needed.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, bytes)?;
    if path.exists() {
        fs::remove_file(path)?;
    }
    match fs::rename(tmp, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            let _ = fs::remove_file(tmp);
            Err(err)
        }
    }
}
