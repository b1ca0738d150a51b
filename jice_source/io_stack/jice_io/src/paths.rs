use std::path::{Component, Path};

/// Lexically normalizes a path into a slash-separated string: `.` segments
/// drop out, `..` pops the previous segment where one exists, separators
/// become `/`. No filesystem access; an empty result normalizes to `.`.
pub fn normalize_path(path: &Path) -> String {
    let mut prefix = String::new();
    let mut parts: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => {
                prefix = p.as_os_str().to_string_lossy().replace('\\', "/");
            }
            Component::RootDir => prefix.push('/'),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if prefix.is_empty() {
                    parts.push(String::from(".."));
                }
            }
            Component::Normal(segment) => {
                parts.push(segment.to_string_lossy().into_owned());
            }
        }
    }

    let joined = parts.join("/");
    if joined.is_empty() && prefix.is_empty() {
        return String::from(".");
    }
    format!("{prefix}{joined}")
}

/// `normalize_path` over the part of `path` below `base`. Falls back to the
/// full path when `path` does not live under `base`.
pub fn rel_slash(path: &Path, base: &Path) -> String {
    normalize_path(path.strip_prefix(base).unwrap_or(path))
}

/// Last path segment without its extension, as owned text.
pub fn file_stem_string(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
