//! Object naming: stored filename, storage key and URL path

use std::path::Path;

/// Name to store the file under.
///
/// With `rename` set the name becomes `<timestamp><ext>`, where `ext` is the
/// suffix starting at the last `.` of the name (`logo.png` -> `.png`). Two
/// renamed uploads within the same second and extension share a name.
pub fn derive_filename(original: &str, rename: bool, timestamp: i64) -> String {
    if rename {
        timestamped_filename(original, timestamp)
    } else {
        original.to_string()
    }
}

/// `<timestamp><ext>` for `filename`
pub fn timestamped_filename(filename: &str, timestamp: i64) -> String {
    format!("{}{}", timestamp, extension(filename))
}

/// Extension of the last path element, leading dot included, or `""`
fn extension(filename: &str) -> &str {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Final component of a local path, as the filename to derive from
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Storage key for `filename` under `directory`
pub fn storage_key(filename: &str, directory: Option<&str>) -> String {
    compose(filename, directory.unwrap_or(""))
}

/// URL path fragment for `filename` under `directory`
pub fn url_path(filename: &str, directory: Option<&str>) -> String {
    compose(filename, directory.unwrap_or(""))
}

/// Join `directory` and `filename` into a clean, forward-slash path.
///
/// An empty directory returns `filename` untouched. Otherwise backslashes
/// become `/`, empty and `.` elements are dropped, `..` consumes the element
/// before it, and trailing separators are removed.
pub fn compose(filename: &str, directory: &str) -> String {
    if directory.is_empty() {
        return filename.to_string();
    }

    let joined = format!("{}/{}", directory, filename).replace('\\', "/");
    clean(&joined)
}

fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for element in path.split('/') {
        match element {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` directly under the root stays at the root
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (rooted, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}
