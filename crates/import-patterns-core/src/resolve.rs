//! Lexical resolution of relative import specifiers.

/// Resolves an import specifier against the file that contains it.
///
/// Specifiers starting with `.` are joined to the directory of
/// `source_file` and normalized. Anything else (bare module names,
/// absolute paths) is returned unchanged and matched literally.
///
/// Paths are `/`-separated strings; no file system access happens.
///
/// # Examples
///
/// ```
/// use import_patterns_core::resolve_import_path;
///
/// assert_eq!(resolve_import_path("src/browser/foo.ts", "../node/bar"), "src/node/bar");
/// assert_eq!(resolve_import_path("src/browser/foo.ts", "fs"), "fs");
/// ```
#[must_use]
pub fn resolve_import_path(source_file: &str, raw_path: &str) -> String {
    if !raw_path.starts_with('.') {
        return raw_path.to_owned();
    }

    match parent_dir(source_file) {
        Some(dir) => normalize(&format!("{dir}/{raw_path}")),
        None => normalize(raw_path),
    }
}

fn parent_dir(path: &str) -> Option<&str> {
    path.rfind('/').map(|i| &path[..i])
}

/// Drops `.` and empty segments and folds `..` into its parent.
///
/// Leading `..` segments survive on relative paths and are discarded on
/// absolute ones.
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_owned()
    } else {
        joined
    }
}
