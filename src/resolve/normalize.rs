// src/resolve/normalize.rs
// =============================================================================
// Lexical path helpers shared by the resolver and the web path mapper.
//
// Everything here works on slash-separated strings, never on the real
// filesystem. Backslashes are treated as separators so paths coming from
// Windows checkouts normalize the same way.
// =============================================================================

/// Replaces every backslash with a forward slash.
pub fn to_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically normalizes a slash path.
///
/// Empty and `.` segments are dropped, `..` pops the previous segment, and
/// trailing slashes disappear. A relative path keeps any `..` it cannot
/// consume; an absolute path clamps at `/`. An empty result becomes `.`.
pub fn normalize(path: &str) -> String {
    let path = to_slashes(path);
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    // Exactly two leading slashes are kept as-is (POSIX leaves `//` to the
    // implementation), three or more collapse to one.
    let prefix = if path.starts_with("//") && !path.starts_with("///") {
        "//"
    } else if absolute {
        "/"
    } else {
        ""
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                let can_pop = segments.last().is_some_and(|last| *last != "..");
                if can_pop {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = format!("{}{}", prefix, segments.join("/"));
    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Returns the parent directory of a slash path.
///
/// The parent of a single segment (or of the root) is the root itself:
/// `""` for relative paths, `/` for absolute ones.
pub fn parent(path: &str) -> String {
    let head = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    };
    if !head.is_empty() && head.chars().any(|c| c != '/') {
        head.trim_end_matches('/').to_string()
    } else {
        head.to_string()
    }
}

/// Joins `tail` onto `base`. An absolute `tail` replaces `base` entirely.
pub fn join(base: &str, tail: &str) -> String {
    if tail.starts_with('/') || base.is_empty() {
        tail.to_string()
    } else if base.ends_with('/') {
        format!("{base}{tail}")
    } else {
        format!("{base}/{tail}")
    }
}

/// True when the final segment carries an extension.
///
/// Leading dots do not count, so `.hidden` and `..` have none.
pub fn has_extension(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) => name[..dot].chars().any(|c| c != '.'),
        None => false,
    }
}
