// src/resolve/path.rs
// =============================================================================
// The path resolver: turns a link written inside a page into a path relative
// to the content root, the way the rendered site resolves it.
//
// Pages are rendered as directories (`guides/setup.md` becomes
// `/docs/guides/setup/`), so a link is resolved against the page directory
// rather than the file's folder. Two conventions of the generator need
// special handling:
//
// - `../` links: every literal `../` in the link moves the page directory up
//   one level and strips three characters from the front of the link.
//   This is deliberately NOT segment-wise `..` resolution; links that mix
//   `../` with other text resolve the same quirky way the site does.
// - `./` links: if the target exists as a sibling page of the current page
//   (`<parent>/<target>.md`), the link is resolved against the parent.
//   That is the only filesystem access, and it goes through FileExists.
//
// Rust concepts:
// - Traits: FileExists lets tests swap the real filesystem for a HashSet
// - Generics: PathResolver<F> works with any FileExists implementation
// =============================================================================

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use super::normalize::{has_extension, join, normalize, parent, to_slashes};
use crate::error::CheckError;

/// Answers whether a file exists under the content root.
///
/// `path` is slash-separated and relative to the content root.
pub trait FileExists {
    fn exists(&self, path: &str) -> bool;
}

/// FileExists backed by the real content root directory.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    root: PathBuf,
}

impl ContentRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileExists for ContentRoot {
    fn exists(&self, path: &str) -> bool {
        // Keep the lookup inside the root for absolute-looking or `..` paths
        let relative = normalize(path);
        let relative = clamp_to_root(relative.trim_start_matches('/'));
        self.root.join(relative).exists()
    }
}

/// In-memory FileExists, handy when no real content tree is needed.
impl FileExists for HashSet<String> {
    fn exists(&self, path: &str) -> bool {
        self.contains(&normalize(path))
    }
}

impl<F: FileExists + ?Sized> FileExists for &F {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }
}

/// Resolves page-relative links to content-root-relative paths.
#[derive(Debug, Clone)]
pub struct PathResolver<F> {
    files: F,
    strict: bool,
}

impl<F: FileExists> PathResolver<F> {
    pub fn new(files: F) -> Self {
        Self {
            files,
            strict: false,
        }
    }

    /// In strict mode, `../` links that the literal algorithm would resolve
    /// differently from segment-wise resolution are rejected with
    /// `CheckError::AmbiguousResolution` instead of being resolved.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolves `link` against the page directory `current_dir`.
    ///
    /// The result has no `.` or `..` segments left, and ends with `/` unless
    /// its final segment has an extension. The content root itself is `/`.
    pub fn resolve(&self, current_dir: &str, link: &str) -> Result<String, CheckError> {
        let mut dir = normalize(current_dir);
        let mut rest = normalize(link);

        if rest.starts_with("../") {
            let depth = rest.matches("../").count();
            let leading = leading_parent_tokens(&rest);
            if depth != leading {
                if self.strict {
                    return Err(CheckError::AmbiguousResolution {
                        link: link.to_string(),
                        depth,
                        leading,
                    });
                }
                debug!(link, depth, leading, "'../' count differs from leading tokens");
            }

            for _ in 0..depth {
                dir = parent(&dir);
                rest = strip_chars(&rest, 3).to_string();
            }
        } else if let Some(stripped) = to_slashes(link).strip_prefix("./") {
            let parent_dir = parent(&dir);
            let candidate = format!("{}.md", join(&parent_dir, stripped));
            if self.files.exists(&candidate) {
                debug!(link, %candidate, "sibling page found, resolving from parent");
                dir = parent_dir;
            }
            rest = stripped.to_string();
        }

        let normalized = normalize(&join(&dir, &rest));
        let mut resolved = clamp_to_root(&normalized).to_string();
        if resolved == "." {
            resolved.clear();
        }
        if !has_extension(&resolved) && !resolved.ends_with('/') {
            resolved.push('/');
        }
        Ok(resolved)
    }
}

/// Number of `../` tokens the path starts with.
fn leading_parent_tokens(path: &str) -> usize {
    let mut count = 0;
    let mut rest = path;
    while let Some(tail) = rest.strip_prefix("../") {
        count += 1;
        rest = tail;
    }
    count
}

/// Drops the `..` segments a normalized relative path could not consume,
/// so nothing climbs above the content root.
fn clamp_to_root(path: &str) -> &str {
    let mut rest = path;
    while let Some(tail) = rest.strip_prefix("../") {
        rest = tail;
    }
    if rest == ".." {
        ""
    } else {
        rest
    }
}

/// Drops the first `n` characters (not bytes) of `s`.
fn strip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is FileExists a trait instead of calling Path::exists directly?
//    - The resolver only needs one yes/no question answered
//    - ContentRoot answers it from disk, a HashSet answers it in tests,
//      and the resolver code is the same for both
//
// 2. What does `impl<F: FileExists + ?Sized> FileExists for &F` buy us?
//    - A reference to any FileExists is itself a FileExists, so a
//      PathResolver can borrow a set instead of owning it
//
// 3. Why does clamp_to_root return &str?
//    - It only ever cuts a prefix off, so it can hand back a slice of the
//      input without allocating
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver(existing: &[&str]) -> PathResolver<HashSet<String>> {
        PathResolver::new(existing.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_empty_link_is_current_dir() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("a/b", "").unwrap(), "a/b/");
        assert_eq!(r.resolve("a/b/", "").unwrap(), "a/b/");
        assert_eq!(r.resolve("", "").unwrap(), "/");
    }

    #[test]
    fn test_resolving_normalized_dir_is_idempotent() {
        let r = resolver(&[]);
        for dir in ["guides/", "a/b/c/", "/"] {
            let once = r.resolve(dir, "").unwrap();
            assert_eq!(once, dir);
            assert_eq!(r.resolve(&once, "").unwrap(), once);
        }
    }

    #[test]
    fn test_single_parent() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("a/b", "../c").unwrap(), "a/c/");
    }

    #[test]
    fn test_double_parent() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("a/b", "../../c").unwrap(), "c/");
    }

    #[test]
    fn test_parent_saturates_at_root() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("a", "../../../c").unwrap(), "c/");
    }

    #[test]
    fn test_bare_parent_links_stop_at_root() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("", "..").unwrap(), "/");
        assert_eq!(r.resolve("intro", "../..").unwrap(), "/");
        assert_eq!(r.resolve("", "../../x.md").unwrap(), "x.md");
    }

    #[test]
    fn test_clamp_to_root() {
        assert_eq!(clamp_to_root("../../a/b"), "a/b");
        assert_eq!(clamp_to_root(".."), "");
        assert_eq!(clamp_to_root("a/b"), "a/b");
    }

    #[test]
    fn test_parent_keeps_file_extension() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("guides/setup", "../intro.md").unwrap(), "guides/intro.md");
    }

    #[test]
    fn test_dot_slash_with_sibling_page() {
        let r = resolver(&["x/y/w.md"]);
        assert_eq!(r.resolve("x/y/z", "./w").unwrap(), "x/y/w/");
    }

    #[test]
    fn test_dot_slash_without_sibling_page() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("x/y/z", "./w").unwrap(), "x/y/z/w/");
    }

    #[test]
    fn test_plain_relative_link() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("guides", "setup").unwrap(), "guides/setup/");
        assert_eq!(r.resolve("guides", "img/shot.png").unwrap(), "guides/img/shot.png");
    }

    #[test]
    fn test_absolute_link_replaces_dir() {
        let r = resolver(&[]);
        assert_eq!(r.resolve("guides/setup", "/scripting/intro").unwrap(), "/scripting/intro/");
    }

    #[test]
    fn test_literal_depth_counting() {
        // Two `../` substrings: the page directory goes up twice and the
        // second strip eats "foo" instead of a `../` token
        let r = resolver(&[]);
        assert_eq!(r.resolve("a/b/c", "../foo../bar").unwrap(), "bar/");
    }

    #[test]
    fn test_strict_rejects_interleaved_parents() {
        let r = resolver(&[]).strict(true);
        let err = r.resolve("a/b/c", "../foo../bar").unwrap_err();
        assert!(matches!(
            err,
            CheckError::AmbiguousResolution { depth: 2, leading: 1, .. }
        ));
        assert_eq!(r.resolve("a/b/c", "../../d").unwrap(), "a/d/");
    }

    #[test]
    fn test_content_root_probe() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("x/y")).unwrap();
        std::fs::write(dir.path().join("x/y/w.md"), "# w").unwrap();

        let r = PathResolver::new(ContentRoot::new(dir.path()));
        assert_eq!(r.resolve("x/y/z", "./w").unwrap(), "x/y/w/");
        assert_eq!(r.resolve("x/y/z", "./v").unwrap(), "x/y/z/v/");
    }

    #[test]
    fn test_content_root_lookup_stays_inside_root() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.md"), "# outside").unwrap();
        let root = outer.path().join("docs");
        std::fs::create_dir_all(&root).unwrap();

        let files = ContentRoot::new(&root);
        assert!(!files.exists("../secret.md"));
        assert!(!files.exists("/../secret.md"));

        std::fs::write(root.join("secret.md"), "# inside").unwrap();
        assert!(files.exists("../secret.md"));
    }
}
