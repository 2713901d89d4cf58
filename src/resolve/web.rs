// src/resolve/web.rs
// =============================================================================
// Maps (document path, raw link) to the absolute URL a browser would request.
//
// Steps:
// 1. Find the configured root path (e.g. "/docs") inside the document path
// 2. Turn the document into its page directory:
//    "guides/setup.md" -> "guides/setup", "guides/_index.md" -> "guides/"
// 3. Let PathResolver resolve the link against that page directory
// 4. Build "/docs/<resolved>", drop the fragment and a trailing ".md",
//    and make sure the path ends with exactly one slash
// 5. Prefix it with the base URL (a base ending in the root path is not
//    repeated, so ".../docs/" and a bare origin both work)
// =============================================================================

use std::path::Path;

use url::Url;

use super::normalize::{normalize, to_slashes};
use super::path::{FileExists, PathResolver};
use crate::error::CheckError;

/// Anything that can turn a raw link found in a document into a URL.
///
/// The traversal only talks to this trait, so tests can wrap the real
/// mapper and count how often it is asked.
pub trait LinkMapper {
    fn map_link(&self, document: &Path, link: &str) -> Result<String, CheckError>;
}

/// Produces site URLs for links found in documents under the root path.
#[derive(Debug, Clone)]
pub struct WebPathMapper<F> {
    resolver: PathResolver<F>,
    base_url: Url,
    root_path: String,
}

impl<F: FileExists> WebPathMapper<F> {
    pub fn new(resolver: PathResolver<F>, base_url: Url, root_path: &str) -> Self {
        Self {
            resolver,
            base_url,
            root_path: root_path.trim_end_matches('/').to_string(),
        }
    }

    /// The page directory of a document, relative to the root path.
    pub fn page_directory(&self, document: &Path) -> Result<String, CheckError> {
        let absolute = std::path::absolute(document).unwrap_or_else(|_| document.to_path_buf());
        let path = normalize(&to_slashes(&absolute.to_string_lossy()));

        let (_, after_root) = path
            .split_once(self.root_path.as_str())
            .ok_or_else(|| CheckError::OutOfRoot {
                path: path.clone(),
                root_path: self.root_path.clone(),
            })?;
        let relative = after_root.trim_start_matches('/');

        Ok(match relative.strip_suffix(".md") {
            Some(page) => page.replace("_index", ""),
            None => relative.to_string(),
        })
    }

    /// The site path (`/docs/...`) for a link, without the base URL.
    pub fn site_path(&self, document: &Path, link: &str) -> Result<String, CheckError> {
        let page_dir = self.page_directory(document)?;

        let redundant_root = format!("{}/", self.root_path);
        let link = if self.root_path.is_empty() {
            link.to_string()
        } else {
            link.replace(&redundant_root, "/")
        };

        let resolved = self.resolver.resolve(&page_dir, &link)?;
        let mut path = collapse_slashes(&format!("{}/{}", self.root_path, resolved));

        if let Some(idx) = path.find('#') {
            path.truncate(idx);
        }
        if let Some(stripped) = path.strip_suffix(".md") {
            path = stripped.to_string();
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        Ok(path)
    }
}

impl<F: FileExists> LinkMapper for WebPathMapper<F> {
    fn map_link(&self, document: &Path, link: &str) -> Result<String, CheckError> {
        let path = self.site_path(document, link)?;
        Ok(format!("{}{}", self.url_prefix(), path))
    }
}

impl<F> WebPathMapper<F> {
    /// The base URL without query, fragment, trailing slash, or a trailing
    /// root path (the site path already starts with it).
    fn url_prefix(&self) -> String {
        let mut base = self.base_url.clone();
        base.set_query(None);
        base.set_fragment(None);

        let prefix = base.as_str().trim_end_matches('/');
        let prefix = if self.root_path.is_empty() {
            prefix
        } else {
            prefix.strip_suffix(self.root_path.as_str()).unwrap_or(prefix)
        };
        prefix.to_string()
    }
}

/// Collapses every run of slashes into a single one.
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        out.push(c);
    }
    out
}
