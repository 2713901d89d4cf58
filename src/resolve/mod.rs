// src/resolve/mod.rs
// =============================================================================
// This module turns links written in Markdown files into site URLs.
//
// Submodules:
// - normalize: lexical helpers for slash-separated paths
// - path: resolves a link against a page directory (the core algorithm)
// - web: wraps the resolver and produces the final URL for a document
// =============================================================================

mod normalize;
mod path;
mod web;

pub use path::{ContentRoot, PathResolver};
pub use web::{LinkMapper, WebPathMapper};
