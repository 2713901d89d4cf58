// src/traverse/mod.rs
// =============================================================================
// This module walks the content tree and drives the per-link pipeline.
//
// Submodules:
// - walk: finds the Markdown documents under the content root
// - run: extracts, filters, resolves and probes their links
// =============================================================================

mod run;
mod walk;

pub use run::check_tree;
