// src/checker/mod.rs
// =============================================================================
// This module contains the per-link machinery.
//
// Submodules:
// - markdown: Extracts raw link targets from Markdown text
// - skip: Decides which links are never resolved
// - http: Probes resolved URLs and scores them
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod http;
mod markdown;
mod skip;

pub use http::{
    check_links, HttpProber, LinkStatus, ProbeMethod, ProbeOutcome, ProbeSettings, Prober,
};
pub use markdown::extract_markdown_links;
pub use skip::{strip_fragment, SkipDecision, SkipFilter, DEFAULT_SKIP_PREFIXES};
