// src/error.rs
// =============================================================================
// Typed errors for the link pipeline.
//
// The application itself uses anyhow::Result (see main.rs), but the pieces
// that callers need to tell apart get their own enum:
// - OutOfRoot: a document does not live under the configured root path.
//   Fatal to that one document, never to the whole run.
// - AmbiguousResolution: only raised in strict mode, when a `../` link
//   cannot be resolved by stripping leading `../` tokens alone.
// - Reachability: a probe could not run or ran out of time. Never
//   propagated; it is logged and scored as "unreachable".
// =============================================================================

use std::time::Duration;

/// Errors produced while mapping or checking a single link.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("document {path} is not within the root path {root_path}")]
    OutOfRoot { path: String, root_path: String },

    #[error(
        "link {link:?} contains {depth} '../' tokens but only {leading} lead the path"
    )]
    AmbiguousResolution {
        link: String,
        depth: usize,
        leading: usize,
    },

    #[error("could not reach {url}: {reason}")]
    Reachability { url: String, reason: ReachabilityFailure },
}

/// Why a probe produced no status code.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReachabilityFailure {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Request(String),
}
