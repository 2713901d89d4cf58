// src/checker/skip.rs
// =============================================================================
// Decides which raw links never get resolved.
//
// A link is skipped when:
// - it has a network location ("https://...", "//cdn.example.com/x"),
//   unless external checking is turned on
// - it starts with one of the configured prefixes ("mailto:", "#", ...)
//
// Prefixes are compared case-sensitively, in the order they are configured.
// =============================================================================

use url::Url;

/// Prefixes skipped when the configuration does not name its own.
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &[
    "mailto:",
    "discord.gg",
    "/natives",
    "level_metas",
    "fivem://",
    "#",
    "/static/",
];

/// What to do with a raw link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDecision {
    /// Resolve it against the document and probe the result.
    Resolve,
    /// Probe the link as-is: it is already an absolute URL.
    External,
    /// Leave it alone. Holds the rule that matched.
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AbsoluteUrl,
    Prefix(String),
}

/// Prefix rules plus the absolute-URL policy.
#[derive(Debug, Clone)]
pub struct SkipFilter {
    prefixes: Vec<String>,
    check_external: bool,
}

impl SkipFilter {
    pub fn new(prefixes: Vec<String>, check_external: bool) -> Self {
        Self {
            prefixes,
            check_external,
        }
    }

    pub fn decide(&self, link: &str) -> SkipDecision {
        if let Some(prefix) = self.prefixes.iter().find(|p| link.starts_with(p.as_str())) {
            return SkipDecision::Skip(SkipReason::Prefix(prefix.clone()));
        }

        if has_network_location(link) {
            return if self.check_external {
                SkipDecision::External
            } else {
                SkipDecision::Skip(SkipReason::AbsoluteUrl)
            };
        }

        SkipDecision::Resolve
    }
}

impl Default for SkipFilter {
    fn default() -> Self {
        Self::new(
            DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
            false,
        )
    }
}

/// True when the link names a host, with or without a scheme.
///
/// `mailto:` and `file:///` links have no host, `//cdn.example.com/x` does.
pub fn has_network_location(link: &str) -> bool {
    if let Ok(url) = Url::parse(link) {
        return url.host_str().is_some_and(|host| !host.is_empty());
    }

    match link.strip_prefix("//") {
        Some(rest) => rest
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|authority| !authority.is_empty()),
        None => false,
    }
}

/// Removes the fragment from an absolute URL before probing it.
pub fn strip_fragment(link: &str) -> String {
    match Url::parse(link) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => link.split('#').next().unwrap_or(link).to_string(),
    }
}
