// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// The site's Markdown is full of generator shortcodes, so instead of a full
// CommonMark parser we scan line by line the way the site authors read it:
// - Lines inside ``` fences or <!-- --> blocks are skipped
// - Lines with a template directive ({{% ... %}} or {{< ... >}}) are skipped
// - Everything else is searched for inline links [text](target) (but not
//   images ![alt](src)) and reference definitions [label]: target
//
// Rust concepts:
// - Enums: Region makes the "inside a skipped block" state explicit
// - LazyLock: compile each regex once, on first use
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

/// `[text](target)`. Images are the same shape preceded by `!`; the regex
/// crate has no look-behind, so `inline_links` checks that byte itself.
static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\((.*?)\)").expect("valid inline link regex"));

/// `[label]: target` at the start of a line.
static REFERENCE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*?\]:\s*(.*?)$").expect("valid reference regex"));

/// `{{% shortcode %}}` / `{{< shortcode >}}`.
static TEMPLATE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[%<].*?[%>]\}\}").expect("valid directive regex"));

const FENCE: &str = "```";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// A link target found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// 1-based line number
    pub line: usize,
    /// The target exactly as written, minus surrounding whitespace
    pub target: String,
}

/// Where the scanner currently is.
///
/// Fences and block comments share one toggle: any line starting with a
/// fence or a comment marker flips the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Prose,
    Skipped,
}

impl Region {
    fn toggle(self) -> Self {
        match self {
            Region::Prose => Region::Skipped,
            Region::Skipped => Region::Prose,
        }
    }
}

/// Extracts link targets from Markdown text, in document order.
///
/// Example input:
///   "See [setup](../setup.md) and ![logo](logo.png)"
///
/// Example output:
///   [RawLink { line: 1, target: "../setup.md" }]
pub fn extract_markdown_links(markdown: &str) -> Vec<RawLink> {
    let mut links = Vec::new();
    let mut region = Region::Prose;

    for (index, line) in markdown.lines().enumerate() {
        let line = line.trim();

        if TEMPLATE_DIRECTIVE.is_match(line) {
            continue;
        }

        // A comment that opens and closes on the same line
        if line.contains(COMMENT_OPEN) && line.contains(COMMENT_CLOSE) {
            continue;
        }

        if line.starts_with(FENCE) || line.starts_with(COMMENT_OPEN) || line.starts_with(COMMENT_CLOSE) {
            region = region.toggle();
            continue;
        }

        if region == Region::Skipped {
            continue;
        }

        let line_number = index + 1;

        for target in inline_links(line) {
            links.push(RawLink {
                line: line_number,
                target,
            });
        }

        if let Some(caps) = REFERENCE_LINK.captures(line) {
            links.push(RawLink {
                line: line_number,
                target: caps[1].trim().to_string(),
            });
        }
    }

    links
}

/// Inline link targets on one line, skipping any match right after a `!`.
///
/// A rejected match only moves the search one byte on, so a link nested
/// inside an image's text (`![x [y](z)`) is still found.
fn inline_links(line: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut start = 0;

    while let Some(caps) = INLINE_LINK.captures_at(line, start) {
        let Some(whole) = caps.get(0) else { break };
        if whole.start() > 0 && line.as_bytes()[whole.start() - 1] == b'!' {
            start = whole.start() + 1;
            continue;
        }
        targets.push(caps[1].trim().to_string());
        start = whole.end();
    }

    targets
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is LazyLock?
//    - A static that is built the first time it is used, then shared
//    - Regex::new is slow compared to matching, so each pattern is
//      compiled once for the whole run instead of once per line
//
// 2. Why `.expect()` inside the LazyLock?
//    - The patterns are fixed strings; if one fails to compile it is a bug
//      in this file, not bad input, so panicking on first use is fine
//
// 3. Why captures_at instead of captures_iter?
//    - captures_iter always resumes after the previous match
//    - To skip an image but still see a link inside its alt text, the
//      search has to restart just one byte later
// -----------------------------------------------------------------------------
