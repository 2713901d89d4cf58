// src/report.rs
// =============================================================================
// Result types for a run and the functions that print them.
//
// Output rules:
// - Every broken link is one line on stdout:
//     Broken URL: <url> (from file: <path>, link: <raw link>)
// - --json prints the whole report as JSON instead
// - The summary goes to stderr so stdout stays greppable
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crate::checker::LinkStatus;

/// A link whose resolved URL did not answer with the success code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The URL that was probed
    pub url: String,
    /// The document the link was found in
    pub file: String,
    /// 1-based line of the link
    pub line: usize,
    /// The link exactly as written
    pub link: String,
    #[serde(flatten)]
    pub status: LinkStatus,
}

/// A document or link that could not be turned into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionFailure {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub error: String,
}

/// Everything a run produced.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Markdown documents scanned
    pub documents: usize,
    /// Links probed
    pub checked: usize,
    /// Links left out by the skip filter
    pub skipped: usize,
    pub findings: Vec<Finding>,
    pub failures: Vec<ResolutionFailure>,
}

impl CheckReport {
    pub fn broken_count(&self) -> usize {
        self.findings.len()
    }
}

/// The human-readable line for one finding.
pub fn format_finding(finding: &Finding) -> String {
    format!(
        "Broken URL: {} (from file: {}, link: {})",
        finding.url, finding.file, finding.link
    )
}

/// Prints the report either as finding lines or JSON.
pub fn print_report(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for finding in &report.findings {
            println!("{}", format_finding(finding));
        }
    }
    print_summary(report);
    Ok(())
}

fn print_summary(report: &CheckReport) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   📄 Documents: {}", report.documents);
    eprintln!("   🌐 Checked: {}", report.checked);
    eprintln!("   ⏭️  Skipped: {}", report.skipped);
    eprintln!("   ❌ Broken: {}", report.broken_count());
    if !report.failures.is_empty() {
        eprintln!("   ⚠️  Unresolved: {}", report.failures.len());
    }
}
