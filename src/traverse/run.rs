// src/traverse/run.rs
// =============================================================================
// Drives a full check of the content tree.
//
// For every Markdown document:
//   extract links -> skip filter -> map to URL -> queue a probe
// then all probes run on the worker pool and the non-OK ones become findings.
//
// Errors stay local:
// - a document outside the root path stops that document only
// - a link that cannot be resolved (strict mode) is recorded and skipped
// - probe failures are already folded into LinkStatus by the checker
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use super::walk::discover_documents;
use crate::checker::{
    check_links, extract_markdown_links, strip_fragment, ProbeSettings, Prober, SkipDecision,
    SkipFilter,
};
use crate::error::CheckError;
use crate::report::{CheckReport, Finding, ResolutionFailure};
use crate::resolve::LinkMapper;

/// Where a probed URL came from.
#[derive(Debug, Clone)]
struct LinkOrigin {
    file: PathBuf,
    line: usize,
    link: String,
}

/// Checks every link of every Markdown document under `root`.
pub async fn check_tree<M, P>(
    root: &Path,
    filter: &SkipFilter,
    mapper: &M,
    prober: &P,
    settings: &ProbeSettings,
) -> Result<CheckReport>
where
    M: LinkMapper,
    P: Prober,
{
    let discovery = discover_documents(root)?;
    info!(
        documents = discovery.documents.len(),
        other_files = discovery.other_files.len(),
        "scanning {}",
        root.display()
    );

    let mut report = CheckReport {
        documents: discovery.documents.len(),
        ..Default::default()
    };
    let mut jobs = Vec::new();

    for document in &discovery.documents {
        let text = match tokio::fs::read_to_string(document).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read {}: {}", document.display(), e);
                report.failures.push(ResolutionFailure {
                    file: document.display().to_string(),
                    line: None,
                    link: None,
                    error: e.to_string(),
                });
                continue;
            }
        };

        collect_jobs(document, &text, filter, mapper, &mut report, &mut jobs);
    }

    report.checked = jobs.len();
    info!("checking {} link(s)", jobs.len());

    let results = check_links(prober, jobs, settings).await;

    report.findings = results
        .into_iter()
        .filter(|(_, _, status)| !status.is_ok())
        .map(|(origin, url, status)| Finding {
            url,
            file: origin.file.display().to_string(),
            line: origin.line,
            link: origin.link,
            status,
        })
        .collect();
    // Probes finish in any order; report in document order
    report
        .findings
        .sort_by(|a, b| (&a.file, a.line, &a.link).cmp(&(&b.file, b.line, &b.link)));

    Ok(report)
}

// Turns one document's links into probe jobs
fn collect_jobs<M: LinkMapper>(
    document: &Path,
    text: &str,
    filter: &SkipFilter,
    mapper: &M,
    report: &mut CheckReport,
    jobs: &mut Vec<(LinkOrigin, String)>,
) {
    for raw in extract_markdown_links(text) {
        let url = match filter.decide(&raw.target) {
            SkipDecision::Skip(reason) => {
                debug!(link = %raw.target, ?reason, "skipped");
                report.skipped += 1;
                continue;
            }
            SkipDecision::External => strip_fragment(&raw.target),
            SkipDecision::Resolve => match mapper.map_link(document, &raw.target) {
                Ok(url) => url,
                Err(err @ CheckError::OutOfRoot { .. }) => {
                    warn!("{err}");
                    report.failures.push(ResolutionFailure {
                        file: document.display().to_string(),
                        line: None,
                        link: None,
                        error: err.to_string(),
                    });
                    return;
                }
                Err(err) => {
                    warn!("{}:{}: {err}", document.display(), raw.line);
                    report.failures.push(ResolutionFailure {
                        file: document.display().to_string(),
                        line: Some(raw.line),
                        link: Some(raw.target),
                        error: err.to_string(),
                    });
                    continue;
                }
            },
        };

        debug!(link = %raw.target, %url, "resolved");
        jobs.push((
            LinkOrigin {
                file: document.to_path_buf(),
                line: raw.line,
                link: raw.target,
            },
            url,
        ));
    }
}
