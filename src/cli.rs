// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - check: walk a content root and report links the running site does not serve
// - resolve: show which URL a single link in a single document maps to
//
// Every flag is optional; anything not given falls back to doclink.toml and
// then to the built-in defaults (see config.rs).
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::checker::ProbeMethod;
use crate::config::CliSettings;

#[derive(Parser, Debug)]
#[command(
    name = "doclink-guardian",
    version,
    about = "Checks cross-references between the Markdown pages of a static site",
    long_about = "doclink-guardian resolves every relative link in a tree of Markdown \
                  documents the way the rendered site resolves it, then asks the running \
                  site whether the page exists."
)]
pub struct Cli {
    /// Log every resolution step (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link under a content root
    ///
    /// Example: doclink-guardian check content/docs --base-url http://localhost:1313/docs/
    Check {
        /// Directory holding the Markdown sources (defaults to the config value)
        content_root: Option<PathBuf>,

        #[command(flatten)]
        site: SiteArgs,

        /// Extra link prefix to skip (repeatable)
        #[arg(long = "skip", value_name = "PREFIX")]
        skips: Vec<String>,

        /// Do not use the default skip prefixes
        #[arg(long)]
        no_default_skips: bool,

        /// Probe absolute URLs instead of skipping them
        #[arg(long)]
        check_external: bool,

        /// Seconds before a probe counts as unreachable
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Probes in flight at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// HTTP method used for probing
        #[arg(long, value_enum)]
        method: Option<ProbeMethod>,

        /// Report `../` links that only resolve through literal token counting
        #[arg(long)]
        strict: bool,

        /// Output results in JSON format instead of one line per broken link
        #[arg(long)]
        json: bool,
    },

    /// Print the URL a link resolves to, without probing it
    ///
    /// Example: doclink-guardian resolve content/docs/guides/setup.md ../intro.md
    Resolve {
        /// The Markdown document containing the link
        document: PathBuf,

        /// The link as written in the document
        link: String,

        #[command(flatten)]
        site: SiteArgs,

        /// Reject `../` links that only resolve through literal token counting
        #[arg(long)]
        strict: bool,
    },
}

/// Options shared by both subcommands.
#[derive(Args, Debug, Default)]
pub struct SiteArgs {
    /// Config file (defaults to ./doclink.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the rendered site
    #[arg(long)]
    pub base_url: Option<String>,

    /// URL path the content root is published under
    #[arg(long)]
    pub root_path: Option<String>,
}

impl SiteArgs {
    /// CliSettings holding just the site options.
    pub fn settings(&self) -> CliSettings {
        CliSettings {
            base_url: self.base_url.clone(),
            root_path: self.root_path.clone(),
            ..Default::default()
        }
    }
}
