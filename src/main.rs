// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, printed to stderr)
// 3. Load the configuration and dispatch to the subcommand handler
// 4. Exit with 0 once the run completes, broken links or not; 2 only when
//    the run itself could not happen (bad config, missing content root)
// =============================================================================

mod checker; // src/checker/ - extraction, skip rules, probing
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - defaults, doclink.toml, CLI overrides
mod error; // src/error.rs - typed errors
mod report; // src/report.rs - findings and how they are printed
mod resolve; // src/resolve/ - link -> URL resolution
mod traverse; // src/traverse/ - walking the content tree

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checker::{HttpProber, SkipFilter};
use cli::{Cli, Commands};
use config::{CliSettings, Config};
use resolve::{ContentRoot, LinkMapper, PathResolver, WebPathMapper};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            content_root,
            site,
            skips,
            no_default_skips,
            check_external,
            timeout,
            concurrency,
            method,
            strict,
            json,
        } => {
            let settings = CliSettings {
                content_root,
                extra_skips: skips,
                no_default_skips,
                check_external,
                timeout_secs: timeout,
                method,
                concurrency,
                strict,
                ..site.settings()
            };
            let config = Config::load(site.config.as_deref(), settings)?;
            handle_check(&config, json).await
        }
        Commands::Resolve {
            document,
            link,
            site,
            strict,
        } => {
            let settings = CliSettings {
                strict,
                ..site.settings()
            };
            let config = Config::load(site.config.as_deref(), settings)?;
            handle_resolve(&config, &document, &link)
        }
    }
}

// Builds the mapper for a configuration
fn build_mapper(config: &Config) -> Result<WebPathMapper<ContentRoot>> {
    let resolver = PathResolver::new(ContentRoot::new(&config.content_root)).strict(config.strict);
    Ok(WebPathMapper::new(
        resolver,
        config.parsed_base_url()?,
        &config.root_path,
    ))
}

// Handles the 'check' subcommand
async fn handle_check(config: &Config, json: bool) -> Result<()> {
    let mapper = build_mapper(config)?;
    let filter = SkipFilter::new(config.skip_prefixes.clone(), config.check_external);
    let prober = HttpProber::new(config.method, config.timeout(), config.max_redirects)?;

    eprintln!("🔍 Checking links under {}", config.content_root.display());
    eprintln!("🌐 Site: {}", config.base_url);

    let report = traverse::check_tree(
        &config.content_root,
        &filter,
        &mapper,
        &prober,
        &config.probe_settings(),
    )
    .await?;

    report::print_report(&report, json)
}

// Handles the 'resolve' subcommand
fn handle_resolve(config: &Config, document: &Path, link: &str) -> Result<()> {
    let mapper = build_mapper(config)?;
    let filter = SkipFilter::new(config.skip_prefixes.clone(), config.check_external);

    match filter.decide(link) {
        checker::SkipDecision::Skip(reason) => {
            println!("skipped ({:?})", reason);
        }
        checker::SkipDecision::External => {
            println!("{}", checker::strip_fragment(link));
        }
        checker::SkipDecision::Resolve => {
            println!("{}", mapper.map_link(document, link)?);
        }
    }
    Ok(())
}
