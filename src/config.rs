// src/config.rs
// =============================================================================
// Run configuration.
//
// Values come from three layers, later ones winning:
// 1. Built-in defaults (a Hugo dev server on localhost:1313)
// 2. An optional `doclink.toml` file
// 3. Command-line flags (see CliSettings)
//
// The resulting Config is passed explicitly to everything that needs it;
// nothing here is global.
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use url::Url;

use crate::checker::{ProbeMethod, ProbeSettings, DEFAULT_SKIP_PREFIXES};

/// Configuration filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "doclink.toml";

/// Everything a check run needs to know.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the Markdown sources; maps to `root_path` on the site.
    pub content_root: PathBuf,
    /// Where the rendered site is served.
    pub base_url: String,
    /// URL path segment the content root is published under.
    pub root_path: String,
    /// Links starting with any of these are never checked.
    pub skip_prefixes: Vec<String>,
    /// Probe absolute URLs as-is instead of skipping them.
    pub check_external: bool,
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
    /// HTTP method for probes.
    pub method: ProbeMethod,
    /// The one status code counted as reachable.
    pub success_status: u16,
    /// Redirects followed before a probe gives up.
    pub max_redirects: usize,
    /// Probes in flight at once. 1 checks links one after another.
    pub concurrency: usize,
    /// Reject `../` links whose resolution depends on literal token counting.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("content/docs"),
            base_url: "http://localhost:1313/docs/".to_string(),
            root_path: "/docs".to_string(),
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
            check_external: false,
            timeout_secs: 5,
            method: ProbeMethod::Head,
            success_status: 200,
            max_redirects: 10,
            concurrency: 16,
            strict: false,
        }
    }
}

/// Command-line values that override the loaded configuration.
///
/// Only `Some` values (and set flags) override.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub content_root: Option<PathBuf>,
    pub base_url: Option<String>,
    pub root_path: Option<String>,
    pub extra_skips: Vec<String>,
    pub no_default_skips: bool,
    pub check_external: bool,
    pub timeout_secs: Option<u64>,
    pub method: Option<ProbeMethod>,
    pub concurrency: Option<usize>,
    pub strict: bool,
}

impl Config {
    /// Loads the config file (explicit path, or `doclink.toml` in the working
    /// directory when present), then applies CLI overrides and validates.
    pub fn load(explicit: Option<&Path>, cli: CliSettings) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILENAME).is_file() => Self::from_file(Path::new(CONFIG_FILENAME))?,
            None => Self::default(),
        };
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file. A relative `content_root` is taken relative to the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if config.content_root.is_relative() {
            if let Some(dir) = path.parent() {
                config.content_root = dir.join(&config.content_root);
            }
        }
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply(&mut self, cli: CliSettings) {
        if let Some(root) = cli.content_root {
            self.content_root = root;
        }
        if let Some(base_url) = cli.base_url {
            self.base_url = base_url;
        }
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if cli.no_default_skips {
            self.skip_prefixes.clear();
        }
        self.skip_prefixes.extend(cli.extra_skips);
        self.check_external |= cli.check_external;
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(method) = cli.method {
            self.method = method;
        }
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        self.strict |= cli.strict;
    }

    fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        if !self.root_path.starts_with('/') {
            bail!("root_path must start with '/', got {:?}", self.root_path);
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        Ok(())
    }

    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid base URL: {}", self.base_url))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            timeout: self.timeout(),
            success_status: self.success_status,
            concurrency: self.concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:1313/docs/");
        assert_eq!(config.root_path, "/docs");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.success_status, 200);
        assert_eq!(config.method, ProbeMethod::Head);
        assert!(config.skip_prefixes.contains(&"mailto:".to_string()));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r##"
content_root = "site/content/docs"
base_url = "https://docs.example.com/"
skip_prefixes = ["#"]
method = "get"
"##,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.content_root, dir.path().join("site/content/docs"));
        assert_eq!(config.base_url, "https://docs.example.com/");
        assert_eq!(config.skip_prefixes, vec!["#".to_string()]);
        assert_eq!(config.method, ProbeMethod::Get);
        // untouched fields keep their defaults
        assert_eq!(config.root_path, "/docs");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "base_ulr = \"http://x\"\n").unwrap();
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        config.apply(CliSettings {
            base_url: Some("http://127.0.0.1:8080/".to_string()),
            extra_skips: vec!["/api/".to_string()],
            no_default_skips: true,
            concurrency: Some(1),
            strict: true,
            ..Default::default()
        });
        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.skip_prefixes, vec!["/api/".to_string()]);
        assert_eq!(config.concurrency, 1);
        assert!(config.strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            root_path: "docs".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
