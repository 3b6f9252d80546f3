//! Runtime settings resolved from environment variables
//!
//! Blank or unparsable values fall back to the defaults below.

use crate::extract::CrawlParams;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_BASE_URL: &str = "https://sandbox.orkg.org/api";
pub const DEFAULT_PAPER_ACCEPT: &str = "application/vnd.orkg.paper.v2+json";

/// Central configuration for the HTTP collaborator and crawl limits
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// ORKG API root (`ORKG_BASE_URL`)
    pub base_url: String,
    /// Accept header for paper requests (`ORKG_PAPER_ACCEPT`)
    pub paper_accept: String,
    /// Per-request timeout (`ORKG_HTTP_TIMEOUT_S`)
    pub http_timeout: Duration,
    /// Retries after the first failed attempt (`ORKG_HTTP_MAX_RETRIES`)
    pub http_max_retries: u32,
    /// Base delay doubled on every retry (`ORKG_HTTP_BACKOFF_S`)
    pub http_backoff: Duration,
    /// `CRAWL_MAX_DEPTH`
    pub crawl_max_depth: usize,
    /// `STATEMENTS_PAGE_SIZE`
    pub statements_page_size: usize,
    /// `LEAVES_MAX_DEPTH`
    pub leaves_max_depth: usize,
    /// `LEAVES_MAX_NODES`
    pub leaves_max_nodes: usize,
    /// Contributions crawled at once (`EXTRACT_CONCURRENCY`)
    pub concurrency: usize,
    /// Where bundles and documents are written when no path is given (`EXPORTS_DIR`)
    pub exports_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            paper_accept: DEFAULT_PAPER_ACCEPT.to_string(),
            http_timeout: Duration::from_secs(30),
            http_max_retries: 3,
            http_backoff: Duration::from_millis(600),
            crawl_max_depth: 4,
            statements_page_size: 200,
            leaves_max_depth: 6,
            leaves_max_nodes: 400,
            concurrency: 1,
            exports_dir: default_exports_dir(),
        }
    }
}

/// Default export directory (~/.local/share/orkg-facts/exports)
fn default_exports_dir() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("orkg-facts").join("exports")
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let parsed = |name: &str| get(name).and_then(|v| v.parse::<u64>().ok());
        let count = |name: &str| parsed(name).and_then(|n| usize::try_from(n).ok());

        Self {
            base_url: get("ORKG_BASE_URL").unwrap_or(defaults.base_url),
            paper_accept: get("ORKG_PAPER_ACCEPT").unwrap_or(defaults.paper_accept),
            http_timeout: parsed("ORKG_HTTP_TIMEOUT_S")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            http_max_retries: parsed("ORKG_HTTP_MAX_RETRIES")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.http_max_retries),
            http_backoff: get("ORKG_HTTP_BACKOFF_S")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(defaults.http_backoff),
            crawl_max_depth: count("CRAWL_MAX_DEPTH")
                .unwrap_or(defaults.crawl_max_depth),
            statements_page_size: count("STATEMENTS_PAGE_SIZE")
                .unwrap_or(defaults.statements_page_size),
            leaves_max_depth: count("LEAVES_MAX_DEPTH")
                .unwrap_or(defaults.leaves_max_depth),
            leaves_max_nodes: count("LEAVES_MAX_NODES")
                .unwrap_or(defaults.leaves_max_nodes),
            concurrency: count("EXTRACT_CONCURRENCY")
                .map(|n| n.clamp(1, Semaphore::MAX_PERMITS))
                .unwrap_or(defaults.concurrency),
            exports_dir: get("EXPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.exports_dir),
        }
    }

    /// Crawl limits derived from these settings
    pub fn crawl_params(&self) -> CrawlParams {
        CrawlParams {
            max_depth: self.crawl_max_depth,
            page_size: self.statements_page_size,
            leaves_max_depth: self.leaves_max_depth,
            leaves_max_nodes: self.leaves_max_nodes,
            concurrency: self.concurrency,
        }
    }
}
