//! Configuration types for fetch operations.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that supplies the share link.
pub const SHARE_URL_ENV: &str = "SHARESYNC_URL";

/// Host substrings that select the URL resolution strategy.
///
/// Matching is deliberately loose: plain substring search on the link.
/// Share links come from humans pasting them into CI configuration, and the
/// provider mixes tenant-specific subdomains freely.
#[derive(Debug, Clone)]
pub struct HostPatterns {
    /// Short-link redirector host (e.g. `"1drv.ms"`). Resolving these
    /// requires a live redirect-following request.
    pub short_link: String,
    /// Business cloud-storage host (e.g. `"sharepoint.com"`).
    pub business: String,
    /// Personal cloud-storage host (e.g. `"onedrive.live.com"`). Also the
    /// domain a resolved short link is expected to land on.
    pub personal: String,
}

impl Default for HostPatterns {
    fn default() -> Self {
        Self {
            short_link: "1drv.ms".to_string(),
            business: "sharepoint.com".to_string(),
            personal: "onedrive.live.com".to_string(),
        }
    }
}

/// Configuration for fetching the shared artifact.
///
/// Paths are explicit rather than hard-coded so tests can point everything
/// at a temporary directory.
///
/// # Example
///
/// ```
/// use sharesync::DownloadConfig;
///
/// let config = DownloadConfig {
///     share_url: Some("https://1drv.ms/x/s!example".to_string()),
///     data_dir: "data".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Share link to fetch. `None` means the configuration variable was
    /// absent; the driver still writes the marker and runs diagnostics.
    pub share_url: Option<String>,
    /// Directory the artifact and change marker are written to.
    pub data_dir: PathBuf,
    /// Artifact filename within the data directory.
    pub artifact_name: String,
    /// Change-marker filename within the data directory (hidden file).
    pub marker_name: String,
    /// Host substrings selecting the resolution strategy.
    pub hosts: HostPatterns,
    /// Total attempt budget for the download (default: 3).
    pub max_attempts: usize,
    /// Fixed delay between failed attempts (default: 5 s). This is a
    /// fixed-backoff policy, not exponential.
    pub retry_delay: Duration,
    /// Per-request timeout (default: 30 s).
    pub request_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            share_url: None,
            data_dir: PathBuf::from("data"),
            artifact_name: "dataset.xlsx".to_string(),
            marker_name: ".last-fetch".to_string(),
            hosts: HostPatterns::default(),
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}
