//! Artifact download functionality.

use crate::error::FetchError;
use crate::resolver::{UrlResolver, USER_AGENT};
use crate::sniff::{self, FileSignature};
use crate::types::DownloadConfig;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_retry2::{Retry, RetryError};
use tracing::{info, warn};

/// Write-buffer size for the streamed body.
const CHUNK_SIZE: usize = 8 * 1024;

/// Downloads the shared artifact with a bounded retry budget.
///
/// Holds a [`UrlResolver`] and invokes it once per attempt, so every attempt
/// carries a fresh cache-busting token. The retry policy is fixed-backoff:
/// `max_attempts` tries with `retry_delay` between failures.
pub struct Fetcher {
    client: reqwest::Client,
    resolver: UrlResolver,
    config: DownloadConfig,
}

impl Fetcher {
    pub fn new(config: DownloadConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;
        let resolver = UrlResolver::new(config.hosts.clone(), config.request_timeout)?;
        Ok(Self {
            client,
            resolver,
            config,
        })
    }

    /// Fetches `share_link` to `dest`, retrying transient failures.
    ///
    /// Transport errors, non-success statuses and zero-byte results all
    /// count as retryable attempt failures; none of them escape this
    /// function. Exhausting the attempt budget yields
    /// [`FetchError::DownloadFailed`].
    pub async fn fetch(&self, share_link: &str, dest: &Path) -> Result<(), FetchError> {
        let retry_strategy = tokio_retry2::strategy::FixedInterval::from_millis(
            self.config.retry_delay.as_millis() as u64,
        )
        .take(self.config.max_attempts.saturating_sub(1));

        Retry::spawn(retry_strategy, || async move {
            match self.attempt(share_link, dest).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    warn!("Attempt to fetch {} failed: {}", share_link, e);
                    RetryError::to_transient(e)
                }
            }
        })
        .await
        .map_err(|e| {
            FetchError::DownloadFailed(format!(
                "all {} attempts failed; last error: {}",
                self.config.max_attempts, e
            ))
        })
    }

    /// A single resolve-then-download attempt.
    async fn attempt(&self, share_link: &str, dest: &Path) -> Result<(), FetchError> {
        let url = match self.resolver.resolve(share_link).await {
            Some(url) => url,
            None => {
                warn!("Resolution failed; using the share link verbatim");
                share_link.to_string()
            }
        };

        // Diagnostic only: the HEAD result is logged but never consulted.
        // Share endpoints are known to report sizes and content types that
        // disagree with the actual GET body.
        match self.client.head(&url).send().await {
            Ok(r) => info!(
                "HEAD {} -> {} (content-length: {:?})",
                url,
                r.status(),
                r.content_length()
            ),
            Err(e) => warn!("HEAD request failed for {}: {}", url, e),
        }

        info!("Downloading {} to {}", url, dest.display());
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await?
            .error_for_status()?;
        let content_length = response.content_length();

        let pb = attempt_progress_bar(content_length);

        // File::create truncates, so a previous attempt's partial bytes are
        // discarded wholesale.
        let mut file = BufWriter::with_capacity(CHUNK_SIZE, tokio::fs::File::create(dest).await?);
        let mut byte_stream = response.bytes_stream();

        while let Some(piece) = byte_stream.next().await {
            let chunk = piece?;
            pb.inc(chunk.len() as u64);
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        pb.finish_and_clear();

        let file_size = tokio::fs::metadata(dest).await?.len();
        if file_size == 0 {
            return Err(FetchError::DownloadFailed(format!(
                "empty response body written to {}",
                dest.display()
            )));
        }

        // Signature mismatch is a warning, not a failure: the remote's
        // content-type reporting is unreliable and genuine workbooks have
        // arrived without a recognizable prefix before.
        match sniff::sniff_file(dest)? {
            FileSignature::Zip => info!("Downloaded {} bytes (zip container)", file_size),
            FileSignature::CompoundDocument => {
                info!("Downloaded {} bytes (compound document)", file_size)
            }
            FileSignature::Unknown => warn!(
                "{} ({} bytes) does not match a known container signature; keeping it anyway",
                dest.display(),
                file_size
            ),
        }

        Ok(())
    }
}

/// Builds the per-attempt progress bar, hidden when stderr is not a TTY.
fn attempt_progress_bar(content_length: Option<u64>) -> indicatif::ProgressBar {
    if !atty::is(atty::Stream::Stderr) {
        return indicatif::ProgressBar::hidden();
    }
    match content_length {
        Some(len) => {
            let pb = indicatif::ProgressBar::new(len);
            pb.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template(
                        "{spinner:.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} | {elapsed_precise} elapsed",
                    )
                    .unwrap()
                    .progress_chars("█▓▒░ "),
            );
            pb
        }
        None => indicatif::ProgressBar::new_spinner(),
    }
}
