//! Main orchestration logic for a fetch run.

use crate::download::Fetcher;
use crate::error::FetchError;
use crate::marker;
use crate::sniff;
use crate::types::{DownloadConfig, SHARE_URL_ENV};
use std::path::Path;
use tracing::{error, info, warn};

/// Runs a complete fetch pass: download, marker write, diagnostics.
///
/// Returns `Ok(true)` only when a share URL was configured and the download
/// produced a non-empty artifact. Fetch failures are reported through the
/// boolean; only environment-level failures (data-directory creation, HTTP
/// client construction, the marker write) surface as `Err`.
///
/// The change marker is written unconditionally, even after a failed or
/// skipped fetch, so downstream change detection always observes a delta.
pub async fn run_fetch(config: &DownloadConfig) -> Result<bool, FetchError> {
    std::fs::create_dir_all(&config.data_dir)?;
    let artifact_path = config.data_dir.join(&config.artifact_name);

    let url_present = config.share_url.is_some();
    let fetch_ok = match &config.share_url {
        Some(share_url) => {
            let fetcher = Fetcher::new(config.clone())?;
            match fetcher.fetch(share_url, &artifact_path).await {
                Ok(()) => {
                    info!("✅ Fetched artifact to {}", artifact_path.display());
                    true
                }
                Err(e) => {
                    error!("❌ Fetch failed: {}", e);
                    false
                }
            }
        }
        None => {
            error!(
                "No share link configured; set the {} environment variable",
                SHARE_URL_ENV
            );
            false
        }
    };

    // Unconditional; a failure here propagates and kills the run.
    let marker_path = marker::write_marker(&config.data_dir, &config.marker_name)?;
    info!("Change marker written to {}", marker_path.display());

    report_directory(&config.data_dir);
    validate_artifact(&artifact_path);

    Ok(url_present && fetch_ok)
}

/// Logs size and signature for every file in the data directory.
///
/// Diagnostic only: read failures are logged and never affect the outcome.
fn report_directory(dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not list {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        match sniff::sniff_file(&path) {
            Ok(sig) => info!("  {}: {} bytes, {:?}", path.display(), size, sig),
            Err(e) => warn!("  {}: {} bytes, sniff failed: {}", path.display(), size, e),
        }
    }
}

/// Re-checks the expected artifact: existence, non-zero size, signature.
///
/// Logged only; the run's outcome was already decided by the fetch itself.
fn validate_artifact(path: &Path) {
    let size = match std::fs::metadata(path) {
        Ok(m) => m.len(),
        Err(_) => {
            warn!("Artifact {} is not present", path.display());
            return;
        }
    };
    if size == 0 {
        warn!("Artifact {} is empty", path.display());
        return;
    }
    match sniff::sniff_file(path) {
        Ok(sig) if sig.is_known() => {
            info!("Artifact {} looks valid ({} bytes, {:?})", path.display(), size, sig)
        }
        Ok(_) => warn!(
            "Artifact {} has an unrecognized signature ({} bytes)",
            path.display(),
            size
        ),
        Err(e) => warn!("Could not sniff artifact {}: {}", path.display(), e),
    }
}
