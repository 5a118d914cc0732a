//! ShareSync - Fetch a shared cloud-storage file as a direct download
//!
//! This library resolves a provider share link into a direct-download URL,
//! retrieves the file with retry and basic content validation, and writes a
//! change marker so downstream automation always sees a repository delta.
//!
//! # Features
//!
//! - **Link Resolution**: Host heuristics turn viewer links into direct
//!   downloads, including live resolution of short links
//! - **Cache Busting**: Every attempt carries a fresh uniqueness token
//! - **Automatic Retry**: Fixed-backoff retry for transient failures
//! - **Content Sanity Checks**: Non-empty result enforced, container
//!   signature sniffed (zip and compound-document)
//! - **Change Marker**: Unconditional timestamp marker for change detection
//!
//! # Example
//!
//! ```no_run
//! use sharesync::{run_fetch, DownloadConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DownloadConfig {
//!     share_url: Some("https://1drv.ms/x/s!example".to_string()),
//!     ..Default::default()
//! };
//!
//! let ok = run_fetch(&config).await?;
//! assert!(ok);
//! # Ok(())
//! # }
//! ```

mod download;
mod error;
mod marker;
mod orchestrator;
mod resolver;
mod sniff;
mod types;

pub use download::Fetcher;
pub use error::FetchError;
pub use marker::write_marker;
pub use orchestrator::run_fetch;
pub use resolver::UrlResolver;
pub use sniff::{sniff_file, FileSignature};
pub use types::{DownloadConfig, HostPatterns, SHARE_URL_ENV};
