pub mod action;
pub mod categories;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod ownership;
pub mod sync;

pub use action::{rewrite_action_file, RewriteStats, BLOCK_HEADER, END_MARKER, START_MARKER};
pub use categories::read_categories;
pub use config::SyncConfig;
pub use downloader::{ArchiveExtractor, ArchiveFetcher};
pub use error::{PrivoxyctError, Result};
pub use http::{HttpClient, HttpClientConfig, HttpError};
pub use ownership::fix_ownership;
pub use sync::{Stage, SyncReport};
