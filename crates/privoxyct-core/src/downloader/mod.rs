//! Archive retrieval and extraction.
//!
//! The fetcher streams the remote archive to a scratch file; the extractor
//! unpacks the gzipped tar into the scratch directory.

mod archive;
mod fetch;

pub use archive::ArchiveExtractor;
pub use fetch::ArchiveFetcher;
