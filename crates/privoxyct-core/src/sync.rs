//! The fetch → extract → select → rewrite → chown pipeline.

use log::{debug, info, warn};

use crate::action::{rewrite_action_file, RewriteStats};
use crate::categories::read_categories;
use crate::config::SyncConfig;
use crate::downloader::{ArchiveExtractor, ArchiveFetcher};
use crate::http::HttpClient;
use crate::ownership::fix_ownership;
use crate::Result;

/// File name the archive is stored under inside the scratch directory.
pub const ARCHIVE_FILE_NAME: &str = "blacklists.tar.gz";

/// Top-level directory inside the archive holding the per-category lists.
pub const ARCHIVE_LISTS_DIR: &str = "blacklists";

/// Pipeline stage, reported just before the stage starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Extract,
    Rewrite,
    Ownership,
}

/// Summary of one completed sync run.
#[derive(Debug)]
pub struct SyncReport {
    pub bytes_downloaded: u64,
    pub categories: Vec<String>,
    pub stats: RewriteStats,
    /// Set when the ownership fixup failed; the run still succeeded.
    pub ownership_warning: Option<String>,
}

/// Run the whole pipeline against `config`.
///
/// Execution is strictly sequential. Any fetch, extract, or rewrite failure
/// aborts the run with the action file untouched; an ownership failure is
/// downgraded to a warning on the report.
pub async fn run<P, S>(
    config: &SyncConfig,
    client: &HttpClient,
    progress: Option<P>,
    on_stage: S,
) -> Result<SyncReport>
where
    P: Fn(u64, u64),
    S: Fn(Stage),
{
    config.validate()?;
    std::fs::create_dir_all(&config.scratch_dir)?;

    let archive_path = config.scratch_dir.join(ARCHIVE_FILE_NAME);

    on_stage(Stage::Download);
    info!(
        "downloading {} to {}",
        config.archive_url,
        archive_path.display()
    );
    let fetcher = ArchiveFetcher::new(client);
    let bytes_downloaded = fetcher.fetch(&config.archive_url, &archive_path, progress).await?;
    debug!("downloaded {bytes_downloaded} bytes");

    on_stage(Stage::Extract);
    info!("extracting {}", archive_path.display());
    ArchiveExtractor::extract_tar_gz(&archive_path, &config.scratch_dir)?;

    let categories = read_categories(&config.categories_file)?;
    debug!("selected categories: {categories:?}");

    on_stage(Stage::Rewrite);
    let lists_dir = config.scratch_dir.join(ARCHIVE_LISTS_DIR);
    let stats = rewrite_action_file(&config.action_file, &categories, &lists_dir)?;
    info!(
        "wrote {} blocking rules to {}",
        stats.domains,
        config.action_file.display()
    );
    if !stats.missing_categories.is_empty() {
        warn!(
            "categories without a domain list: {}",
            stats.missing_categories.join(", ")
        );
    }

    on_stage(Stage::Ownership);
    let ownership_warning =
        match fix_ownership(&config.action_file, &config.owner.user, &config.owner.group) {
            Ok(()) => None,
            Err(e) => {
                warn!("{e}");
                Some(e.to_string())
            }
        };

    Ok(SyncReport {
        bytes_downloaded,
        categories,
        stats,
        ownership_warning,
    })
}
