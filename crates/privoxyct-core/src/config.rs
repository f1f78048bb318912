//! Configuration for a sync run.
//!
//! Every path and the archive URL used to be hard-coded; they now live in an
//! explicit [`SyncConfig`] so each component can be pointed at arbitrary
//! locations (which is also what makes the pipeline testable). Values come
//! from an optional `privoxyct.toml`, with defaults matching the classic
//! Privoxy deployment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::{PrivoxyctError, Result};

/// Default location of the UT Capitole blacklist archive.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://dsi.ut-capitole.fr/blacklists/download/blacklists.tar.gz";

/// The main privoxyct configuration (privoxyct.toml)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// URL of the gzip-compressed blacklist tarball
    pub archive_url: String,

    /// File listing the categories to include, one per line
    pub categories_file: PathBuf,

    /// Privoxy action file carrying the managed block
    pub action_file: PathBuf,

    /// Scratch directory for the downloaded and extracted archive
    pub scratch_dir: PathBuf,

    /// Ownership applied to the action file after the rewrite
    pub owner: OwnerConfig,

    /// HTTP transfer tuning
    pub http: HttpConfig,
}

/// Expected owner of the rewritten action file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OwnerConfig {
    pub user: String,
    pub group: String,
}

/// HTTP transfer tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Overall request timeout in seconds
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            categories_file: PathBuf::from("categories.txt"),
            action_file: PathBuf::from("/etc/privoxy/user.action"),
            scratch_dir: std::env::temp_dir().join("privoxy_blacklist"),
            owner: OwnerConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            user: "privoxy".to_string(),
            group: "root".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 600,
            connect_timeout_secs: 10,
        }
    }
}

impl SyncConfig {
    /// Load configuration from a TOML file, returning `None` when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)?;
        let config: SyncConfig = toml::from_str(&contents).map_err(|e| {
            PrivoxyctError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;

        Ok(Some(config))
    }

    /// Reject configurations the pipeline cannot act on.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.archive_url).map_err(|e| {
            PrivoxyctError::Config(format!("invalid archive URL {}: {e}", self.archive_url))
        })?;
        Ok(())
    }
}
