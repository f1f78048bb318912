//! Gzipped tar extraction into the scratch directory.

use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path};

use flate2::read::GzDecoder;

use crate::{PrivoxyctError, Result};

/// Archive extractor for the blacklists tarball.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract a gzip-compressed tar archive into `dest_dir`, preserving
    /// relative entry paths.
    ///
    /// Entries with absolute paths or parent-directory components are
    /// rejected so a crafted archive cannot write outside `dest_dir`.
    pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;

        let file = File::open(archive_path)?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let mut archive = tar::Archive::new(decoder);

        let entries = archive
            .entries()
            .map_err(|e| extraction_error(archive_path, format!("failed to read archive: {e}")))?;

        for entry in entries {
            let mut entry = entry
                .map_err(|e| extraction_error(archive_path, format!("failed to read entry: {e}")))?;

            let path = entry
                .path()
                .map_err(|e| extraction_error(archive_path, format!("invalid entry path: {e}")))?
                .into_owned();

            if !is_safe_entry_path(&path) {
                return Err(extraction_error(
                    archive_path,
                    format!("unsafe path in archive: {}", path.display()),
                ));
            }

            let outpath = dest_dir.join(&path);

            if entry.header().entry_type().is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                entry
                    .unpack(&outpath)
                    .map_err(|e| extraction_error(archive_path, format!("failed to unpack {}: {e}", path.display())))?;
            }
        }

        Ok(())
    }
}

/// An entry path is safe when it resolves strictly below the destination:
/// only normal components (and `.`) are allowed.
fn is_safe_entry_path(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn extraction_error(archive: &Path, reason: String) -> PrivoxyctError {
    PrivoxyctError::Extraction {
        archive: archive.to_path_buf(),
        reason,
    }
}
