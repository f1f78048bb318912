//! Managed-block rewriting of Privoxy's `user.action` file.
//!
//! The file is treated as preamble, one marker-delimited managed block, and
//! trailer. Everything outside the block is copied byte-for-byte; the block
//! itself is regenerated from scratch on every run, so the result is
//! idempotent and never accumulates stale domains.
//!
//! The rewrite goes through a temp file in the target's directory followed by
//! a rename, so concurrent readers never observe a half-written file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::Result;

pub const START_MARKER: &str = "# BEGIN PRIVOCYCT BLOCK";
pub const END_MARKER: &str = "# END PRIVOCYCT BLOCK";
pub const BLOCK_HEADER: &str = "{ +block }";

/// Per-category domain list file name inside the extracted archive.
const DOMAINS_FILE: &str = "domains";

/// Outcome of one rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Number of blocking rules emitted into the managed block.
    pub domains: usize,
    /// Selected categories whose domain list was absent from the archive.
    pub missing_categories: Vec<String>,
    /// Whether an existing managed block was replaced (as opposed to the
    /// block being appended or the file being created).
    pub replaced_existing_block: bool,
}

/// Rewrite the managed block of `target` from the selected categories.
///
/// Each category's domains are read from `<lists_dir>/<category>/domains`.
/// Categories without a domain list contribute nothing and do not fail the
/// run. If `target` does not exist it is created containing exactly the
/// managed block.
pub fn rewrite_action_file(
    target: &Path,
    categories: &[String],
    lists_dir: &Path,
) -> Result<RewriteStats> {
    let source = match File::open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // Fresh target: nothing to preserve, write the block directly.
            let mut stats = RewriteStats::default();
            let mut dst = BufWriter::new(File::create(target)?);
            write_block(&mut dst, categories, lists_dir, &mut stats)?;
            dst.flush()?;
            return Ok(stats);
        }
        Err(e) => return Err(e.into()),
    };

    let parent = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(parent)?;
    let mut stats = RewriteStats::default();

    {
        let mut src = BufReader::new(source);
        let mut dst = BufWriter::new(tmp.as_file());
        let mut line: Vec<u8> = Vec::new();
        let mut in_block = false;
        let mut block_written = false;
        let mut copied_any = false;

        loop {
            line.clear();
            if src.read_until(b'\n', &mut line)? == 0 {
                break;
            }

            // Marker comparison tolerates surrounding whitespace; copying
            // does not touch the original bytes.
            let trimmed_is = |marker: &str| {
                String::from_utf8_lossy(&line).trim() == marker
            };

            if trimmed_is(START_MARKER) {
                in_block = true;
                if !block_written {
                    write_block(&mut dst, categories, lists_dir, &mut stats)?;
                    block_written = true;
                    stats.replaced_existing_block = true;
                }
                continue;
            }

            // End markers are never copied, whether or not a block is open.
            if trimmed_is(END_MARKER) {
                in_block = false;
                continue;
            }

            if !in_block {
                dst.write_all(&line)?;
                copied_any = true;
            }
        }

        if !block_written {
            if copied_any {
                dst.write_all(b"\n")?;
            }
            write_block(&mut dst, categories, lists_dir, &mut stats)?;
        }

        dst.flush()?;
    }

    // Atomic swap; on any earlier failure the temp file is simply dropped
    // and the target keeps its old content.
    tmp.persist(target).map_err(|e| e.error)?;

    Ok(stats)
}

/// Emit the full managed block: start marker, header directive, one
/// `.domain` rule per qualifying line, end marker.
fn write_block<W: Write>(
    dst: &mut W,
    categories: &[String],
    lists_dir: &Path,
    stats: &mut RewriteStats,
) -> Result<()> {
    writeln!(dst, "{START_MARKER}")?;
    writeln!(dst, "{BLOCK_HEADER}")?;

    for category in categories {
        let list_path = lists_dir.join(category).join(DOMAINS_FILE);
        let file = match File::open(&list_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                stats.missing_categories.push(category.clone());
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        for line in BufReader::new(file).lines() {
            let line = line?;
            let domain = line.trim();
            if domain.is_empty() || domain.starts_with('#') {
                continue;
            }
            writeln!(dst, ".{domain}")?;
            stats.domains += 1;
        }
    }

    writeln!(dst, "{END_MARKER}")?;
    Ok(())
}
