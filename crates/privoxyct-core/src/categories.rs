//! Category selection.
//!
//! The categories file lists one archive category per line. Order matters:
//! rules are generated in the order categories are listed here.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::{PrivoxyctError, Result};

/// Read the ordered category selection from `path`.
///
/// Lines are whitespace-trimmed; blank lines are dropped. Duplicates are
/// kept, so listing a category twice emits its rules twice.
pub fn read_categories(path: &Path) -> Result<Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PrivoxyctError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let mut categories = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            categories.push(trimmed.to_string());
        }
    }

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_categories(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("categories.txt");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_reads_categories_in_order() {
        let temp = TempDir::new().unwrap();
        let path = write_categories(&temp, "ads\nmalware\nphishing\n");

        let categories = read_categories(&path).unwrap();
        assert_eq!(categories, vec!["ads", "malware", "phishing"]);
    }

    #[test]
    fn test_trims_and_skips_blank_lines() {
        let temp = TempDir::new().unwrap();
        let path = write_categories(&temp, "  ads  \n\n\t\nmalware\n   \n");

        let categories = read_categories(&path).unwrap();
        assert_eq!(categories, vec!["ads", "malware"]);
    }

    #[test]
    fn test_keeps_duplicates() {
        let temp = TempDir::new().unwrap();
        let path = write_categories(&temp, "ads\nads\n");

        let categories = read_categories(&path).unwrap();
        assert_eq!(categories, vec!["ads", "ads"]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.txt");

        let result = read_categories(&path);
        match result {
            Err(PrivoxyctError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_file_is_empty_selection() {
        let temp = TempDir::new().unwrap();
        let path = write_categories(&temp, "");

        let categories = read_categories(&path).unwrap();
        assert!(categories.is_empty());
    }
}
