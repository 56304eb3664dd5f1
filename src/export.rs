//! Text produced for the two output files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::content::ContentEntry;
use crate::error::{AppError, Result};

/// Width of the separator line around each file header.
pub const SEPARATOR_WIDTH: usize = 80;

/// One path per line, newline-terminated. Empty for no paths.
pub fn export_selection(paths: &[PathBuf]) -> String {
    let mut out = String::new();
    for path in paths {
        out.push_str(&path.display().to_string());
        out.push('\n');
    }
    out
}

/// Concatenate file contents, each under a `FILE:` header.
///
/// A file that could not be read contributes an error line in place of its
/// content.
pub fn export_content(entries: &[ContentEntry]) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();
    for entry in entries {
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&format!("FILE: {}\n", entry.path.display()));
        out.push_str(&separator);
        out.push('\n');
        match &entry.content {
            Ok(text) => out.push_str(text),
            Err(e) => out.push_str(&format!("Error reading file: {e}")),
        }
        out.push_str("\n\n");
    }
    out
}

/// Write `text` to `path`, replacing any previous file.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = text.len(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};
    use tempfile::TempDir;

    #[test]
    fn selection_one_path_per_line() {
        let paths = vec![PathBuf::from("/p/c"), PathBuf::from("/p/c/d.txt"), PathBuf::from("/p/b.txt")];
        assert_eq!(export_selection(&paths), "/p/c\n/p/c/d.txt\n/p/b.txt\n");
    }

    #[test]
    fn selection_empty() {
        assert_eq!(export_selection(&[]), "");
    }

    #[test]
    fn content_headers_and_separators() {
        let entries = vec![
            ContentEntry {
                path: PathBuf::from("/p/a.txt"),
                content: Ok("alpha\n".to_string()),
            },
            ContentEntry {
                path: PathBuf::from("/p/b.txt"),
                content: Ok("beta".to_string()),
            },
        ];
        let sep = "=".repeat(80);
        let expected = format!(
            "{sep}\nFILE: /p/a.txt\n{sep}\nalpha\n\n\n{sep}\nFILE: /p/b.txt\n{sep}\nbeta\n\n"
        );
        assert_eq!(export_content(&entries), expected);
    }

    #[test]
    fn content_inlines_read_errors() {
        let entries = vec![ContentEntry {
            path: PathBuf::from("/p/locked.txt"),
            content: Err(AppError::Read {
                path: PathBuf::from("/p/locked.txt"),
                source: IoError::new(ErrorKind::PermissionDenied, "permission denied"),
            }),
        }];
        let text = export_content(&entries);
        assert!(text.contains("FILE: /p/locked.txt\n"));
        assert!(text.contains("Error reading file: Cannot read /p/locked.txt: permission denied\n\n"));
    }

    #[test]
    fn content_empty() {
        assert_eq!(export_content(&[]), "");
    }

    #[test]
    fn write_output_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("selected_directories.txt");
        write_output(&path, "/p/a\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "/p/a\n");

        write_output(&path, "/p/b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "/p/b\n");
    }

    #[test]
    fn write_output_reports_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = write_output(&path, "x").unwrap_err();
        match err {
            AppError::Write { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
