//! Source directory collection.
//!
//! Captures every visible file in the source directory as raw bytes, in
//! whatever order the filesystem enumerates them. That order carries all
//! the way through layout, so nothing here sorts.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::image::CollectedEntry;

/// Collect the files to pack from `source_dir`.
///
/// Hidden entries (names starting with `.`) are skipped. Everything else
/// must be a readable regular file; the image format has no directory
/// support, and a single unreadable entry fails the whole collection so a
/// partial image is never produced.
///
/// Files are read as raw bytes with no newline or encoding translation.
/// The recorded sizes are derived from exactly these bytes, which is what
/// keeps the header table consistent with the data region.
pub fn collect_entries(source_dir: &Path) -> Result<Vec<CollectedEntry>> {
    if !source_dir.exists() {
        bail!("source directory does not exist: {}", source_dir.display());
    }
    if !source_dir.is_dir() {
        bail!("source path is not a directory: {}", source_dir.display());
    }

    let mut entries = Vec::new();
    for dirent in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
        let dirent = dirent.with_context(|| {
            format!("reading source directory '{}'", source_dir.display())
        })?;

        let name = dirent
            .file_name()
            .to_str()
            .with_context(|| {
                format!(
                    "source file name is not valid UTF-8: {}",
                    dirent.path().display()
                )
            })?
            .to_string();
        if name.starts_with('.') {
            continue;
        }

        if !dirent.path().is_file() {
            bail!(
                "source entry is not a regular file: {} (subdirectories are not supported)",
                dirent.path().display()
            );
        }

        let content = fs::read(dirent.path())
            .with_context(|| format!("reading source file '{}'", dirent.path().display()))?;
        entries.push(CollectedEntry::new(name, content));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collects_visible_files_with_raw_bytes() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.html"), b"<html>\r\n</html>").unwrap();
        fs::write(temp.path().join("logo.png"), [0x89u8, 0x50, 0x4e, 0x47]).unwrap();

        let mut entries = collect_entries(temp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "index.html");
        // CRLF survives untouched; sizes count the on-disk bytes.
        assert_eq!(entries[0].content, b"<html>\r\n</html>");
        assert_eq!(entries[1].name, "logo.png");
        assert_eq!(entries[1].content, [0x89, 0x50, 0x4e, 0x47]);
    }

    #[test]
    fn test_hidden_entries_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitignore"), "*.image\n").unwrap();
        fs::create_dir(temp.path().join(".cache")).unwrap();
        fs::write(temp.path().join("page.html"), "ok").unwrap();

        let entries = collect_entries(temp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "page.html");
    }

    #[test]
    fn test_missing_source_directory() {
        let result = collect_entries(Path::new("/nonexistent_path_12345"));
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_source_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, "not a dir").unwrap();

        let result = collect_entries(&file);
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_subdirectory_fails_the_collection() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("page.html"), "ok").unwrap();
        fs::create_dir(temp.path().join("assets")).unwrap();

        let result = collect_entries(temp.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a regular file"));
    }

    #[test]
    fn test_empty_directory_collects_nothing() {
        let temp = TempDir::new().unwrap();
        assert!(collect_entries(temp.path()).unwrap().is_empty());
    }
}
