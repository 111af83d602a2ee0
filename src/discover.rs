//! Expand command-line paths into the list of documents to convert.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;

/// Extensions treated as markdown when walking a directory.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Expand `paths` into documents, in argument order.
///
/// Files are taken as given, whatever their extension. Directories are walked
/// recursively for markdown files in sorted order, filtered through the
/// config's include/exclude prefixes, matched against paths relative to
/// `working_dir`.
///
/// # Errors
///
/// Returns `Error::Io` if a directory cannot be walked.
pub fn collect_documents(
    paths: &[PathBuf],
    config: &Config,
    working_dir: &Path,
) -> Result<Vec<PathBuf>, Error> {
    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_directory(path, config, working_dir, &mut documents)?;
        } else {
            documents.push(path.clone());
        }
    }
    return Ok(documents);
}

/// Whether a walked file looks like markdown.
fn is_markdown(path: &Path) -> bool {
    return path
        .extension()
        .and_then(|ext| return ext.to_str())
        .is_some_and(|ext| return DOCUMENT_EXTENSIONS.iter().any(|d| return ext.eq_ignore_ascii_case(d)));
}

/// Collect markdown files under `root`.
///
/// # Errors
///
/// Returns `Error::Io` if walking fails.
fn walk_directory(
    root: &Path,
    config: &Config,
    working_dir: &Path,
    documents: &mut Vec<PathBuf>,
) -> Result<(), Error> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| return Error::Io(e.into()))?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(working_dir)
            .or_else(|_| return entry.path().strip_prefix("."))
            .unwrap_or(entry.path());
        if !config.should_scan(&relative.to_string_lossy()) {
            continue;
        }
        documents.push(entry.path().to_path_buf());
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_directories_for_markdown_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        std::fs::write(dir.path().join("docs/b.md"), "").unwrap();
        std::fs::write(dir.path().join("docs/a.markdown"), "").unwrap();
        std::fs::write(dir.path().join("docs/sub/c.MD"), "").unwrap();
        std::fs::write(dir.path().join("docs/logo.png"), "").unwrap();

        let found = collect_documents(&[dir.path().join("docs")], &Config::default(), dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("docs/a.markdown"),
                PathBuf::from("docs/b.md"),
                PathBuf::from("docs/sub/c.MD"),
            ]
        );
    }

    #[test]
    fn explicit_files_pass_through() {
        let files = vec![PathBuf::from("notes.txt"), PathBuf::from("missing.md")];
        assert_eq!(collect_documents(&files, &Config::default(), Path::new("/work")).unwrap(), files);
    }

    #[test]
    fn walked_documents_respect_exclude() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("keep.md"), "").unwrap();
        std::fs::write(dir.path().join("skip.md"), "").unwrap();
        let config = Config::parse("exclude = [\"skip\"]").unwrap();

        let found = collect_documents(&[dir.path().to_path_buf()], &config, dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("keep.md")]);
    }

    #[test]
    fn absolute_directory_argument_matches_relative_include() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/guide.md"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        let config = Config::parse("include = [\"docs/\"]").unwrap();

        let found = collect_documents(&[dir.path().to_path_buf()], &config, dir.path()).unwrap();
        assert_eq!(found, vec![dir.path().join("docs/guide.md")]);
    }
}
