//! Token directory scanner.
//!
//! Recursively finds token set files so the metadata can be checked against
//! what is actually on disk and `dtk init` can propose a manifest.

use std::path::Path;

use walkdir::WalkDir;

use super::manifest::Manifest;

/// JSON files in the token directory that are not token sets.
const RESERVED_FILES: &[&str] = &["$metadata.json", "$themes.json"];

/// Find every token set under `root`, named the way metadata names them:
/// relative path, `/`-separated, without the `.json` extension. Sorted.
pub fn scan_token_sets(root: &Path, manifest: &Manifest) -> Vec<String> {
    let mut sets = Vec::new();

    if !root.exists() {
        return sets;
    }

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_dir() || manifest.is_excluded(path) {
            continue;
        }

        if let Some(name) = set_name(root, path, manifest) {
            sets.push(name);
        }
    }

    sets.sort();
    sets
}

/// Map a file path to its token set name, `None` for non-set files.
pub fn set_name(root: &Path, path: &Path, manifest: &Manifest) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name == manifest.metadata || RESERVED_FILES.contains(&file_name) {
        return None;
    }

    let relative = path.strip_prefix(root).ok()?;
    let relative = relative.to_str()?.replace('\\', "/");
    relative.strip_suffix(".json").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_nested_sets() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("semantics")).unwrap();
        fs::write(dir.path().join("core.json"), "{}").unwrap();
        fs::write(dir.path().join("semantics/color attendee.json"), "{}").unwrap();
        fs::write(dir.path().join("$metadata.json"), "{}").unwrap();
        fs::write(dir.path().join("$themes.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();

        let sets = scan_token_sets(dir.path(), &Manifest::default());
        assert_eq!(sets, vec!["core", "semantics/color attendee"]);
    }

    #[test]
    fn test_scan_honours_excludes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("core.json"), "{}").unwrap();
        fs::write(dir.path().join("drafts/new.json"), "{}").unwrap();

        let manifest = Manifest {
            excludes: vec!["**/drafts/*".to_string()],
            ..Default::default()
        };
        assert_eq!(scan_token_sets(dir.path(), &manifest), vec!["core"]);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let sets = scan_token_sets(Path::new("/nonexistent/tokens"), &Manifest::default());
        assert!(sets.is_empty());
    }
}
