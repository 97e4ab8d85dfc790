//! Executable lookup across search folders and the process `PATH`.

use std::env;
use std::path::PathBuf;
use tracing::trace;

/// Find the first folder containing a file named `bin`.
///
/// Search order: each folder in `extra_folders` as given, then every
/// directory on the process's own executable search path. The check is
/// existence-only; a non-executable file is rejected later by invocation
/// itself.
#[must_use]
pub fn locate(bin: &str, extra_folders: &[PathBuf]) -> Option<PathBuf> {
    for folder in extra_folders {
        let candidate = folder.join(bin);
        if candidate.is_file() {
            trace!(candidate = %candidate.display(), "binary found in search folder");
            return Some(candidate);
        }
    }

    let search_path = env::var_os("PATH")?;
    for folder in env::split_paths(&search_path) {
        let candidate = folder.join(bin);
        if candidate.is_file() {
            trace!(candidate = %candidate.display(), "binary found on PATH");
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_locate_in_extra_folder() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("mytool");
        fs::write(&path, "stub").expect("write stub");

        let found = locate("mytool", &[dir.path().to_path_buf()]);
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_locate_respects_folder_order() {
        let first = TempDir::new().expect("tempdir");
        let second = TempDir::new().expect("tempdir");
        fs::write(first.path().join("mytool"), "stub").expect("write stub");
        fs::write(second.path().join("mytool"), "stub").expect("write stub");

        let found = locate(
            "mytool",
            &[first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(found, Some(first.path().join("mytool")));
    }

    #[test]
    fn test_locate_skips_folders_without_the_binary() {
        let empty = TempDir::new().expect("tempdir");
        let holding = TempDir::new().expect("tempdir");
        fs::write(holding.path().join("mytool"), "stub").expect("write stub");

        let found = locate(
            "mytool",
            &[empty.path().to_path_buf(), holding.path().to_path_buf()],
        );
        assert_eq!(found, Some(holding.path().join("mytool")));
    }

    #[test]
    fn test_locate_missing_binary() {
        let dir = TempDir::new().expect("tempdir");
        assert!(locate("definitely-not-installed-anywhere", &[dir.path().to_path_buf()]).is_none());
    }

    #[test]
    fn test_locate_ignores_directories_with_matching_name() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir(dir.path().join("mytool")).expect("create dir");
        assert!(locate("mytool", &[dir.path().to_path_buf()]).is_none());
    }
}
