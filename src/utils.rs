// src/utils.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Make a user-typed name safe to use as a single file name component.
/// Path separators, characters rejected by common file systems and control
/// characters become `_`; spaces and letters are kept.
pub fn sanitize_file_component(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Absolute paths are kept, relative ones are joined onto `base`
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

pub fn write_file_safe(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_component() {
        assert_eq!(sanitize_file_component("John Doe"), "John Doe");
        assert_eq!(sanitize_file_component("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_file_component("a\\b:c"), "a_b_c");
        assert_eq!(sanitize_file_component("tab\there"), "tab_here");
        assert_eq!(sanitize_file_component("  Zoë  "), "Zoë");
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            resolve_path(base, Path::new("out")),
            PathBuf::from("/srv/app/out")
        );
        assert_eq!(
            resolve_path(base, Path::new("/var/data")),
            PathBuf::from("/var/data")
        );
    }

    #[test]
    fn test_write_file_safe_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("file.txt");
        write_file_safe(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
