use std::fs;
use std::path::Path;

use crate::error::{CoverError, Result};

/// Creates `p` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir<P: AsRef<Path>>(p: P) -> Result<()> {
    let p = p.as_ref();
    if !p.is_dir() {
        fs::create_dir_all(p).map_err(|source| CoverError::OutputDir {
            path: p.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

pub fn file_size<P: AsRef<Path>>(p: P) -> Result<u64> {
    Ok(fs::metadata(p)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_nested_and_idempotent() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("a").join("b").join("output");

        ensure_dir(&out).unwrap();
        assert!(out.is_dir());

        ensure_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("output");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = ensure_dir(blocker.join("nested")).unwrap_err();
        assert!(matches!(err, CoverError::OutputDir { .. }));
    }

    #[test]
    fn test_file_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.png");
        std::fs::write(&path, vec![0u8; 3000]).unwrap();

        assert_eq!(file_size(&path).unwrap(), 3000);
        assert!(file_size(dir.path().join("missing.png")).is_err());
    }
}
