//! Content hashing utilities using BLAKE3.
//!
//! Used for:
//! - Skipping byte-identical files when mirroring the publish worktree
//! - Deriving stable workspace directory names from remote/branch pairs
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::hash_file(path)?;              // -> blake3::Hash
//! let fp = hash::fingerprint("remote|branch"); // -> "a1b2c3d4e5f6"
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Compute the BLAKE3 hash of a file's contents (streaming, for large files).
pub fn hash_file(path: &Path) -> io::Result<blake3::Hash> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 16384];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// Check whether two files have identical contents.
///
/// Compares sizes first to avoid hashing when lengths differ.
pub fn same_contents(a: &Path, b: &Path) -> io::Result<bool> {
    let meta_a = a.metadata()?;
    let meta_b = b.metadata()?;
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }
    Ok(hash_file(a)? == hash_file(b)?)
}

/// Compute a short hex fingerprint of a string.
///
/// Useful for stable directory names (e.g. publish workspace keyed by
/// remote url + branch).
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    blake3::hash(value.as_ref()).to_hex()[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_fingerprint_stable() {
        let a = fingerprint("https://example.com/repo.git|gh-pages");
        let b = fingerprint("https://example.com/repo.git|gh-pages");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_fingerprint_distinguishes_branches() {
        let a = fingerprint("https://example.com/repo.git|main");
        let b = fingerprint("https://example.com/repo.git|gh-pages");
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_contents() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let c = dir.path().join("c.txt");
        fs::write(&a, "hello").unwrap();
        fs::write(&b, "hello").unwrap();
        fs::write(&c, "world").unwrap();

        assert!(same_contents(&a, &b).unwrap());
        assert!(!same_contents(&a, &c).unwrap());
    }

    #[test]
    fn test_same_contents_length_shortcut() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "short").unwrap();
        fs::write(&b, "a bit longer").unwrap();
        assert!(!same_contents(&a, &b).unwrap());
    }
}
