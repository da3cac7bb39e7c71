//! Hash algorithm registry and streaming digest support.
//!
//! The registry is a fixed table mapping canonical lowercase names to
//! digest constructors. Lookup is case-insensitive; a miss reports every
//! valid name so the caller can render a complete diagnostic.

use sha2::digest::DynDigest;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use stash_core::{Error, Result};
use std::io::Write;

/// Registry entry pairing a canonical name with a digest constructor.
#[derive(Debug)]
pub struct HashAlgorithm {
    pub name: &'static str,
    new_digest: fn() -> Box<dyn DynDigest + Send>,
}

impl HashAlgorithm {
    /// Fresh digest state for one hashing pass.
    pub fn digest(&self) -> Box<dyn DynDigest + Send> {
        (self.new_digest)()
    }
}

// Canonical names must be lowercase and unique (checked by test).
static REGISTRY: &[HashAlgorithm] = &[
    HashAlgorithm {
        name: "sha256",
        new_digest: || Box::new(Sha256::default()),
    },
    HashAlgorithm {
        name: "sha224",
        new_digest: || Box::new(Sha224::default()),
    },
    HashAlgorithm {
        name: "sha384",
        new_digest: || Box::new(Sha384::default()),
    },
    HashAlgorithm {
        name: "sha512",
        new_digest: || Box::new(Sha512::default()),
    },
];

/// Resolve an algorithm name, case-insensitively, against the registry.
pub fn resolve(name: &str) -> Result<&'static HashAlgorithm> {
    REGISTRY
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnsupportedHash {
            name: name.to_string(),
            valid: valid_names().iter().map(|n| n.to_string()).collect(),
        })
}

/// Every registered canonical name, in registry order.
pub fn valid_names() -> Vec<&'static str> {
    REGISTRY.iter().map(|a| a.name).collect()
}

/// Writer adapter that digests everything written through it.
///
/// The store wraps the compressed archive stream with this, so the digest
/// covers exactly the bytes put into the object store, in a single pass.
pub struct HashingWriter<W: Write> {
    inner: W,
    digest: Box<dyn DynDigest + Send>,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W, algorithm: &HashAlgorithm) -> Self {
        Self {
            inner,
            digest: algorithm.digest(),
        }
    }

    /// Consume the writer, returning the inner writer and the hex digest.
    pub fn finalize(self) -> (W, String) {
        (self.inner, hex::encode(self.digest.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.digest.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Digest;

    #[test]
    fn test_resolve_is_case_insensitive() {
        for name in valid_names() {
            let lower = resolve(name).expect("canonical name resolves");
            let upper = resolve(&name.to_uppercase()).expect("uppercase resolves");
            assert_eq!(lower.name, name);
            assert_eq!(upper.name, name);
        }
    }

    #[test]
    fn test_resolve_unknown_reports_all_names() {
        let err = resolve("not-a-real-algorithm").unwrap_err();
        match err {
            Error::UnsupportedHash { name, valid } => {
                assert_eq!(name, "not-a-real-algorithm");
                assert!(!valid.is_empty());
                for canonical in valid_names() {
                    assert!(valid.iter().any(|v| v.as_str() == canonical));
                }
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_duplicate_canonical_names() {
        let names = valid_names();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert!(!a.eq_ignore_ascii_case(b), "duplicate entry {a}");
            }
        }
    }

    #[test]
    fn test_hashing_writer_matches_direct_digest() {
        let algorithm = resolve("sha256").unwrap();
        let mut writer = HashingWriter::new(Vec::new(), algorithm);
        writer.write_all(b"hello ").unwrap();
        writer.write_all(b"cache").unwrap();
        let (bytes, digest) = writer.finalize();

        assert_eq!(bytes, b"hello cache");
        assert_eq!(digest, hex::encode(Sha256::digest(b"hello cache")));
    }
}
