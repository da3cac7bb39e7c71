//! Tar packing and extraction layered over the compression codecs.

use crate::compression::{CompressWriter, decode_reader};
use crate::types::CompressionScheme;
use stash_core::{Error, Result};
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Archive entry name for one requested path.
///
/// Tar entry names must be relative. Relative paths keep their name;
/// absolute paths are stored under their base-stripped name, or under
/// their final component when they live outside `base_dir` (the stack
/// root is the usual case).
fn entry_name(path: &Path, base_dir: &Path) -> PathBuf {
    if !path.is_absolute() {
        return path.to_path_buf();
    }
    match path.strip_prefix(base_dir) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.file_name().map(PathBuf::from).unwrap_or_else(|| {
            path.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect()
        }),
    }
}

/// Pack `paths` into a compressed tar stream written to `writer`.
///
/// Relative paths are resolved against `base_dir`; entry names come from
/// [`entry_name`]. Missing paths are skipped with a warning rather than
/// failing the save. Returns the inner writer after the trailing
/// compression frames flush.
pub fn pack<W: Write>(
    writer: W,
    paths: &[PathBuf],
    base_dir: &Path,
    scheme: CompressionScheme,
) -> Result<W> {
    let mut encoder = CompressWriter::new(scheme, writer);
    {
        let mut builder = tar::Builder::new(&mut encoder);
        for path in paths {
            let abs_path = if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            };
            if !abs_path.exists() {
                warn!(path = %abs_path.display(), "Skipping missing path");
                continue;
            }
            let name = entry_name(path, base_dir);

            if abs_path.is_dir() {
                builder.append_dir_all(&name, &abs_path).map_err(|e| {
                    Error::Archive(format!("Failed to pack dir {}: {}", abs_path.display(), e))
                })?;
            } else {
                builder.append_path_with_name(&abs_path, &name).map_err(|e| {
                    Error::Archive(format!("Failed to pack file {}: {}", abs_path.display(), e))
                })?;
            }
        }
        builder
            .finish()
            .map_err(|e| Error::Archive(format!("Failed to finish tar: {}", e)))?;
    }
    encoder.finish()
}

/// Decode `reader` with `scheme` and extract the tar entries into `dest`.
pub fn unpack<R: Read>(reader: R, scheme: CompressionScheme, dest: &Path) -> Result<()> {
    let decoder = decode_reader(scheme, reader);
    let mut archive = tar::Archive::new(decoder);
    archive
        .unpack(dest)
        .map_err(|e| Error::Unpack(format!("Failed to unpack into {}: {}", dest.display(), e)))
}
