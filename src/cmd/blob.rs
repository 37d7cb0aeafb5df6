use std::path::PathBuf;

use setblob::blob::{encode_defaults, load_manifest};

/// Encode the manifest and write the blob to `out`.
///
/// Encoding happens fully in memory first; on any error the output file is
/// never created or overwritten.
pub fn run(path: PathBuf, out: PathBuf) -> setblob::blob::Result<()> {
	let manifest = load_manifest(&path)?;
	let blob = encode_defaults(&manifest.root, &manifest.version)?;

	std::fs::write(&out, &blob.bytes)?;

	println!("path: {}", out.display());
	println!("version: {}", manifest.version);
	println!("root_offset: {}", blob.root_offset());
	println!("bytes: {}", blob.bytes.len());

	Ok(())
}
