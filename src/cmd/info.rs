use std::path::PathBuf;

use setblob::blob::{encode_defaults, load_manifest};

/// Print a summary of the manifest and the blob it encodes to.
pub fn run(path: PathBuf) -> setblob::blob::Result<()> {
	let manifest = load_manifest(&path)?;
	let blob = encode_defaults(&manifest.root, &manifest.version)?;

	println!("path: {}", path.display());
	println!("version: {}", manifest.version);
	println!("packed_version: {:#010x}", blob.version);
	println!("structs: {}", manifest.structs.len());
	println!("frames: {}", blob.frames.len());
	println!("root_offset: {}", blob.root_offset());
	println!("blob_len: {}", blob.bytes.len());
	for frame in &blob.frames {
		println!("  {:#010x} {} ({} bytes)", frame.offset, frame.node.def.name, frame.frame_size());
	}

	Ok(())
}
