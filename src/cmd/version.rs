use setblob::blob::pack_version;

/// Pack a version string and print the ordered 32-bit form.
pub fn run(version: &str) -> setblob::blob::Result<()> {
	let packed = pack_version(version)?;
	println!("version: {version}");
	println!("packed: {packed:#010x}");
	Ok(())
}
