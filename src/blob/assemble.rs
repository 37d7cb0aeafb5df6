use std::rc::Rc;

use crate::blob::Result;
use crate::blob::flatten::flatten_tree;
use crate::blob::offsets::{FrameEntry, assign_offsets};
use crate::blob::value::StructVal;
use crate::blob::varint;
use crate::blob::version::pack_version;

/// Magic constant marking the header and every struct frame ("SetT").
pub const BLOB_MAGIC: u32 = 0x5365_7454;

/// Result of one generation run: the blob plus the flattened frames.
///
/// The frames carry offsets and per-field encoded bytes so a text-emission
/// consumer can annotate every byte with struct/field provenance.
#[derive(Debug)]
pub struct EncodedBlob {
	/// The final byte buffer: header followed by struct frames.
	pub bytes: Vec<u8>,
	/// Packed version written into the header.
	pub version: u32,
	/// Frames in flattened order; the root is last.
	pub frames: Vec<FrameEntry>,
}

impl EncodedBlob {
	/// Offset of the root (top-level) struct, the maximum offset in the blob.
	pub fn root_offset(&self) -> u32 {
		self.frames.last().map_or(0, |frame| frame.offset)
	}
}

/// Encode one value tree and version string into a settings blob.
///
/// Pure single pass: flatten, assign offsets, assemble. Identical inputs
/// always produce a byte-identical buffer.
pub fn encode_defaults(root: &Rc<StructVal>, version: &str) -> Result<EncodedBlob> {
	let packed = pack_version(version)?;
	let order = flatten_tree(root)?;
	let frames = assign_offsets(&order)?;
	let bytes = assemble(packed, &frames);
	Ok(EncodedBlob {
		bytes,
		version: packed,
		frames,
	})
}

/// Concatenate the header and per-struct frames into the final buffer.
fn assemble(version: u32, frames: &[FrameEntry]) -> Vec<u8> {
	let root_offset = frames.last().map_or(0, |frame| frame.offset);
	let total = frames.iter().map(FrameEntry::frame_size).sum::<usize>() + 12;

	let mut out = Vec::with_capacity(total);
	out.extend_from_slice(&BLOB_MAGIC.to_le_bytes());
	out.extend_from_slice(&version.to_le_bytes());
	out.extend_from_slice(&root_offset.to_le_bytes());

	for frame in frames {
		out.extend_from_slice(&BLOB_MAGIC.to_le_bytes());
		out.extend_from_slice(&varint::encode_unsigned(frame.field_bytes.len() as u64));
		for data in &frame.field_bytes {
			out.extend_from_slice(data);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::encode_defaults;
	use crate::blob::schema::{FieldDef, FieldType, StructDef};
	use crate::blob::value::{StructVal, Value};

	fn example_tree() -> Rc<StructVal> {
		let def_b = Rc::new(StructDef::new("B", vec![FieldDef::new("x", FieldType::I32)]));
		let def_a = Rc::new(StructDef::new(
			"A",
			vec![
				FieldDef::new("flag", FieldType::Bool),
				FieldDef::new("b", FieldType::StructPtr(Rc::clone(&def_b))),
			],
		));
		let b = StructVal::new(def_b, vec![Value::Signed(5)]).unwrap();
		StructVal::new(def_a, vec![Value::Bool(true), Value::Struct(Some(b))]).unwrap()
	}

	#[test]
	fn example_blob_is_byte_exact() {
		let blob = encode_defaults(&example_tree(), "2.3").unwrap();

		assert_eq!(blob.root_offset(), 18);
		assert_eq!(
			blob.bytes,
			vec![
				0x54, 0x74, 0x65, 0x53, // magic 'SetT' little-endian
				0x00, 0x00, 0x03, 0x02, // version 2.3 packed
				0x12, 0x00, 0x00, 0x00, // root offset 18
				0x54, 0x74, 0x65, 0x53, 0x01, 0x0A, // B: magic, 1 field, x = 5
				0x54, 0x74, 0x65, 0x53, 0x02, 0x01, 0x0C, // A: magic, 2 fields, flag, b -> 12
			]
		);
		assert_eq!(blob.bytes.len(), 25);
	}

	#[test]
	fn identical_inputs_produce_identical_bytes() {
		let first = encode_defaults(&example_tree(), "2.3").unwrap();
		let second = encode_defaults(&example_tree(), "2.3").unwrap();
		assert_eq!(first.bytes, second.bytes);
	}

	#[test]
	fn version_lands_in_header_little_endian() {
		let blob = encode_defaults(&example_tree(), "2.1.3").unwrap();
		assert_eq!(&blob.bytes[4..8], &[0x00, 0x03, 0x01, 0x02]);
		assert_eq!(blob.version, 0x0201_0300);
	}

	#[test]
	fn bad_version_fails_before_any_output() {
		assert!(encode_defaults(&example_tree(), "1.2.3.4.5").is_err());
	}
}
