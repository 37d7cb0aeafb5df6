use std::collections::HashMap;
use std::rc::Rc;

use crate::blob::schema::{FieldDef, FieldType};
use crate::blob::value::{StructVal, Value, node_id};
use crate::blob::varint;
use crate::blob::{GenError, Result};

/// Header size in bytes: 4 magic + 4 version + 4 root offset.
pub const HEADER_SIZE: u32 = 12;

/// Size of the per-frame magic marker in bytes.
pub const FRAME_MAGIC_SIZE: u32 = 4;

/// One struct instance with its assigned offset and encoded field bytes.
///
/// Produced once per node in flattened order; immutable once assigned.
#[derive(Debug)]
pub struct FrameEntry {
	/// The struct instance this frame encodes.
	pub node: Rc<StructVal>,
	/// Byte offset of the frame start within the blob.
	pub offset: u32,
	/// Encoded bytes per field, in declared order.
	pub field_bytes: Vec<Vec<u8>>,
}

impl FrameEntry {
	/// Total frame size: magic + field-count varint + field bytes.
	pub fn frame_size(&self) -> usize {
		let count_len = varint::encode_unsigned(self.field_bytes.len() as u64).len();
		let fields_len: usize = self.field_bytes.iter().map(Vec::len).sum();
		FRAME_MAGIC_SIZE as usize + count_len + fields_len
	}
}

/// Walk the flattened order, assign monotonically increasing offsets, and
/// encode every field.
///
/// The cursor starts at [`HEADER_SIZE`]. Each struct records its offset,
/// encodes its fields (struct references resolve to the target's already
/// assigned offset, which must be non-zero and strictly below this struct's
/// own offset), then advances the cursor past the frame overhead so later
/// offsets account for this struct's full emitted size.
pub fn assign_offsets(order: &[Rc<StructVal>]) -> Result<Vec<FrameEntry>> {
	let mut assigned: HashMap<usize, u32> = HashMap::new();
	let mut entries = Vec::with_capacity(order.len());
	let mut cursor = u64::from(HEADER_SIZE);

	for node in order {
		let offset = u32::try_from(cursor).map_err(|_| GenError::BlobTooLarge { len: cursor })?;

		let mut field_bytes = Vec::with_capacity(node.values.len());
		for (field, value) in node.def.fields.iter().zip(&node.values) {
			let data = encode_field(node, field, value, offset, &assigned)?;
			cursor += data.len() as u64;
			field_bytes.push(data);
		}

		let count_len = varint::encode_unsigned(node.values.len() as u64).len() as u64;
		cursor += u64::from(FRAME_MAGIC_SIZE) + count_len;
		if cursor > u64::from(u32::MAX) {
			return Err(GenError::BlobTooLarge { len: cursor });
		}

		assigned.insert(node_id(node), offset);
		entries.push(FrameEntry {
			node: Rc::clone(node),
			offset,
			field_bytes,
		});
	}

	Ok(entries)
}

fn encode_field(
	node: &StructVal,
	field: &FieldDef,
	value: &Value,
	struct_offset: u32,
	assigned: &HashMap<usize, u32>,
) -> Result<Vec<u8>> {
	match (&field.typ, value) {
		(FieldType::Bool, Value::Bool(flag)) => Ok(varint::encode_unsigned(u64::from(*flag))),
		(typ @ (FieldType::U16 | FieldType::U32 | FieldType::U64), Value::Unsigned(raw)) => {
			let max = typ.unsigned_max().unwrap_or(u64::MAX);
			if *raw > max {
				return Err(GenError::UnsignedOutOfRange {
					struct_name: node.def.name.to_string(),
					field: field.name.to_string(),
					value: *raw,
					max,
				});
			}
			Ok(varint::encode_unsigned(*raw))
		}
		(typ @ (FieldType::I16 | FieldType::I32 | FieldType::I64), Value::Signed(raw)) => {
			let (min, max) = typ.signed_bounds().unwrap_or((i64::MIN, i64::MAX));
			if *raw < min || *raw > max {
				return Err(GenError::SignedOutOfRange {
					struct_name: node.def.name.to_string(),
					field: field.name.to_string(),
					value: *raw,
					min,
					max,
				});
			}
			Ok(varint::encode_signed(*raw))
		}
		(FieldType::Str, Value::Str(text)) => Ok(varint::encode_string(text)),
		(FieldType::StructPtr(def), Value::Struct(target)) => match target {
			None => Ok(varint::encode_unsigned(0)),
			Some(child) => {
				if !Rc::ptr_eq(def, &child.def) {
					return Err(GenError::TypeMismatch {
						struct_name: node.def.name.to_string(),
						field: field.name.to_string(),
						expected: field.typ.label(),
						got: child.def.name.to_string(),
					});
				}
				let child_offset = assigned.get(&node_id(child)).copied().ok_or_else(|| GenError::UnresolvedReference {
					struct_name: node.def.name.to_string(),
					field: field.name.to_string(),
				})?;
				if child_offset == 0 || child_offset >= struct_offset {
					return Err(GenError::ForwardReference {
						struct_name: node.def.name.to_string(),
						field: field.name.to_string(),
						offset: child_offset,
						limit: struct_offset,
					});
				}
				Ok(varint::encode_unsigned(u64::from(child_offset)))
			}
		},
		(typ, other) => Err(GenError::TypeMismatch {
			struct_name: node.def.name.to_string(),
			field: field.name.to_string(),
			expected: typ.label(),
			got: other.kind().to_owned(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::{HEADER_SIZE, assign_offsets};
	use crate::blob::error::GenError;
	use crate::blob::flatten::flatten_tree;
	use crate::blob::schema::{FieldDef, FieldType, StructDef};
	use crate::blob::value::{StructVal, Value};

	fn example_tree() -> Rc<StructVal> {
		// A { bool flag; B* b; }, B { i32 x; }, defaults flag=true, x=5.
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
	fn example_offsets_match_frame_sizes() {
		let root = example_tree();
		let order = flatten_tree(&root).unwrap();
		let entries = assign_offsets(&order).unwrap();

		assert_eq!(entries.len(), 2);
		assert_eq!(&*entries[0].node.def.name, "B");
		assert_eq!(entries[0].offset, 12);
		assert_eq!(entries[0].frame_size(), 6);
		assert_eq!(&*entries[1].node.def.name, "A");
		assert_eq!(entries[1].offset, 18);
		assert_eq!(entries[1].frame_size(), 7);
		// flag encodes as 0x01, b as uvarint of B's offset.
		assert_eq!(entries[1].field_bytes[0], vec![0x01]);
		assert_eq!(entries[1].field_bytes[1], vec![0x0C]);
	}

	#[test]
	fn offsets_increase_monotonically() {
		let root = example_tree();
		let order = flatten_tree(&root).unwrap();
		let entries = assign_offsets(&order).unwrap();

		let mut expected = HEADER_SIZE as usize;
		for entry in &entries {
			assert_eq!(entry.offset as usize, expected);
			expected += entry.frame_size();
		}
	}

	#[test]
	fn absent_reference_encodes_zero() {
		let def_b = Rc::new(StructDef::new("B", vec![FieldDef::new("x", FieldType::I32)]));
		let def_a = Rc::new(StructDef::new("A", vec![FieldDef::new("b", FieldType::StructPtr(def_b))]));
		let root = StructVal::new(def_a, vec![Value::Struct(None)]).unwrap();

		let order = flatten_tree(&root).unwrap();
		let entries = assign_offsets(&order).unwrap();
		assert_eq!(entries[0].field_bytes[0], vec![0x00]);
	}

	#[test]
	fn unflattened_reference_is_unresolved() {
		let def_b = Rc::new(StructDef::new("B", vec![FieldDef::new("x", FieldType::I32)]));
		let def_a = Rc::new(StructDef::new("A", vec![FieldDef::new("b", FieldType::StructPtr(Rc::clone(&def_b)))]));
		let b = StructVal::new(def_b, vec![Value::Signed(1)]).unwrap();
		let root = StructVal::new(def_a, vec![Value::Struct(Some(b))]).unwrap();

		// Hand the assigner only the root, bypassing flattening.
		let err = assign_offsets(std::slice::from_ref(&root)).unwrap_err();
		assert!(matches!(err, GenError::UnresolvedReference { .. }));
	}

	#[test]
	fn wrong_value_kind_is_a_type_mismatch() {
		let def = Rc::new(StructDef::new("A", vec![FieldDef::new("flag", FieldType::Bool)]));
		let root = StructVal::new(def, vec![Value::Signed(1)]).unwrap();

		let err = assign_offsets(std::slice::from_ref(&root)).unwrap_err();
		assert!(matches!(err, GenError::TypeMismatch { .. }));
	}

	#[test]
	fn narrow_width_rejects_wide_values() {
		let def = Rc::new(StructDef::new("A", vec![FieldDef::new("n", FieldType::U16)]));
		let root = StructVal::new(def, vec![Value::Unsigned(70_000)]).unwrap();
		let err = assign_offsets(std::slice::from_ref(&root)).unwrap_err();
		assert!(matches!(err, GenError::UnsignedOutOfRange { value: 70_000, max: 65_535, .. }));

		let def = Rc::new(StructDef::new("A", vec![FieldDef::new("n", FieldType::I16)]));
		let root = StructVal::new(def, vec![Value::Signed(-40_000)]).unwrap();
		let err = assign_offsets(std::slice::from_ref(&root)).unwrap_err();
		assert!(matches!(err, GenError::SignedOutOfRange { value: -40_000, .. }));
	}

	#[test]
	fn mismatched_struct_definition_is_a_type_mismatch() {
		let def_b = Rc::new(StructDef::new("B", vec![FieldDef::new("x", FieldType::I32)]));
		let def_c = Rc::new(StructDef::new("C", vec![FieldDef::new("x", FieldType::I32)]));
		let def_a = Rc::new(StructDef::new("A", vec![FieldDef::new("b", FieldType::StructPtr(def_b))]));
		let c = StructVal::new(def_c, vec![Value::Signed(1)]).unwrap();
		let root = StructVal::new(def_a, vec![Value::Struct(Some(Rc::clone(&c)))]).unwrap();

		let err = assign_offsets(&[c, root]).unwrap_err();
		assert!(matches!(err, GenError::TypeMismatch { .. }));
	}
}
