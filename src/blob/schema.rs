use std::rc::Rc;

/// One struct declaration: a name plus its fields in declared order.
#[derive(Debug)]
pub struct StructDef {
	/// Struct type name.
	pub name: Box<str>,
	/// Field declarations in declared (and encoded) order.
	pub fields: Vec<FieldDef>,
}

impl StructDef {
	/// Build a definition from a name and ordered fields.
	pub fn new(name: &str, fields: Vec<FieldDef>) -> Self {
		Self {
			name: name.to_owned().into_boxed_str(),
			fields,
		}
	}
}

/// One field declaration inside a [`StructDef`].
#[derive(Debug, Clone)]
pub struct FieldDef {
	/// Field name (not serialized; used for provenance and errors).
	pub name: Box<str>,
	/// Declared field type.
	pub typ: FieldType,
}

impl FieldDef {
	/// Build a field declaration.
	pub fn new(name: &str, typ: FieldType) -> Self {
		Self {
			name: name.to_owned().into_boxed_str(),
			typ,
		}
	}
}

/// Declared type of a field.
///
/// Integer variants fix the width a value must fit; every integer is still
/// varint-encoded, so the width only bounds the accepted range.
#[derive(Debug, Clone)]
pub enum FieldType {
	/// Boolean, encoded as unsigned 0 or 1.
	Bool,
	/// Unsigned 16-bit integer.
	U16,
	/// Unsigned 32-bit integer.
	U32,
	/// Unsigned 64-bit integer.
	U64,
	/// Signed 16-bit integer.
	I16,
	/// Signed 32-bit integer.
	I32,
	/// Signed 64-bit integer.
	I64,
	/// Length-prefixed NUL-terminated string.
	Str,
	/// Offset reference to another struct instance.
	StructPtr(Rc<StructDef>),
}

impl FieldType {
	/// Whether values of this type use the signed varint mapping.
	pub fn is_signed(&self) -> bool {
		matches!(self, Self::I16 | Self::I32 | Self::I64)
	}

	/// Inclusive maximum for unsigned widths, `None` for non-unsigned types.
	pub fn unsigned_max(&self) -> Option<u64> {
		match self {
			Self::U16 => Some(u64::from(u16::MAX)),
			Self::U32 => Some(u64::from(u32::MAX)),
			Self::U64 => Some(u64::MAX),
			_ => None,
		}
	}

	/// Inclusive bounds for signed widths, `None` for non-signed types.
	pub fn signed_bounds(&self) -> Option<(i64, i64)> {
		match self {
			Self::I16 => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
			Self::I32 => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
			Self::I64 => Some((i64::MIN, i64::MAX)),
			_ => None,
		}
	}

	/// Human-readable type label, matching manifest type syntax.
	pub fn label(&self) -> String {
		match self {
			Self::Bool => "bool".to_owned(),
			Self::U16 => "u16".to_owned(),
			Self::U32 => "u32".to_owned(),
			Self::U64 => "u64".to_owned(),
			Self::I16 => "i16".to_owned(),
			Self::I32 => "i32".to_owned(),
			Self::I64 => "i64".to_owned(),
			Self::Str => "str".to_owned(),
			Self::StructPtr(def) => format!("{}*", def.name),
		}
	}
}
