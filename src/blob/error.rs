use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, GenError>;

/// Errors produced while parsing manifests and generating settings blobs.
#[derive(Debug, Error)]
pub enum GenError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Manifest document is not valid JSON.
	#[error("manifest json: {0}")]
	Json(#[from] serde_json::Error),
	/// Version string has more than four dotted components.
	#[error("version {version:?} has {count} components (max 4)")]
	VersionTooManyComponents {
		/// Offending version string.
		version: String,
		/// Number of dotted components found.
		count: usize,
	},
	/// Version component is empty or not a decimal number.
	#[error("version {version:?} has non-numeric component {component:?}")]
	VersionComponentInvalid {
		/// Offending version string.
		version: String,
		/// Component text that failed to parse.
		component: String,
	},
	/// Version component lies outside the packable range.
	#[error("version {version:?} component {component} outside [1, 254]")]
	VersionComponentOutOfRange {
		/// Offending version string.
		version: String,
		/// Parsed component value.
		component: u32,
	},
	/// Struct value carries a different number of values than its definition
	/// declares fields.
	#[error("struct {struct_name} has {got} values for {expected} declared fields")]
	FieldCountMismatch {
		/// Struct definition name.
		struct_name: String,
		/// Declared field count.
		expected: usize,
		/// Provided value count.
		got: usize,
	},
	/// Field value kind does not match the declared field type.
	#[error("type mismatch on {struct_name}.{field}: expected {expected}, got {got}")]
	TypeMismatch {
		/// Struct definition name.
		struct_name: String,
		/// Field name.
		field: String,
		/// Declared type label.
		expected: String,
		/// Actual value kind or struct name.
		got: String,
	},
	/// Unsigned value exceeds the declared field width.
	#[error("value {value} too large for {struct_name}.{field} (max {max})")]
	UnsignedOutOfRange {
		/// Struct definition name.
		struct_name: String,
		/// Field name.
		field: String,
		/// Offending value.
		value: u64,
		/// Maximum representable value for the declared width.
		max: u64,
	},
	/// Signed value exceeds the declared field width.
	#[error("value {value} outside [{min}, {max}] for {struct_name}.{field}")]
	SignedOutOfRange {
		/// Struct definition name.
		struct_name: String,
		/// Field name.
		field: String,
		/// Offending value.
		value: i64,
		/// Minimum representable value for the declared width.
		min: i64,
		/// Maximum representable value for the declared width.
		max: i64,
	},
	/// Struct-reference field points at a node the flattener never visited.
	#[error("unresolved reference {struct_name}.{field}: target has no assigned offset")]
	UnresolvedReference {
		/// Referencing struct name.
		struct_name: String,
		/// Referencing field name.
		field: String,
	},
	/// Struct-reference offset does not point strictly backwards.
	#[error("forward reference {struct_name}.{field}: target offset {offset:#x} not below {limit:#x}")]
	ForwardReference {
		/// Referencing struct name.
		struct_name: String,
		/// Referencing field name.
		field: String,
		/// Resolved target offset.
		offset: u32,
		/// Offset of the referencing struct.
		limit: u32,
	},
	/// Encoded output grew past the 32-bit offset space.
	#[error("blob too large: cursor {len} exceeds u32 offsets")]
	BlobTooLarge {
		/// Byte cursor value that overflowed.
		len: u64,
	},
	/// Varint input ended before the declared payload.
	#[error("varint truncated: need {need} bytes, have {have}")]
	VarintTruncated {
		/// Bytes required by the prefix.
		need: usize,
		/// Bytes actually available.
		have: usize,
	},
	/// Varint prefix declares a payload wider than 64 bits.
	#[error("varint payload of {len} bytes exceeds 64-bit width")]
	VarintOverlong {
		/// Declared payload byte length.
		len: usize,
	},
	/// Manifest field declares an unknown type name.
	#[error("unknown field type {type_name:?} on {struct_name}.{field}")]
	UnknownFieldType {
		/// Struct being declared.
		struct_name: String,
		/// Field being declared.
		field: String,
		/// Unrecognized type text.
		type_name: String,
	},
	/// Manifest references a struct definition that does not exist (or is
	/// declared later; definitions may only reference earlier structs).
	#[error("unknown struct {name:?} (structs may only reference earlier definitions)")]
	UnknownStruct {
		/// Requested struct name.
		name: String,
	},
	/// Manifest declares two structs with the same name.
	#[error("duplicate struct definition {name:?}")]
	DuplicateStruct {
		/// Duplicated struct name.
		name: String,
	},
	/// Manifest value references a named node that does not exist.
	#[error("unknown node {name:?} in manifest nodes table")]
	UnknownNode {
		/// Requested node name.
		name: String,
	},
	/// Named nodes reference each other in a cycle.
	#[error("circular node reference through {name:?}")]
	CircularNode {
		/// Node participating in the cycle.
		name: String,
	},
	/// Manifest JSON value has the wrong shape for its position.
	#[error("malformed manifest value at {context}: expected {expected}, got {got}")]
	MalformedValue {
		/// Dotted path of the offending value.
		context: String,
		/// Shape the parser expected.
		expected: &'static str,
		/// JSON kind actually found.
		got: &'static str,
	},
	/// Struct value omits a declared field.
	#[error("missing value for {struct_name}.{field}")]
	MissingFieldValue {
		/// Struct definition name.
		struct_name: String,
		/// Field lacking a value.
		field: String,
	},
	/// Struct value names a field the definition does not declare.
	#[error("unexpected value {struct_name}.{field}: no such field")]
	UnexpectedValue {
		/// Struct definition name.
		struct_name: String,
		/// Unknown field name.
		field: String,
	},
}
