use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value as Json;

use crate::blob::schema::{FieldDef, FieldType, StructDef};
use crate::blob::value::{StructVal, Value};
use crate::blob::{GenError, Result};

/// Parsed manifest: schema definitions, version, and the root value tree.
///
/// The manifest is the producer side of the pipeline: a JSON document
/// declaring struct definitions, an optional table of named value nodes
/// (how shared substructure is authored), and the root node.
#[derive(Debug)]
pub struct Manifest {
	/// Version string, validated during encoding.
	pub version: String,
	/// Struct definitions in declaration order.
	pub structs: Vec<Rc<StructDef>>,
	/// Root of the default-value tree.
	pub root: Rc<StructVal>,
}

#[derive(Deserialize)]
struct ManifestDoc {
	version: String,
	structs: Vec<StructDoc>,
	#[serde(default)]
	nodes: serde_json::Map<String, Json>,
	root: Json,
}

#[derive(Deserialize)]
struct StructDoc {
	name: String,
	fields: Vec<FieldDoc>,
}

#[derive(Deserialize)]
struct FieldDoc {
	name: String,
	#[serde(rename = "type")]
	typ: String,
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
	let text = std::fs::read_to_string(path)?;
	parse_manifest(&text)
}

/// Parse a manifest document from JSON text.
pub fn parse_manifest(text: &str) -> Result<Manifest> {
	let doc: ManifestDoc = serde_json::from_str(text)?;

	let mut by_name: HashMap<String, Rc<StructDef>> = HashMap::new();
	let mut structs = Vec::with_capacity(doc.structs.len());
	for item in &doc.structs {
		if by_name.contains_key(&item.name) {
			return Err(GenError::DuplicateStruct { name: item.name.clone() });
		}
		let mut fields = Vec::with_capacity(item.fields.len());
		for field in &item.fields {
			let typ = parse_field_type(&by_name, &item.name, &field.name, &field.typ)?;
			fields.push(FieldDef::new(&field.name, typ));
		}
		let def = Rc::new(StructDef::new(&item.name, fields));
		by_name.insert(item.name.clone(), Rc::clone(&def));
		structs.push(def);
	}

	let mut resolver = NodeResolver {
		structs: &by_name,
		nodes: &doc.nodes,
		resolved: HashMap::new(),
		in_progress: HashSet::new(),
	};
	let root = resolver.resolve_value_node("root", &doc.root)?;

	Ok(Manifest {
		version: doc.version,
		structs,
		root,
	})
}

/// Parse manifest field type syntax: scalar names or `Name*` for a
/// reference. A reference may only name an earlier struct definition, which
/// rules out recursive schemas.
fn parse_field_type(by_name: &HashMap<String, Rc<StructDef>>, struct_name: &str, field: &str, text: &str) -> Result<FieldType> {
	let typ = match text {
		"bool" => FieldType::Bool,
		"u16" => FieldType::U16,
		"u32" => FieldType::U32,
		"u64" => FieldType::U64,
		"i16" => FieldType::I16,
		"i32" => FieldType::I32,
		"i64" => FieldType::I64,
		"str" => FieldType::Str,
		other => {
			let Some(target) = other.strip_suffix('*') else {
				return Err(GenError::UnknownFieldType {
					struct_name: struct_name.to_owned(),
					field: field.to_owned(),
					type_name: other.to_owned(),
				});
			};
			let def = by_name.get(target).ok_or_else(|| GenError::UnknownStruct { name: target.to_owned() })?;
			FieldType::StructPtr(Rc::clone(def))
		}
	};
	Ok(typ)
}

struct NodeResolver<'a> {
	structs: &'a HashMap<String, Rc<StructDef>>,
	nodes: &'a serde_json::Map<String, Json>,
	resolved: HashMap<String, Rc<StructVal>>,
	in_progress: HashSet<String>,
}

impl NodeResolver<'_> {
	/// Resolve a node-valued JSON item: `{"ref": name}` into the nodes
	/// table, or an inline `{"struct": ..., "values": ...}` object.
	fn resolve_value_node(&mut self, context: &str, doc: &Json) -> Result<Rc<StructVal>> {
		if let Some(name) = doc.get("ref").and_then(Json::as_str) {
			return self.resolve_named(name);
		}
		self.resolve_inline(context, doc)
	}

	fn resolve_named(&mut self, name: &str) -> Result<Rc<StructVal>> {
		if let Some(found) = self.resolved.get(name) {
			return Ok(Rc::clone(found));
		}
		if !self.in_progress.insert(name.to_owned()) {
			return Err(GenError::CircularNode { name: name.to_owned() });
		}
		let doc = self.nodes.get(name).ok_or_else(|| GenError::UnknownNode { name: name.to_owned() })?;
		let node = self.resolve_value_node(name, doc)?;
		self.in_progress.remove(name);
		self.resolved.insert(name.to_owned(), Rc::clone(&node));
		Ok(node)
	}

	fn resolve_inline(&mut self, context: &str, doc: &Json) -> Result<Rc<StructVal>> {
		let obj = doc.as_object().ok_or_else(|| malformed(context, "node object", doc))?;
		let struct_name = obj
			.get("struct")
			.and_then(Json::as_str)
			.ok_or_else(|| malformed(context, "node object with \"struct\" name", doc))?;
		let def = self
			.structs
			.get(struct_name)
			.ok_or_else(|| GenError::UnknownStruct { name: struct_name.to_owned() })?;
		let def = Rc::clone(def);
		let values_doc = obj
			.get("values")
			.and_then(Json::as_object)
			.ok_or_else(|| malformed(context, "node object with \"values\" map", doc))?;

		for key in values_doc.keys() {
			if !def.fields.iter().any(|field| &*field.name == key.as_str()) {
				return Err(GenError::UnexpectedValue {
					struct_name: struct_name.to_owned(),
					field: key.clone(),
				});
			}
		}

		let mut values = Vec::with_capacity(def.fields.len());
		for field in &def.fields {
			let item = values_doc.get(&*field.name).ok_or_else(|| GenError::MissingFieldValue {
				struct_name: struct_name.to_owned(),
				field: field.name.to_string(),
			})?;
			values.push(self.coerce_field(struct_name, field, item)?);
		}

		StructVal::new(def, values)
	}

	fn coerce_field(&mut self, struct_name: &str, field: &FieldDef, doc: &Json) -> Result<Value> {
		let mismatch = || GenError::TypeMismatch {
			struct_name: struct_name.to_owned(),
			field: field.name.to_string(),
			expected: field.typ.label(),
			got: json_kind(doc).to_owned(),
		};

		match &field.typ {
			FieldType::Bool => doc.as_bool().map(Value::Bool).ok_or_else(mismatch),
			FieldType::U16 | FieldType::U32 | FieldType::U64 => doc.as_u64().map(Value::Unsigned).ok_or_else(mismatch),
			FieldType::I16 | FieldType::I32 | FieldType::I64 => doc.as_i64().map(Value::Signed).ok_or_else(mismatch),
			FieldType::Str => doc
				.as_str()
				.map(|text| Value::Str(text.to_owned().into_boxed_str()))
				.ok_or_else(mismatch),
			FieldType::StructPtr(target) => {
				if doc.is_null() {
					return Ok(Value::Struct(None));
				}
				let context = format!("{struct_name}.{}", field.name);
				let child = self.resolve_value_node(&context, doc)?;
				if !Rc::ptr_eq(target, &child.def) {
					return Err(GenError::TypeMismatch {
						struct_name: struct_name.to_owned(),
						field: field.name.to_string(),
						expected: field.typ.label(),
						got: child.def.name.to_string(),
					});
				}
				Ok(Value::Struct(Some(child)))
			}
		}
	}
}

fn malformed(context: &str, expected: &'static str, doc: &Json) -> GenError {
	GenError::MalformedValue {
		context: context.to_owned(),
		expected,
		got: json_kind(doc),
	}
}

fn json_kind(doc: &Json) -> &'static str {
	match doc {
		Json::Null => "null",
		Json::Bool(_) => "bool",
		Json::Number(_) => "number",
		Json::String(_) => "string",
		Json::Array(_) => "array",
		Json::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::parse_manifest;
	use crate::blob::error::GenError;
	use crate::blob::value::{Value, node_id};

	const EXAMPLE: &str = r#"{
		"version": "2.3",
		"structs": [
			{ "name": "B", "fields": [ { "name": "x", "type": "i32" } ] },
			{ "name": "A", "fields": [
				{ "name": "flag", "type": "bool" },
				{ "name": "b", "type": "B*" }
			] }
		],
		"root": { "struct": "A", "values": { "flag": true, "b": { "struct": "B", "values": { "x": 5 } } } }
	}"#;

	#[test]
	fn example_manifest_builds_the_tree() {
		let manifest = parse_manifest(EXAMPLE).unwrap();
		assert_eq!(manifest.version, "2.3");
		assert_eq!(manifest.structs.len(), 2);
		assert_eq!(&*manifest.root.def.name, "A");
		assert!(matches!(manifest.root.values[0], Value::Bool(true)));
		let Value::Struct(Some(child)) = &manifest.root.values[1] else {
			panic!("expected nested struct");
		};
		assert_eq!(&*child.def.name, "B");
		assert!(matches!(child.values[0], Value::Signed(5)));
	}

	#[test]
	fn refs_share_one_node_identity() {
		let text = r#"{
			"version": "1",
			"structs": [
				{ "name": "B", "fields": [ { "name": "x", "type": "i32" } ] },
				{ "name": "A", "fields": [
					{ "name": "left", "type": "B*" },
					{ "name": "right", "type": "B*" }
				] }
			],
			"nodes": { "shared": { "struct": "B", "values": { "x": 9 } } },
			"root": { "struct": "A", "values": { "left": { "ref": "shared" }, "right": { "ref": "shared" } } }
		}"#;
		let manifest = parse_manifest(text).unwrap();
		let (Value::Struct(Some(left)), Value::Struct(Some(right))) = (&manifest.root.values[0], &manifest.root.values[1]) else {
			panic!("expected two references");
		};
		assert_eq!(node_id(left), node_id(right));
		assert_eq!(Rc::strong_count(left), 2);
	}

	#[test]
	fn null_reference_is_absent() {
		let text = r#"{
			"version": "1",
			"structs": [
				{ "name": "B", "fields": [ { "name": "x", "type": "i32" } ] },
				{ "name": "A", "fields": [ { "name": "b", "type": "B*" } ] }
			],
			"root": { "struct": "A", "values": { "b": null } }
		}"#;
		let manifest = parse_manifest(text).unwrap();
		assert!(matches!(manifest.root.values[0], Value::Struct(None)));
	}

	#[test]
	fn unknown_field_type_is_rejected() {
		let text = r#"{
			"version": "1",
			"structs": [ { "name": "A", "fields": [ { "name": "x", "type": "f32" } ] } ],
			"root": { "struct": "A", "values": { "x": 1 } }
		}"#;
		assert!(matches!(parse_manifest(text), Err(GenError::UnknownFieldType { .. })));
	}

	#[test]
	fn forward_struct_reference_is_rejected() {
		let text = r#"{
			"version": "1",
			"structs": [
				{ "name": "A", "fields": [ { "name": "b", "type": "B*" } ] },
				{ "name": "B", "fields": [ { "name": "x", "type": "i32" } ] }
			],
			"root": { "struct": "A", "values": { "b": null } }
		}"#;
		assert!(matches!(parse_manifest(text), Err(GenError::UnknownStruct { .. })));
	}

	#[test]
	fn duplicate_struct_is_rejected() {
		let text = r#"{
			"version": "1",
			"structs": [
				{ "name": "A", "fields": [] },
				{ "name": "A", "fields": [] }
			],
			"root": { "struct": "A", "values": {} }
		}"#;
		assert!(matches!(parse_manifest(text), Err(GenError::DuplicateStruct { .. })));
	}

	#[test]
	fn missing_and_extra_values_are_rejected() {
		let missing = r#"{
			"version": "1",
			"structs": [ { "name": "A", "fields": [ { "name": "x", "type": "i32" } ] } ],
			"root": { "struct": "A", "values": {} }
		}"#;
		assert!(matches!(parse_manifest(missing), Err(GenError::MissingFieldValue { .. })));

		let extra = r#"{
			"version": "1",
			"structs": [ { "name": "A", "fields": [] } ],
			"root": { "struct": "A", "values": { "y": 1 } }
		}"#;
		assert!(matches!(parse_manifest(extra), Err(GenError::UnexpectedValue { .. })));
	}

	#[test]
	fn unknown_node_ref_is_rejected() {
		let text = r#"{
			"version": "1",
			"structs": [
				{ "name": "B", "fields": [] },
				{ "name": "A", "fields": [ { "name": "b", "type": "B*" } ] }
			],
			"root": { "struct": "A", "values": { "b": { "ref": "nowhere" } } }
		}"#;
		assert!(matches!(parse_manifest(text), Err(GenError::UnknownNode { .. })));
	}

	#[test]
	fn circular_node_refs_are_rejected() {
		let text = r#"{
			"version": "1",
			"structs": [
				{ "name": "B", "fields": [] },
				{ "name": "A", "fields": [ { "name": "b", "type": "B*" } ] }
			],
			"nodes": { "loop": { "ref": "loop" } },
			"root": { "struct": "A", "values": { "b": { "ref": "loop" } } }
		}"#;
		assert!(matches!(parse_manifest(text), Err(GenError::CircularNode { .. })));
	}

	#[test]
	fn scalar_kind_mismatch_is_rejected() {
		let text = r#"{
			"version": "1",
			"structs": [ { "name": "A", "fields": [ { "name": "flag", "type": "bool" } ] } ],
			"root": { "struct": "A", "values": { "flag": 1 } }
		}"#;
		assert!(matches!(parse_manifest(text), Err(GenError::TypeMismatch { .. })));
	}
}
