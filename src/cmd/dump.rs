use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use setblob::blob::{BLOB_MAGIC, EncodedBlob, StructVal, Value, encode_defaults, encode_unsigned, load_manifest};

/// Per-run debug naming registry: node identity to sequential integer.
///
/// Built at the start of a dump and discarded with it; names like `B_0` tie
/// reference fields back to the frame they point at.
struct NameRegistry {
	names: HashMap<usize, usize>,
}

impl NameRegistry {
	fn new() -> Self {
		Self { names: HashMap::new() }
	}

	fn name(&mut self, node: &Rc<StructVal>) -> String {
		let next = self.names.len();
		let id = *self.names.entry(Rc::as_ptr(node) as usize).or_insert(next);
		format!("{}_{}", node.def.name, id)
	}
}

/// Print the blob as an annotated hex listing with struct/field provenance.
pub fn run(path: PathBuf, json: bool) -> setblob::blob::Result<()> {
	let manifest = load_manifest(&path)?;
	let blob = encode_defaults(&manifest.root, &manifest.version)?;
	let mut names = NameRegistry::new();

	// Name frames in flattened order so references always point at a name
	// introduced earlier in the listing.
	for frame in &blob.frames {
		names.name(&frame.node);
	}

	if json {
		print_json(&path, &manifest.version, &blob, &mut names)?;
		return Ok(());
	}

	println!("// {} bytes, version {}", blob.bytes.len(), manifest.version);
	print_line(&BLOB_MAGIC.to_le_bytes(), "magic id 'SetT'");
	print_line(&blob.version.to_le_bytes(), &format!("version {} ({:#010x})", manifest.version, blob.version));
	print_line(&blob.root_offset().to_le_bytes(), &format!("root struct offset {:#x}", blob.root_offset()));

	for frame in &blob.frames {
		println!();
		println!("// offset: {:#x} {} {}", frame.offset, names.name(&frame.node), frame.node.def.name);
		print_line(&BLOB_MAGIC.to_le_bytes(), "magic id 'SetT'");
		print_line(&encode_unsigned(frame.field_bytes.len() as u64), &format!("{} fields", frame.field_bytes.len()));
		for (pos, data) in frame.field_bytes.iter().enumerate() {
			let field = &frame.node.def.fields[pos];
			let rendered = render_value(&frame.node.values[pos], &mut names);
			print_line(data, &format!("{} {} = {}", field.typ.label(), field.name, rendered));
		}
	}

	Ok(())
}

fn print_line(data: &[u8], comment: &str) {
	println!("{}, // {}", hex_bytes(data), comment);
}

fn hex_bytes(data: &[u8]) -> String {
	data.iter().map(|byte| format!("0x{byte:02x}")).collect::<Vec<_>>().join(", ")
}

fn render_value(value: &Value, names: &mut NameRegistry) -> String {
	match value {
		Value::Bool(flag) => flag.to_string(),
		Value::Unsigned(raw) => format!("{raw:#x}"),
		Value::Signed(raw) => format!("{raw:#x}"),
		Value::Str(text) => format!("{text:?}"),
		Value::Struct(None) => "null".to_owned(),
		Value::Struct(Some(child)) => names.name(child),
	}
}

fn print_json(path: &std::path::Path, version: &str, blob: &EncodedBlob, names: &mut NameRegistry) -> setblob::blob::Result<()> {
	let payload = DumpJson {
		path: path.display().to_string(),
		version: version.to_owned(),
		packed_version: format!("{:#010x}", blob.version),
		root_offset: blob.root_offset(),
		total_len: blob.bytes.len(),
		frames: blob
			.frames
			.iter()
			.map(|frame| FrameJson {
				offset: frame.offset,
				struct_name: frame.node.def.name.to_string(),
				name: names.name(&frame.node),
				fields: frame
					.field_bytes
					.iter()
					.enumerate()
					.map(|(pos, data)| {
						let field = &frame.node.def.fields[pos];
						FieldJson {
							name: field.name.to_string(),
							typ: field.typ.label(),
							value: render_value(&frame.node.values[pos], names),
							bytes: data.iter().map(|byte| format!("{byte:02x}")).collect::<String>(),
						}
					})
					.collect(),
			})
			.collect(),
	};

	println!("{}", serde_json::to_string_pretty(&payload)?);
	Ok(())
}

#[derive(serde::Serialize)]
struct DumpJson {
	path: String,
	version: String,
	packed_version: String,
	root_offset: u32,
	total_len: usize,
	frames: Vec<FrameJson>,
}

#[derive(serde::Serialize)]
struct FrameJson {
	offset: u32,
	#[serde(rename = "struct")]
	struct_name: String,
	name: String,
	fields: Vec<FieldJson>,
}

#[derive(serde::Serialize)]
struct FieldJson {
	name: String,
	#[serde(rename = "type")]
	typ: String,
	value: String,
	bytes: String,
}
