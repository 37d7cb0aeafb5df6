mod assemble;
mod error;
mod flatten;
mod manifest;
mod offsets;
mod schema;
mod value;
mod varint;
mod version;

/// Blob assembly entry point, magic constant, and generation output.
pub use assemble::{BLOB_MAGIC, EncodedBlob, encode_defaults};
/// Error and result aliases.
pub use error::{GenError, Result};
/// Value-tree flattening.
pub use flatten::flatten_tree;
/// JSON manifest parsing (schema + defaults producer).
pub use manifest::{Manifest, load_manifest, parse_manifest};
/// Offset assignment outputs and layout constants.
pub use offsets::{FRAME_MAGIC_SIZE, FrameEntry, HEADER_SIZE, assign_offsets};
/// Schema declaration types.
pub use schema::{FieldDef, FieldType, StructDef};
/// Default-value tree types.
pub use value::{StructVal, Value};
/// Variable-length integer and string codec.
pub use varint::{decode_signed, decode_unsigned, encode_signed, encode_string, encode_unsigned};
/// Version string packing.
pub use version::pack_version;
