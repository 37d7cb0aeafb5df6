//! Compact binary encoding of nested settings-default trees.
//!
//! The [`blob`] module turns one schema plus one tree of default values into
//! a flat byte buffer suitable for embedding as a constant. Nested structs
//! are referenced by byte offsets that always point backwards, so the buffer
//! is produced in a single pass with no backpatching.

/// Blob generation pipeline: codecs, flattening, offset assignment, assembly.
pub mod blob;
