/// Blob file emission command.
pub mod blob;
/// Annotated hex listing command.
pub mod dump;
/// Manifest summary command.
pub mod info;
/// Version packing utility command.
pub mod version;
