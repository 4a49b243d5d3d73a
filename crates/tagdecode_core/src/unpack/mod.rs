mod decode;
mod document;
mod error;
mod fill;
mod path;
mod probe;
mod registry;
mod skeleton;
#[cfg(test)]
mod test_support;

/// Skeleton decoding entry points and options.
pub use decode::{DecodeOptions, decode, decode_str, value_kind};
/// Document loading and compression detection.
pub use document::{Compression, Document, ZSTD_MAGIC, decode_bytes};
/// Error and result aliases.
pub use error::{DecodeError, FillError, RegistryError, Result, UnpackError};
/// Structural fill and one-shot typed entry points.
pub use fill::{fill, fill_into, unpack, unpack_value};
/// Document-tree locations used in error reports.
pub use path::{DocPath, PathStep};
/// Type registry, descriptors, and schema files.
pub use registry::{FieldDescriptor, FieldKind, Polymorphic, Registry, RegistryBuilder, RegistrySchema, SchemaField, SchemaType, TypeDescriptor};
/// Decoded skeleton types.
pub use skeleton::{Skeleton, Slot, TypedNode};
