use thiserror::Error;

/// Crate-local result type for per-document decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Configuration errors raised while building a [`crate::unpack::Registry`].
///
/// These indicate a programming error in the registration code, not a bad document,
/// and are expected to surface once at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// A type name was registered twice.
	#[error("type {name} is already registered")]
	DuplicateType {
		/// Conflicting type name.
		name: String,
	},
	/// Template value does not serialize as a struct with named fields.
	#[error("cannot register non-struct template (serializes as {kind})")]
	NotAStruct {
		/// Shape the template serialized as.
		kind: &'static str,
	},
	/// Polymorphic declaration names a field the template does not have.
	#[error("type {type_name} has no field {field}")]
	UnknownField {
		/// Owning type name.
		type_name: String,
		/// Declared serialization name.
		field: String,
	},
	/// Polymorphic declaration disagrees with the template's field shape.
	#[error("field {field} on {type_name} declared {expected} but template value is {got}")]
	KindMismatch {
		/// Owning type name.
		type_name: String,
		/// Field serialization name.
		field: String,
		/// Declared kind label.
		expected: &'static str,
		/// Observed template shape label.
		got: &'static str,
	},
	/// Two fields or declarations share one serialization name.
	#[error("field {field} appears twice on {type_name}")]
	DuplicateField {
		/// Owning type name.
		type_name: String,
		/// Repeated serialization name.
		field: String,
	},
	/// Template `Serialize` impl failed while being probed.
	#[error("template probe failed: {message}")]
	Probe {
		/// Message reported by the template's serializer.
		message: String,
	},
	/// Schema file could not be read or parsed.
	#[error("schema: {0}")]
	Schema(#[from] serde_json::Error),
	/// Schema file IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
}

/// Errors produced while decoding one document into a skeleton.
///
/// Every document-level variant carries a tree path such as `$.exprs[1].lhs`
/// locating the offending object.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// Text entry point could not parse its input.
	#[error("parse: {0}")]
	Parse(#[from] serde_json::Error),
	/// Document file IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Decompressed document exceeded configured safety limit.
	#[error("decompressed document exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Discriminator names a type that is not registered.
	#[error("no type registered for {key}: {value:?} at {path}")]
	UnknownDiscriminator {
		/// Discriminator key in use.
		key: String,
		/// Unregistered discriminator value.
		value: String,
		/// Location of the tagged object.
		path: String,
	},
	/// Discriminator key is present but its value is not a string.
	#[error("discriminator {key} is not a string at {path}")]
	DiscriminatorNotString {
		/// Discriminator key in use.
		key: String,
		/// Location of the offending object.
		path: String,
	},
	/// Polymorphic field is absent from a tagged object.
	#[error("expected field {field} is missing in {type_name} at {path}")]
	MissingField {
		/// Field serialization name.
		field: String,
		/// Owning type name.
		type_name: String,
		/// Location of the owning object.
		path: String,
	},
	/// Polymorphic slot value has the wrong shape.
	#[error("field {field} in {type_name} is not an unpackable object at {path}")]
	NotAnObject {
		/// Field serialization name.
		field: String,
		/// Owning type name.
		type_name: String,
		/// Location of the offending value.
		path: String,
	},
	/// Field kind cannot be represented in the document model.
	#[error("field {field} in {type_name} has unsupported kind (fixed-size array) at {path}")]
	UnsupportedFieldKind {
		/// Field serialization name.
		field: String,
		/// Owning type name.
		type_name: String,
		/// Location of the owning object.
		path: String,
	},
	/// Nesting exceeded the configured recursion ceiling.
	#[error("decode depth exceeded (max={max_depth}) at {path}")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
		/// Location where the ceiling was hit.
		path: String,
	},
	/// Value expected to be a string-keyed object (such as the document root) is not one.
	#[error("cannot unpack {kind} as an object at {path}")]
	NotAnObjectMap {
		/// Kind of the offending value.
		kind: &'static str,
		/// Location of the offending value.
		path: String,
	},
}

/// Errors produced while filling a skeleton from its source document.
#[derive(Debug, Error)]
pub enum FillError {
	/// Skeleton and raw document disagree on shape.
	#[error("skeleton/document shape mismatch at {path}: expected {expected}")]
	ShapeMismatch {
		/// Location of the mismatch.
		path: String,
		/// Shape the skeleton required.
		expected: &'static str,
	},
	/// Structural serde pass rejected the filled document.
	#[error("structural fill: {0}")]
	Structural(#[from] serde_json::Error),
}

/// Errors from the one-shot text-to-typed-value entry point.
#[derive(Debug, Error)]
pub enum UnpackError {
	/// Parsing or skeleton decoding failed.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Scalar fill failed.
	#[error(transparent)]
	Fill(#[from] FillError),
}
