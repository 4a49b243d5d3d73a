use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::unpack::{FieldDescriptor, FieldKind, RegistryError, TypeDescriptor};

/// Serializable registry description, e.g.
/// `{"types":[{"name":"UnaryExpr","fields":[{"name":"operand","kind":"single"}]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySchema {
	/// Type entries.
	pub types: Vec<SchemaType>,
}

/// One type entry in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaType {
	/// Type name.
	pub name: String,
	/// Field table; scalar fields may be omitted.
	#[serde(default)]
	pub fields: Vec<SchemaField>,
}

/// One field entry in a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
	/// Serialization name.
	pub name: String,
	/// Field kind, `scalar` when omitted.
	#[serde(default)]
	pub kind: FieldKind,
}

impl RegistrySchema {
	/// Parse a schema from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self, RegistryError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Read and parse a schema file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
		let text = fs::read_to_string(path)?;
		Self::from_json_str(&text)
	}
}

impl SchemaType {
	pub(crate) fn to_descriptor(&self) -> TypeDescriptor {
		TypeDescriptor::new(
			self.name.as_str(),
			self.fields.iter().map(|field| FieldDescriptor::new(field.name.as_str(), field.kind)).collect(),
		)
	}

	pub(crate) fn from_descriptor(descriptor: &TypeDescriptor) -> Self {
		Self {
			name: descriptor.name.to_string(),
			fields: descriptor
				.fields
				.iter()
				.map(|field| SchemaField {
					name: field.name.to_string(),
					kind: field.kind,
				})
				.collect(),
		}
	}
}
