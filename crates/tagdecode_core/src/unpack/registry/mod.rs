use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::unpack::RegistryError;
use crate::unpack::probe::{ProbeError, Shape, probe_template};

mod schema;

pub use schema::{RegistrySchema, SchemaField, SchemaType};

/// How the decoder treats one field of a registered type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
	/// Plain value left for the structural fill pass.
	#[default]
	#[serde(rename = "scalar")]
	Scalar,
	/// Exactly one member of the polymorphic family.
	#[serde(rename = "single")]
	PolymorphicSingle,
	/// Ordered sequence of polymorphic family members.
	#[serde(rename = "sequence")]
	PolymorphicSequence,
	/// Fixed-size array; not representable in the document model.
	#[serde(rename = "unsupported")]
	Unsupported,
}

impl FieldKind {
	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Scalar => "scalar",
			Self::PolymorphicSingle => "single",
			Self::PolymorphicSequence => "sequence",
			Self::Unsupported => "unsupported",
		}
	}

	/// Whether the decoder must resolve this field.
	pub fn is_polymorphic(self) -> bool {
		matches!(self, Self::PolymorphicSingle | Self::PolymorphicSequence)
	}
}

/// One field of a registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	/// Key used for this field in documents.
	pub name: Arc<str>,
	/// Decoder treatment.
	pub kind: FieldKind,
}

impl FieldDescriptor {
	/// Create a field descriptor.
	pub fn new(name: impl Into<Arc<str>>, kind: FieldKind) -> Self {
		Self { name: name.into(), kind }
	}
}

/// Name and field table of one concrete member of a polymorphic family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
	/// Type name; matches discriminator values.
	pub name: Arc<str>,
	/// Fields in declaration order.
	pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
	/// Create a type descriptor from an explicit field table.
	pub fn new(name: impl Into<Arc<str>>, fields: Vec<FieldDescriptor>) -> Self {
		Self { name: name.into(), fields }
	}

	/// Look up a field by serialization name.
	pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|field| &*field.name == name)
	}

	/// Iterate fields the decoder must resolve.
	pub fn polymorphic_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.iter().filter(|field| field.kind.is_polymorphic())
	}
}

/// Caller declaration that a template field holds family members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polymorphic {
	/// Serialization name of the declared field.
	pub field: &'static str,
	/// Either [`FieldKind::PolymorphicSingle`] or [`FieldKind::PolymorphicSequence`].
	pub kind: FieldKind,
}

impl Polymorphic {
	/// Declare a field holding one family member.
	pub const fn single(field: &'static str) -> Self {
		Self {
			field,
			kind: FieldKind::PolymorphicSingle,
		}
	}

	/// Declare a field holding an ordered sequence of family members.
	pub const fn sequence(field: &'static str) -> Self {
		Self {
			field,
			kind: FieldKind::PolymorphicSequence,
		}
	}
}

/// Accumulates type registrations before freezing them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
	types: BTreeMap<Arc<str>, TypeDescriptor>,
}

impl RegistryBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the type of `template`, deriving its name and fields from its `Serialize` impl.
	///
	/// The template value is only inspected, never stored. Serde `rename` attributes decide
	/// both the registered type name and each field's serialization name. Every field not named
	/// in `polymorphic` is scalar, except fields serializing as fixed-size arrays, which are
	/// recorded as [`FieldKind::Unsupported`].
	pub fn register<T: Serialize + ?Sized>(self, template: &T, polymorphic: &[Polymorphic]) -> Result<Self, RegistryError> {
		let shape = probe_template(template).map_err(|err| match err {
			ProbeError::NotAStruct(kind) => RegistryError::NotAStruct { kind },
			ProbeError::Custom(message) => RegistryError::Probe { message },
		})?;

		let mut fields = Vec::with_capacity(shape.fields.len());
		let mut shapes = Vec::with_capacity(shape.fields.len());
		for (name, field_shape) in shape.fields {
			let kind = if field_shape == Shape::Tuple {
				FieldKind::Unsupported
			} else {
				FieldKind::Scalar
			};
			fields.push(FieldDescriptor::new(name, kind));
			shapes.push(field_shape);
		}

		let mut declared: Vec<&str> = Vec::with_capacity(polymorphic.len());
		for decl in polymorphic {
			if declared.contains(&decl.field) {
				return Err(RegistryError::DuplicateField {
					type_name: shape.name.to_owned(),
					field: decl.field.to_owned(),
				});
			}
			declared.push(decl.field);

			let Some(idx) = fields.iter().position(|field| &*field.name == decl.field) else {
				return Err(RegistryError::UnknownField {
					type_name: shape.name.to_owned(),
					field: decl.field.to_owned(),
				});
			};

			let field_shape = shapes[idx];
			if field_shape == Shape::Tuple {
				continue;
			}
			let compatible = match decl.kind {
				FieldKind::PolymorphicSequence => field_shape == Shape::Seq,
				FieldKind::PolymorphicSingle => field_shape != Shape::Seq,
				FieldKind::Scalar | FieldKind::Unsupported => true,
			};
			if !compatible {
				return Err(RegistryError::KindMismatch {
					type_name: shape.name.to_owned(),
					field: decl.field.to_owned(),
					expected: decl.kind.as_str(),
					got: field_shape.as_str(),
				});
			}
			fields[idx].kind = decl.kind;
		}

		self.register_descriptor(TypeDescriptor::new(shape.name, fields))
	}

	/// Register an explicit descriptor table.
	pub fn register_descriptor(mut self, descriptor: TypeDescriptor) -> Result<Self, RegistryError> {
		if self.types.contains_key(&descriptor.name) {
			return Err(RegistryError::DuplicateType {
				name: descriptor.name.to_string(),
			});
		}

		for (idx, field) in descriptor.fields.iter().enumerate() {
			if descriptor.fields[..idx].iter().any(|prev| prev.name == field.name) {
				return Err(RegistryError::DuplicateField {
					type_name: descriptor.name.to_string(),
					field: field.name.to_string(),
				});
			}
		}

		debug!(
			type_name = %descriptor.name,
			fields = descriptor.fields.len(),
			polymorphic = descriptor.polymorphic_fields().count(),
			"registered type"
		);
		self.types.insert(descriptor.name.clone(), descriptor);
		Ok(self)
	}

	/// Whether a type name is already registered.
	pub fn contains(&self, name: &str) -> bool {
		self.types.contains_key(name)
	}

	/// Freeze registrations into a read-only registry.
	pub fn build(self) -> Registry {
		Registry { types: self.types }
	}
}

/// Read-only mapping from type name to [`TypeDescriptor`].
///
/// A registry cannot change after [`RegistryBuilder::build`], so one instance can be shared
/// (for example behind an `Arc`) by any number of concurrent decode calls.
#[derive(Debug, Clone, Default)]
pub struct Registry {
	types: BTreeMap<Arc<str>, TypeDescriptor>,
}

impl Registry {
	/// Start building a registry.
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Build a registry from a parsed schema document.
	pub fn from_schema(schema: &RegistrySchema) -> Result<Self, RegistryError> {
		let mut builder = RegistryBuilder::new();
		for item in &schema.types {
			builder = builder.register_descriptor(item.to_descriptor())?;
		}
		Ok(builder.build())
	}

	/// Render registered types as a schema document.
	pub fn to_schema(&self) -> RegistrySchema {
		RegistrySchema {
			types: self.iter().map(SchemaType::from_descriptor).collect(),
		}
	}

	/// Look up a type by name.
	pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
		self.types.get(name)
	}

	/// Number of registered types.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether no types are registered.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Iterate registered types ordered by name.
	pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
		self.types.values()
	}
}
