use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::unpack::{DecodeError, DocPath, FieldDescriptor, FieldKind, Registry, Result, Skeleton, Slot, TypeDescriptor, TypedNode};

/// Runtime limits for skeleton decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum object/array nesting depth walked before failing.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self { max_depth: 128 }
	}
}

impl DecodeOptions {
	/// Preset for documents from untrusted sources.
	pub fn shallow() -> Self {
		Self { max_depth: 16 }
	}
}

/// Decode a parsed document into a skeleton, resolving family members by the `key` discriminator.
///
/// The registry is only read; one registry can serve concurrent calls with different keys.
pub fn decode(registry: &Registry, key: &str, root: &Value, opt: &DecodeOptions) -> Result<Skeleton> {
	let Value::Object(object) = root else {
		return Err(DecodeError::NotAnObjectMap {
			kind: value_kind(root),
			path: DocPath::root().to_string(),
		});
	};

	let mut walker = Walker {
		registry,
		key,
		opt,
		path: DocPath::root(),
	};
	walker.object(object, 0)
}

/// Parse JSON text and decode it into a skeleton.
pub fn decode_str(registry: &Registry, key: &str, src: &str, opt: &DecodeOptions) -> Result<Skeleton> {
	let root: Value = serde_json::from_str(src)?;
	decode(registry, key, &root, opt)
}

/// Label for the JSON kind of a value.
pub fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

struct Walker<'a> {
	registry: &'a Registry,
	key: &'a str,
	opt: &'a DecodeOptions,
	path: DocPath,
}

impl Walker<'_> {
	fn object(&mut self, object: &Map<String, Value>, depth: u32) -> Result<Skeleton> {
		self.check_depth(depth)?;

		match object.get(self.key) {
			Some(Value::String(type_name)) => self.tagged(type_name, object, depth).map(Skeleton::Typed),
			Some(_) => Err(DecodeError::DiscriminatorNotString {
				key: self.key.to_owned(),
				path: self.path.to_string(),
			}),
			None => self.untagged(object, depth),
		}
	}

	fn tagged(&mut self, type_name: &str, object: &Map<String, Value>, depth: u32) -> Result<TypedNode> {
		let registry = self.registry;
		let descriptor = registry.lookup(type_name).ok_or_else(|| DecodeError::UnknownDiscriminator {
			key: self.key.to_owned(),
			value: type_name.to_owned(),
			path: self.path.to_string(),
		})?;
		debug!(type_name, path = %self.path, "resolved discriminator");

		let mut node = TypedNode::blank(descriptor);
		for field in &descriptor.fields {
			match field.kind {
				FieldKind::Scalar => {}
				FieldKind::Unsupported => {
					return Err(DecodeError::UnsupportedFieldKind {
						field: field.name.to_string(),
						type_name: type_name.to_owned(),
						path: self.path.to_string(),
					});
				}
				FieldKind::PolymorphicSingle => {
					let value = self.member(descriptor, field, object)?;
					self.path.push_key(&field.name);
					let Value::Object(sub) = value else {
						return Err(self.not_an_object(descriptor, field));
					};
					let decoded = self.object(sub, depth + 1)?;
					self.path.pop();
					node.slots.push(Slot {
						name: field.name.clone(),
						value: decoded,
					});
				}
				FieldKind::PolymorphicSequence => {
					let value = self.member(descriptor, field, object)?;
					self.path.push_key(&field.name);
					let Value::Array(items) = value else {
						return Err(self.not_an_object(descriptor, field));
					};

					let mut decoded = Vec::with_capacity(items.len());
					for (idx, item) in items.iter().enumerate() {
						self.path.push_index(idx);
						let Value::Object(sub) = item else {
							return Err(self.not_an_object(descriptor, field));
						};
						decoded.push(self.object(sub, depth + 1)?);
						self.path.pop();
					}
					self.path.pop();

					node.slots.push(Slot {
						name: field.name.clone(),
						value: Skeleton::Seq(decoded),
					});
				}
			}
		}

		Ok(node)
	}

	fn untagged(&mut self, object: &Map<String, Value>, depth: u32) -> Result<Skeleton> {
		trace!(path = %self.path, keys = object.len(), "no discriminator, walking untagged object");

		let mut out = BTreeMap::new();
		for (key, value) in object {
			self.path.push_key(key);
			let decoded = match value {
				Value::Object(sub) => self.object(sub, depth + 1)?,
				Value::Array(items) if contains_object(items) => self.array(items, depth + 1)?,
				other => Skeleton::Raw(other.clone()),
			};
			self.path.pop();
			out.insert(key.clone(), decoded);
		}

		Ok(Skeleton::Map(out))
	}

	fn array(&mut self, items: &[Value], depth: u32) -> Result<Skeleton> {
		self.check_depth(depth)?;

		let mut out = Vec::with_capacity(items.len());
		for (idx, item) in items.iter().enumerate() {
			self.path.push_index(idx);
			let decoded = match item {
				Value::Object(sub) => self.object(sub, depth + 1)?,
				Value::Array(inner) if contains_object(inner) => self.array(inner, depth + 1)?,
				other => Skeleton::Raw(other.clone()),
			};
			self.path.pop();
			out.push(decoded);
		}

		Ok(Skeleton::Seq(out))
	}

	fn member<'v>(&self, descriptor: &TypeDescriptor, field: &FieldDescriptor, object: &'v Map<String, Value>) -> Result<&'v Value> {
		object.get(&*field.name).ok_or_else(|| DecodeError::MissingField {
			field: field.name.to_string(),
			type_name: descriptor.name.to_string(),
			path: self.path.to_string(),
		})
	}

	fn not_an_object(&self, descriptor: &TypeDescriptor, field: &FieldDescriptor) -> DecodeError {
		DecodeError::NotAnObject {
			field: field.name.to_string(),
			type_name: descriptor.name.to_string(),
			path: self.path.to_string(),
		}
	}

	fn check_depth(&self, depth: u32) -> Result<()> {
		if depth >= self.opt.max_depth {
			return Err(DecodeError::DepthExceeded {
				max_depth: self.opt.max_depth,
				path: self.path.to_string(),
			});
		}
		Ok(())
	}
}

fn contains_object(items: &[Value]) -> bool {
	items.iter().any(|item| match item {
		Value::Object(_) => true,
		Value::Array(inner) => contains_object(inner),
		_ => false,
	})
}
