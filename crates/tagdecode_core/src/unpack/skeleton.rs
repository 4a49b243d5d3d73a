use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::unpack::TypeDescriptor;

/// Decoded document with every polymorphic slot resolved and scalars left for the fill pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Skeleton {
	/// Object whose discriminator named a registered type.
	Typed(TypedNode),
	/// Untagged object walked for nested family members.
	Map(BTreeMap<String, Skeleton>),
	/// Array decoded element by element.
	Seq(Vec<Skeleton>),
	/// Value passed through untouched.
	Raw(Value),
}

/// Instance of one registered type with its polymorphic slots filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedNode {
	/// Registered type name.
	pub type_name: Arc<str>,
	/// Resolved polymorphic slots in field declaration order.
	pub slots: Vec<Slot>,
}

/// One resolved polymorphic field.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
	/// Field serialization name.
	pub name: Arc<str>,
	/// Decoded family member, or a [`Skeleton::Seq`] of them.
	pub value: Skeleton,
}

impl TypedNode {
	/// Blank instance of a registered type: no slots resolved yet.
	pub fn blank(descriptor: &TypeDescriptor) -> Self {
		Self {
			type_name: descriptor.name.clone(),
			slots: Vec::with_capacity(descriptor.polymorphic_fields().count()),
		}
	}

	/// Look up a resolved slot by serialization name.
	pub fn slot(&self, name: &str) -> Option<&Skeleton> {
		self.slots.iter().find(|slot| &*slot.name == name).map(|slot| &slot.value)
	}
}

impl Skeleton {
	/// Borrow the typed node, if this is one.
	pub fn as_typed(&self) -> Option<&TypedNode> {
		match self {
			Self::Typed(node) => Some(node),
			_ => None,
		}
	}

	/// Registered type name of a typed node.
	pub fn type_name(&self) -> Option<&str> {
		self.as_typed().map(|node| &*node.type_name)
	}

	/// Render variant as a stable lowercase label.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Typed(_) => "typed",
			Self::Map(_) => "map",
			Self::Seq(_) => "seq",
			Self::Raw(_) => "raw",
		}
	}

	/// Count typed nodes anywhere in this tree.
	pub fn count_typed(&self) -> usize {
		match self {
			Self::Typed(node) => 1 + node.slots.iter().map(|slot| slot.value.count_typed()).sum::<usize>(),
			Self::Map(entries) => entries.values().map(Self::count_typed).sum(),
			Self::Seq(items) => items.iter().map(Self::count_typed).sum(),
			Self::Raw(_) => 0,
		}
	}
}
