//! Shape probing for registration templates.
//!
//! A template is run through a `serde::Serializer` that records the container name and
//! the serialized name and rough shape of each field. This is how serde `rename`
//! metadata becomes the serialization names stored in a [`crate::unpack::TypeDescriptor`].

use std::fmt;

use serde::Serialize;
use serde::ser::{self, Impossible};

/// Coarse shape of one serialized field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
	/// Primitive, string, unit, or `None`.
	Scalar,
	/// Struct, map, or enum variant with a payload.
	Object,
	/// Variable-length sequence.
	Seq,
	/// Fixed-length tuple, array, or tuple struct.
	Tuple,
}

impl Shape {
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Scalar => "scalar",
			Self::Object => "object",
			Self::Seq => "sequence",
			Self::Tuple => "fixed-size array",
		}
	}
}

/// Name and field layout recovered from a template value.
#[derive(Debug, Clone)]
pub(crate) struct TemplateShape {
	pub name: &'static str,
	pub fields: Vec<(&'static str, Shape)>,
}

#[derive(Debug)]
pub(crate) enum ProbeError {
	NotAStruct(&'static str),
	Custom(String),
}

impl fmt::Display for ProbeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NotAStruct(kind) => write!(f, "template serializes as {kind}"),
			Self::Custom(message) => f.write_str(message),
		}
	}
}

impl std::error::Error for ProbeError {}

impl ser::Error for ProbeError {
	fn custom<T: fmt::Display>(msg: T) -> Self {
		Self::Custom(msg.to_string())
	}
}

/// Probe a template value for its struct name and field shapes.
pub(crate) fn probe_template<T: Serialize + ?Sized>(template: &T) -> Result<TemplateShape, ProbeError> {
	template.serialize(TemplateProbe)
}

struct TemplateProbe;

struct StructProbe {
	shape: TemplateShape,
}

macro_rules! reject_scalars {
	($kind:literal: $($method:ident($ty:ty)),* $(,)?) => {
		$(
			fn $method(self, _value: $ty) -> Result<Self::Ok, Self::Error> {
				Err(ProbeError::NotAStruct($kind))
			}
		)*
	};
}

impl ser::Serializer for TemplateProbe {
	type Ok = TemplateShape;
	type Error = ProbeError;
	type SerializeSeq = Impossible<TemplateShape, ProbeError>;
	type SerializeTuple = Impossible<TemplateShape, ProbeError>;
	type SerializeTupleStruct = Impossible<TemplateShape, ProbeError>;
	type SerializeTupleVariant = Impossible<TemplateShape, ProbeError>;
	type SerializeMap = Impossible<TemplateShape, ProbeError>;
	type SerializeStruct = StructProbe;
	type SerializeStructVariant = Impossible<TemplateShape, ProbeError>;

	reject_scalars!("primitive":
		serialize_bool(bool),
		serialize_i8(i8),
		serialize_i16(i16),
		serialize_i32(i32),
		serialize_i64(i64),
		serialize_i128(i128),
		serialize_u8(u8),
		serialize_u16(u16),
		serialize_u32(u32),
		serialize_u64(u64),
		serialize_u128(u128),
		serialize_f32(f32),
		serialize_f64(f64),
		serialize_char(char),
	);

	reject_scalars!("string": serialize_str(&str));

	reject_scalars!("bytes": serialize_bytes(&[u8]));

	fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
		Err(ProbeError::NotAStruct("option"))
	}

	fn serialize_some<T: ?Sized + Serialize>(self, _value: &T) -> Result<Self::Ok, Self::Error> {
		Err(ProbeError::NotAStruct("option"))
	}

	fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
		Err(ProbeError::NotAStruct("unit"))
	}

	fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
		Ok(TemplateShape { name, fields: Vec::new() })
	}

	fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Result<Self::Ok, Self::Error> {
		Err(ProbeError::NotAStruct("enum variant"))
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, _value: &T) -> Result<Self::Ok, Self::Error> {
		Err(ProbeError::NotAStruct("newtype struct"))
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_value: &T,
	) -> Result<Self::Ok, Self::Error> {
		Err(ProbeError::NotAStruct("enum variant"))
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
		Err(ProbeError::NotAStruct("sequence"))
	}

	fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
		Err(ProbeError::NotAStruct("tuple"))
	}

	fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct, Self::Error> {
		Err(ProbeError::NotAStruct("tuple struct"))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeTupleVariant, Self::Error> {
		Err(ProbeError::NotAStruct("enum variant"))
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
		Err(ProbeError::NotAStruct("map"))
	}

	fn serialize_struct(self, name: &'static str, len: usize) -> Result<Self::SerializeStruct, Self::Error> {
		Ok(StructProbe {
			shape: TemplateShape {
				name,
				fields: Vec::with_capacity(len),
			},
		})
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeStructVariant, Self::Error> {
		Err(ProbeError::NotAStruct("enum variant"))
	}
}

impl ser::SerializeStruct for StructProbe {
	type Ok = TemplateShape;
	type Error = ProbeError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error> {
		let shape = value.serialize(ValueShape)?;
		self.shape.fields.push((key, shape));
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.shape)
	}
}

/// Classifies a value without descending into its children.
struct ValueShape;

/// Compound sink that discards elements and reports a fixed shape.
struct Discard(Shape);

macro_rules! scalar_shapes {
	($($method:ident($ty:ty)),* $(,)?) => {
		$(
			fn $method(self, _value: $ty) -> Result<Self::Ok, Self::Error> {
				Ok(Shape::Scalar)
			}
		)*
	};
}

impl ser::Serializer for ValueShape {
	type Ok = Shape;
	type Error = ProbeError;
	type SerializeSeq = Discard;
	type SerializeTuple = Discard;
	type SerializeTupleStruct = Discard;
	type SerializeTupleVariant = Discard;
	type SerializeMap = Discard;
	type SerializeStruct = Discard;
	type SerializeStructVariant = Discard;

	scalar_shapes!(
		serialize_bool(bool),
		serialize_i8(i8),
		serialize_i16(i16),
		serialize_i32(i32),
		serialize_i64(i64),
		serialize_i128(i128),
		serialize_u8(u8),
		serialize_u16(u16),
		serialize_u32(u32),
		serialize_u64(u64),
		serialize_u128(u128),
		serialize_f32(f32),
		serialize_f64(f64),
		serialize_char(char),
		serialize_str(&str),
		serialize_bytes(&[u8]),
	);

	fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
		Ok(Shape::Scalar)
	}

	fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
		Ok(Shape::Scalar)
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
		Ok(Shape::Scalar)
	}

	fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Result<Self::Ok, Self::Error> {
		Ok(Shape::Scalar)
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<Self::Ok, Self::Error> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_value: &T,
	) -> Result<Self::Ok, Self::Error> {
		Ok(Shape::Object)
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
		Ok(Discard(Shape::Seq))
	}

	fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
		Ok(Discard(Shape::Tuple))
	}

	fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct, Self::Error> {
		Ok(Discard(Shape::Tuple))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeTupleVariant, Self::Error> {
		Ok(Discard(Shape::Object))
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
		Ok(Discard(Shape::Object))
	}

	fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct, Self::Error> {
		Ok(Discard(Shape::Object))
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeStructVariant, Self::Error> {
		Ok(Discard(Shape::Object))
	}
}

impl ser::SerializeSeq for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

impl ser::SerializeTuple for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

impl ser::SerializeTupleStruct for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

impl ser::SerializeTupleVariant for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

impl ser::SerializeMap for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_key<T: ?Sized + Serialize>(&mut self, _key: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn serialize_value<T: ?Sized + Serialize>(&mut self, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

impl ser::SerializeStruct for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

impl ser::SerializeStructVariant for Discard {
	type Ok = Shape;
	type Error = ProbeError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, _value: &T) -> Result<(), Self::Error> {
		Ok(())
	}

	fn end(self) -> Result<Self::Ok, Self::Error> {
		Ok(self.0)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use serde::Serialize;

	use super::{ProbeError, Shape, probe_template};

	#[derive(Serialize)]
	struct Sample {
		id: u32,
		#[serde(rename = "label")]
		name: String,
		tags: Vec<String>,
		origin: [f64; 3],
		extra: BTreeMap<String, u8>,
		maybe: Option<Inner>,
	}

	#[derive(Serialize)]
	struct Inner {
		value: i64,
	}

	#[derive(Serialize)]
	struct Marker;

	#[derive(Serialize)]
	struct Pair(u8, u8);

	#[test]
	fn struct_fields_are_classified_by_serialized_shape() {
		let sample = Sample {
			id: 1,
			name: "x".to_owned(),
			tags: Vec::new(),
			origin: [0.0; 3],
			extra: BTreeMap::new(),
			maybe: Some(Inner { value: 3 }),
		};

		let shape = probe_template(&sample).expect("struct probes");
		assert_eq!(shape.name, "Sample");
		assert_eq!(
			shape.fields,
			vec![
				("id", Shape::Scalar),
				("label", Shape::Scalar),
				("tags", Shape::Seq),
				("origin", Shape::Tuple),
				("extra", Shape::Object),
				("maybe", Shape::Object),
			]
		);
	}

	#[test]
	fn unit_struct_has_no_fields() {
		let shape = probe_template(&Marker).expect("unit struct probes");
		assert_eq!(shape.name, "Marker");
		assert!(shape.fields.is_empty());
	}

	#[test]
	fn non_struct_templates_are_rejected() {
		assert!(matches!(probe_template(&7_u32), Err(ProbeError::NotAStruct("primitive"))));
		assert!(matches!(probe_template("text"), Err(ProbeError::NotAStruct("string"))));
		assert!(matches!(probe_template(&vec![1, 2]), Err(ProbeError::NotAStruct("sequence"))));
		assert!(matches!(probe_template(&BTreeMap::<String, u8>::new()), Err(ProbeError::NotAStruct("map"))));
		assert!(matches!(probe_template(&Some(Marker)), Err(ProbeError::NotAStruct("option"))));
		assert!(matches!(probe_template(&Pair(1, 2)), Err(ProbeError::NotAStruct("tuple struct"))));
	}
}
