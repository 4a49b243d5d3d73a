use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::unpack::{DecodeError, DecodeOptions, DocPath, FillError, Registry, Skeleton, UnpackError, decode};

/// Complete a skeleton from its source document into a serde-ready value.
///
/// Each typed node becomes a single-key object `{ "<type name>": { ... } }` holding every
/// member of the source object, with polymorphic slots replaced by their own filled values.
/// Untagged maps and sequences keep the source shape, so a family enum deriving
/// `Deserialize` (externally tagged, with an `#[serde(untagged)]` wrapper variant if needed)
/// can take the result directly. Raw entries are read back from `raw`, not the skeleton.
pub fn fill(skeleton: &Skeleton, raw: &Value) -> Result<Value, FillError> {
	let mut path = DocPath::root();
	fill_impl(skeleton, raw, &mut path)
}

/// Fill a skeleton and run the structural serde pass into `T`.
pub fn fill_into<T: DeserializeOwned>(skeleton: &Skeleton, raw: &Value) -> Result<T, FillError> {
	let filled = fill(skeleton, raw)?;
	Ok(serde_json::from_value(filled)?)
}

/// Decode and fill an already-parsed document into `T`.
pub fn unpack_value<T: DeserializeOwned>(registry: &Registry, key: &str, root: &Value, opt: &DecodeOptions) -> Result<T, UnpackError> {
	let skeleton = decode(registry, key, root, opt)?;
	Ok(fill_into(&skeleton, root)?)
}

/// Parse JSON text, decode its skeleton, and fill it into `T`.
pub fn unpack<T: DeserializeOwned>(registry: &Registry, key: &str, src: &str, opt: &DecodeOptions) -> Result<T, UnpackError> {
	let root: Value = serde_json::from_str(src).map_err(DecodeError::from)?;
	unpack_value(registry, key, &root, opt)
}

fn fill_impl(skeleton: &Skeleton, raw: &Value, path: &mut DocPath) -> Result<Value, FillError> {
	match skeleton {
		Skeleton::Typed(node) => {
			let object = expect_object(raw, path)?;
			let mut members = object.clone();
			for slot in &node.slots {
				path.push_key(&slot.name);
				let source = object.get(&*slot.name).ok_or_else(|| mismatch(path, "member"))?;
				let filled = fill_impl(&slot.value, source, path)?;
				path.pop();
				members.insert(slot.name.to_string(), filled);
			}

			let mut tagged = Map::with_capacity(1);
			tagged.insert(node.type_name.to_string(), Value::Object(members));
			Ok(Value::Object(tagged))
		}
		Skeleton::Map(entries) => {
			let object = expect_object(raw, path)?;
			let mut out = Map::with_capacity(entries.len());
			for (key, entry) in entries {
				path.push_key(key);
				let source = object.get(key).ok_or_else(|| mismatch(path, "member"))?;
				let filled = fill_impl(entry, source, path)?;
				path.pop();
				out.insert(key.clone(), filled);
			}
			Ok(Value::Object(out))
		}
		Skeleton::Seq(items) => {
			let Value::Array(source) = raw else {
				return Err(mismatch(path, "array"));
			};
			if source.len() != items.len() {
				return Err(mismatch(path, "array of equal length"));
			}

			let mut out = Vec::with_capacity(items.len());
			for (idx, (item, source)) in items.iter().zip(source).enumerate() {
				path.push_index(idx);
				out.push(fill_impl(item, source, path)?);
				path.pop();
			}
			Ok(Value::Array(out))
		}
		Skeleton::Raw(_) => Ok(raw.clone()),
	}
}

fn expect_object<'v>(raw: &'v Value, path: &DocPath) -> Result<&'v Map<String, Value>, FillError> {
	raw.as_object().ok_or_else(|| mismatch(path, "object"))
}

fn mismatch(path: &DocPath, expected: &'static str) -> FillError {
	FillError::ShapeMismatch {
		path: path.to_string(),
		expected,
	}
}
