#![allow(missing_docs)]

use tagdecode::unpack::{Compression, DecodeError, DecodeOptions, Document, Registry, RegistrySchema, Skeleton, decode, fill};
use tagdecode_testkit::{fixture_json, fixture_path};

fn schema_registry() -> Registry {
	let schema = RegistrySchema::load(fixture_path("expr_schema.json")).expect("schema fixture loads");
	Registry::from_schema(&schema).expect("schema registers")
}

fn decode_fixture(name: &str) -> tagdecode::unpack::Result<Skeleton> {
	let doc = Document::open(fixture_path(name)).expect("fixture opens");
	assert_eq!(doc.compression, Compression::None);
	decode(&schema_registry(), "op", &doc.root, &DecodeOptions::default())
}

#[test]
fn binary_fixture_resolves_terminals() {
	let skeleton = decode_fixture("expr_binary.json").expect("decode succeeds");
	let root = skeleton.as_typed().expect("typed root");
	assert_eq!(&*root.type_name, "BinaryExpr");
	assert_eq!(root.slot("lhs").and_then(Skeleton::type_name), Some("Terminal"));
	assert_eq!(root.slot("rhs").and_then(Skeleton::type_name), Some("Terminal"));
}

#[test]
fn nested_fixture_types_every_level() {
	let skeleton = decode_fixture("expr_nested.json").expect("decode succeeds");
	assert_eq!(skeleton.count_typed(), 6);

	let filled = fill(&skeleton, &fixture_json("expr_nested.json")).expect("fill succeeds");
	assert_eq!(filled["BinaryExpr"]["lhs"]["UnaryExpr"]["operand"]["Terminal"]["body"], "foo");
	assert_eq!(filled["BinaryExpr"]["rhs"]["BinaryExpr"]["rhs"]["Terminal"]["body"], "baz");
}

#[test]
fn list_fixture_keeps_element_order() {
	let skeleton = decode_fixture("expr_list.json").expect("decode succeeds");
	let Some(Skeleton::Seq(items)) = skeleton.as_typed().and_then(|node| node.slot("exprs")) else {
		panic!("expected exprs sequence");
	};
	let types: Vec<_> = items.iter().map(Skeleton::type_name).collect();
	assert_eq!(types, vec![Some("UnaryExpr"), Some("BinaryExpr")]);
}

#[test]
fn wrapper_fixture_falls_back_to_map() {
	let skeleton = decode_fixture("expr_wrapper.json").expect("decode succeeds");
	let Some(Skeleton::Map(entries)) = skeleton.as_typed().and_then(|node| node.slot("operand")) else {
		panic!("expected generic map operand");
	};
	assert_eq!(entries.get("expr").and_then(Skeleton::type_name), Some("Terminal"));
}

#[test]
fn unknown_fixture_reports_location() {
	let err = decode_fixture("expr_unknown.json").expect_err("unknown type fails");
	match err {
		DecodeError::UnknownDiscriminator { value, path, .. } => {
			assert_eq!(value, "TernaryExpr");
			assert_eq!(path, "$.operand");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn missing_fixture_is_an_io_error() {
	let err = Document::open(fixture_path("does_not_exist.json")).expect_err("missing file fails");
	assert!(matches!(err, DecodeError::Io(_)));
}
