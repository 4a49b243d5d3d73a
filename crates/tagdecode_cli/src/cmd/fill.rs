use tagdecode::unpack::{decode, fill};
use tracing::debug;

use crate::cmd::util::emit_json;
use crate::cmd::{DecodeArgs, Result, load_registry, open_document};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub decode: DecodeArgs,
}

/// Decode a document and print it with every family member wrapped under its type name.
///
/// The output is the externally tagged form a `serde` family enum deserializes from.
pub fn run(args: Args) -> Result<()> {
	let Args { decode: decode_args } = args;

	let registry = load_registry(&decode_args.schema)?;
	let document = open_document(&decode_args.document)?;
	let skeleton = decode(&registry, &decode_args.key, &document.root, &decode_args.options())?;
	let filled = fill(&skeleton, &document.root)?;
	debug!(typed = skeleton.count_typed(), "filled document");

	emit_json(&filled);
	Ok(())
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use crate::cmd::test_support::{fixture_path, run_tagdecode, run_tagdecode_json};

	#[test]
	fn fill_wraps_list_members_in_order() {
		let schema = fixture_path("expr_schema.json").to_string_lossy().into_owned();
		let document = fixture_path("expr_list.json").to_string_lossy().into_owned();
		let json = run_tagdecode_json(&["fill", &schema, &document]);

		let exprs = &json["ListExpr"]["exprs"];
		assert!(exprs[0].get("UnaryExpr").is_some(), "first member: {}", exprs[0]);
		assert!(exprs[1].get("BinaryExpr").is_some(), "second member: {}", exprs[1]);
	}

	#[test]
	fn fill_keeps_wrapper_objects_untagged() {
		let schema = fixture_path("expr_schema.json").to_string_lossy().into_owned();
		let document = fixture_path("expr_wrapper.json").to_string_lossy().into_owned();
		let json = run_tagdecode_json(&["fill", &schema, &document]);

		assert_eq!(json["UnaryExpr"]["operand"]["expr"]["Terminal"]["body"], "nested");
	}

	#[test]
	fn fill_reads_zstd_compressed_documents() {
		let source = std::fs::read(fixture_path("expr_binary.json")).expect("fixture readable");
		let compressed = zstd_frame(&source);

		let dir = tagdecode_testkit::target_dir().join("tagdecode-cli-tests");
		std::fs::create_dir_all(&dir).expect("scratch dir created");
		let path = dir.join("expr_binary.json.zst");
		std::fs::File::create(&path)
			.and_then(|mut file| file.write_all(&compressed))
			.expect("compressed fixture written");

		let schema = fixture_path("expr_schema.json").to_string_lossy().into_owned();
		let document = path.to_string_lossy().into_owned();
		let json = run_tagdecode_json(&["fill", &schema, &document]);
		assert_eq!(json["BinaryExpr"]["lhs"]["Terminal"]["body"], "foo");
	}

	#[test]
	fn fill_with_other_key_reports_untyped_document() {
		let schema = fixture_path("expr_schema.json").to_string_lossy().into_owned();
		let document = fixture_path("expr_binary.json").to_string_lossy().into_owned();
		let json = run_tagdecode_json(&["fill", &schema, &document, "--key", "kind"]);

		assert_eq!(json["op"], "BinaryExpr");
		assert!(json.get("BinaryExpr").is_none());
	}

	#[test]
	fn missing_document_fails_with_io_error() {
		let schema = fixture_path("expr_schema.json").to_string_lossy().into_owned();
		let document = fixture_path("does_not_exist.json").to_string_lossy().into_owned();
		let output = run_tagdecode(&["fill", &schema, &document]);

		assert!(!output.status.success());
		assert!(String::from_utf8_lossy(&output.stderr).contains("error: io:"));
	}

	fn zstd_frame(source: &[u8]) -> Vec<u8> {
		zstd::encode_all(source, 3).expect("zstd encodes")
	}
}
