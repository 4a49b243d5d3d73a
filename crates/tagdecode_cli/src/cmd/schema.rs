use std::path::PathBuf;

use serde::Serialize;
use tagdecode::unpack::TypeDescriptor;

use crate::cmd::util::emit_json;
use crate::cmd::{CliError, Result, load_registry};

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct SchemaJson {
	path: String,
	type_count: usize,
	types: Vec<TypeJson>,
}

#[derive(Serialize)]
struct TypeJson {
	name: String,
	polymorphic: usize,
	fields: Vec<FieldJson>,
}

#[derive(Serialize)]
struct FieldJson {
	name: String,
	kind: &'static str,
}

/// Load a schema file, register it, and print its types.
pub fn run(args: Args) -> Result<()> {
	let Args { schema: path, type_name, json } = args;

	let registry = load_registry(&path)?;
	let selected: Vec<&TypeDescriptor> = match type_name {
		Some(name) => vec![registry.lookup(&name).ok_or(CliError::TypeNotFound { name })?],
		None => registry.iter().collect(),
	};

	if json {
		emit_json(&SchemaJson {
			path: path.display().to_string(),
			type_count: registry.len(),
			types: selected.iter().map(|item| type_to_json(item)).collect(),
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("types: {}", registry.len());
	for item in selected {
		println!();
		println!("type: {}", item.name);
		println!("polymorphic_fields: {}", item.polymorphic_fields().count());
		for field in &item.fields {
			println!("  {}\t{}", field.name, field.kind.as_str());
		}
	}

	Ok(())
}

fn type_to_json(item: &TypeDescriptor) -> TypeJson {
	TypeJson {
		name: item.name.to_string(),
		polymorphic: item.polymorphic_fields().count(),
		fields: item
			.fields
			.iter()
			.map(|field| FieldJson {
				name: field.name.to_string(),
				kind: field.kind.as_str(),
			})
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use crate::cmd::test_support::{fixture_path, run_tagdecode, run_tagdecode_json};

	#[test]
	fn schema_json_lists_sorted_types_with_kinds() {
		let schema = fixture_path("expr_schema.json");
		let schema = schema.to_string_lossy().into_owned();
		let json = run_tagdecode_json(&["schema", &schema, "--json"]);

		assert_eq!(json["type_count"], 4);
		assert_eq!(json["types"][0]["name"], "BinaryExpr");
		assert_eq!(json["types"][0]["polymorphic"], 2);
		assert_eq!(json["types"][1]["fields"][1]["kind"], "sequence");
	}

	#[test]
	fn schema_type_filter_rejects_unknown_name() {
		let schema = fixture_path("expr_schema.json");
		let schema = schema.to_string_lossy().into_owned();
		let output = run_tagdecode(&["schema", &schema, "--type", "TernaryExpr"]);

		assert!(!output.status.success());
		let stderr = String::from_utf8_lossy(&output.stderr);
		assert!(stderr.contains("error: type TernaryExpr is not in the schema"), "stderr: {stderr}");
	}
}
