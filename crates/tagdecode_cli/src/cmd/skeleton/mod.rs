use serde::Serialize;
use serde_json::{Map, Value, json};
use tagdecode::unpack::{Skeleton, decode};
use tracing::debug;

use crate::cmd::util::{emit_json, truncate};
use crate::cmd::{DecodeArgs, Result, load_registry, open_document};

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub decode: DecodeArgs,
	#[arg(long)]
	pub json: bool,
}

/// Output truncation limits for skeleton trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of characters printed for a raw value.
	pub max_raw_len: usize,
	/// Maximum number of elements printed for sequences.
	pub max_seq_items: usize,
	/// Maximum nesting depth printed before collapsing.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_raw_len: 120,
			max_seq_items: 16,
			max_print_depth: 12,
		}
	}
}

#[derive(Serialize)]
struct SkeletonJson {
	path: String,
	compression: &'static str,
	key: String,
	typed_nodes: usize,
	skeleton: Value,
}

/// Decode a document against a schema and print the resolved skeleton.
pub fn run(args: Args) -> Result<()> {
	let Args { decode: decode_args, json } = args;

	let registry = load_registry(&decode_args.schema)?;
	let document = open_document(&decode_args.document)?;
	let skeleton = decode(&registry, &decode_args.key, &document.root, &decode_args.options())?;
	debug!(typed = skeleton.count_typed(), "decoded skeleton");

	if json {
		emit_json(&SkeletonJson {
			path: decode_args.document.display().to_string(),
			compression: document.compression.as_str(),
			key: decode_args.key,
			typed_nodes: skeleton.count_typed(),
			skeleton: skeleton_to_json(&skeleton),
		});
		return Ok(());
	}

	println!("path: {}", decode_args.document.display());
	println!("compression: {}", document.compression.as_str());
	println!("key: {}", decode_args.key);
	println!("typed_nodes: {}", skeleton.count_typed());
	for line in render_skeleton(&skeleton, PrintOptions::default()) {
		println!("{line}");
	}

	Ok(())
}

/// Render a skeleton as indented text lines.
pub fn render_skeleton(skeleton: &Skeleton, options: PrintOptions) -> Vec<String> {
	let mut lines = Vec::new();
	render_into(skeleton, "", 0, 0, options, &mut lines);
	lines
}

fn render_into(skeleton: &Skeleton, label: &str, indent: usize, depth: u32, options: PrintOptions, lines: &mut Vec<String>) {
	let pad = " ".repeat(indent);
	match skeleton {
		Skeleton::Raw(value) => lines.push(format!("{pad}{label}{}", truncate(&value.to_string(), options.max_raw_len))),
		Skeleton::Typed(node) => {
			if node.slots.is_empty() {
				lines.push(format!("{pad}{label}{}", node.type_name));
				return;
			}
			if depth >= options.max_print_depth {
				lines.push(format!("{pad}{label}{} {{ ... }}", node.type_name));
				return;
			}
			lines.push(format!("{pad}{label}{} {{", node.type_name));
			for slot in &node.slots {
				render_into(&slot.value, &format!("{} = ", slot.name), indent + 2, depth + 1, options, lines);
			}
			lines.push(format!("{pad}}}"));
		}
		Skeleton::Map(entries) => {
			if depth >= options.max_print_depth {
				lines.push(format!("{pad}{label}{{ ... {} entries }}", entries.len()));
				return;
			}
			lines.push(format!("{pad}{label}{{"));
			for (name, value) in entries {
				render_into(value, &format!("{name}: "), indent + 2, depth + 1, options, lines);
			}
			lines.push(format!("{pad}}}"));
		}
		Skeleton::Seq(items) => {
			if items.is_empty() {
				lines.push(format!("{pad}{label}[]"));
				return;
			}
			if depth >= options.max_print_depth {
				lines.push(format!("{pad}{label}[... {} items]", items.len()));
				return;
			}
			lines.push(format!("{pad}{label}["));
			for item in items.iter().take(options.max_seq_items) {
				render_into(item, "", indent + 2, depth + 1, options, lines);
			}
			if items.len() > options.max_seq_items {
				lines.push(format!("{pad}  ... {} more", items.len() - options.max_seq_items));
			}
			lines.push(format!("{pad}]"));
		}
	}
}

/// Describe a skeleton as JSON, tagging each node with its variant.
pub fn skeleton_to_json(skeleton: &Skeleton) -> Value {
	match skeleton {
		Skeleton::Typed(node) => {
			let slots: Map<String, Value> = node
				.slots
				.iter()
				.map(|slot| (slot.name.to_string(), skeleton_to_json(&slot.value)))
				.collect();
			json!({ "kind": "typed", "type": &*node.type_name, "slots": slots })
		}
		Skeleton::Map(entries) => {
			let entries: Map<String, Value> = entries.iter().map(|(name, value)| (name.clone(), skeleton_to_json(value))).collect();
			json!({ "kind": "map", "entries": entries })
		}
		Skeleton::Seq(items) => json!({ "kind": "seq", "items": items.iter().map(skeleton_to_json).collect::<Vec<_>>() }),
		Skeleton::Raw(value) => json!({ "kind": "raw", "value": value }),
	}
}
