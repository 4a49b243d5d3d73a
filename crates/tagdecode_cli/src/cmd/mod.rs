use std::path::{Path, PathBuf};

use tagdecode::unpack::{DecodeError, DecodeOptions, Document, FillError, Registry, RegistryError, RegistrySchema};
use thiserror::Error;

/// Structural fill command.
pub mod fill;
/// Registry schema inspection command.
pub mod schema;
/// Skeleton decode command.
pub mod skeleton;
pub(crate) mod util;

#[cfg(test)]
mod test_support;

/// Result alias shared by all subcommands.
pub type Result<T> = std::result::Result<T, CliError>;

/// Failures surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
	/// Schema file could not be loaded or registered.
	#[error(transparent)]
	Registry(#[from] RegistryError),
	/// Document could not be read or decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Skeleton could not be filled from the document.
	#[error(transparent)]
	Fill(#[from] FillError),
	/// Requested type is absent from the schema.
	#[error("type {name} is not in the schema")]
	TypeNotFound {
		/// Requested type name.
		name: String,
	},
}

/// Options shared by commands that decode a document.
#[derive(clap::Args)]
pub struct DecodeArgs {
	/// Registry schema file (JSON).
	pub schema: PathBuf,
	/// Document to decode (JSON, optionally zstd-compressed).
	pub document: PathBuf,
	/// Member name that carries the discriminator.
	#[arg(long, default_value = "op")]
	pub key: String,
	/// Maximum nesting depth walked before failing.
	#[arg(long)]
	pub max_depth: Option<u32>,
	/// Use the shallow depth limit for untrusted documents.
	#[arg(long, conflicts_with = "max_depth")]
	pub shallow: bool,
}

impl DecodeArgs {
	pub(crate) fn options(&self) -> DecodeOptions {
		match self.max_depth {
			Some(max_depth) => DecodeOptions { max_depth },
			None if self.shallow => DecodeOptions::shallow(),
			None => DecodeOptions::default(),
		}
	}
}

pub(crate) fn load_registry(path: &Path) -> Result<Registry> {
	let schema = RegistrySchema::load(path)?;
	Ok(Registry::from_schema(&schema)?)
}

pub(crate) fn open_document(path: &Path) -> Result<Document> {
	Ok(Document::open(path)?)
}
