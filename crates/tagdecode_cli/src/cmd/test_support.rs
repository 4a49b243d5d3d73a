use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use tagdecode_testkit::{fixture_path as shared_fixture_path, target_dir as workspace_target_dir};

static TAGDECODE_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

pub(crate) fn run_tagdecode(args: &[&str]) -> Output {
	Command::new(tagdecode_bin()).args(args).output().expect("tagdecode command executes")
}

pub(crate) fn run_tagdecode_json(args: &[&str]) -> serde_json::Value {
	let output = run_tagdecode(args);
	assert!(
		output.status.success(),
		"tagdecode command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn tagdecode_bin() -> &'static PathBuf {
	TAGDECODE_BIN.get_or_init(resolve_tagdecode_bin)
}

fn resolve_tagdecode_bin() -> PathBuf {
	if let Some(path) = option_env!("CARGO_BIN_EXE_tagdecode") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let mut bin = workspace_target_dir().join("debug");
	bin.push(if cfg!(windows) { "tagdecode.exe" } else { "tagdecode" });

	let status = Command::new(env!("CARGO"))
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "tagdecode"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build tagdecode binary at {}", bin.display());

	bin
}
