use std::fmt;

/// One step from a parent value to a child value in a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select an object member by key.
	Key(String),
	/// Select an array element by zero-based index.
	Index(usize),
}

/// Location of a value inside a document tree, rendered as `$.lhs.exprs[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocPath {
	/// Ordered steps from the document root.
	pub steps: Vec<PathStep>,
}

impl DocPath {
	/// Path pointing at the document root.
	pub fn root() -> Self {
		Self::default()
	}

	/// Number of steps below the root.
	pub fn depth(&self) -> usize {
		self.steps.len()
	}

	pub(crate) fn push_key(&mut self, key: &str) {
		self.steps.push(PathStep::Key(key.to_owned()));
	}

	pub(crate) fn push_index(&mut self, index: usize) {
		self.steps.push(PathStep::Index(index));
	}

	pub(crate) fn pop(&mut self) {
		self.steps.pop();
	}
}

impl fmt::Display for DocPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("$")?;
		for step in &self.steps {
			match step {
				PathStep::Key(key) if is_plain_key(key) => write!(f, ".{key}")?,
				PathStep::Key(key) => write!(f, "[{key:?}]")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

fn is_plain_key(key: &str) -> bool {
	!key.is_empty() && key.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}
