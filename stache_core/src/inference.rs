use std::fmt::Display;

use indexmap::IndexMap;
use serde::Serialize;

use crate::path::keys;

/// How a template uses the value at some path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsedAs {
	/// `{{path}}`, `{{{path}}}` or `{{&path}}`
	Scalar,
	/// `{{#each path}}`
	Collection,
	/// `{{#path}}` or `{{^path}}`
	ConditionalValue,
}

impl Display for UsedAs {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Scalar => write!(f, "scalar"),
			Self::Collection => write!(f, "collection"),
			Self::ConditionalValue => write!(f, "conditional"),
		}
	}
}

/// The shape of model a template expects, collected while parsing.
///
/// Every dotted path seen in a value or block tag becomes a chain of children
/// and the last one is tagged with the first usage seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InferredTemplateModel {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub used_as: Option<UsedAs>,
	#[serde(skip_serializing_if = "IndexMap::is_empty")]
	pub children: IndexMap<String, InferredTemplateModel>,
}

impl InferredTemplateModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record that `path` is used as `usage` and return its node. Parent
	/// navigation (`../`) is not part of the recorded path. A path without any
	/// key (such as `.`) refers to the current context and records nothing.
	pub fn register(&mut self, path: &str, usage: UsedAs) -> &mut Self {
		let mut current = self;
		let mut has_keys = false;

		for key in keys(path) {
			has_keys = true;
			current = current.children.entry(key.to_string()).or_default();
		}

		if has_keys && current.used_as.is_none() {
			current.used_as = Some(usage);
		}

		current
	}

	pub fn child(&self, name: &str) -> Option<&InferredTemplateModel> {
		self.children.get(name)
	}

	/// Find the node for a dotted path.
	pub fn get(&self, path: &str) -> Option<&InferredTemplateModel> {
		keys(path).try_fold(self, |node, key| node.child(key))
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	fn write_tree(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
		for (name, child) in &self.children {
			write!(f, "{:indent$}{name}", "", indent = depth * 2)?;
			if let Some(used_as) = child.used_as {
				write!(f, ": {used_as}")?;
			}
			writeln!(f)?;
			child.write_tree(f, depth + 1)?;
		}

		Ok(())
	}
}

/// An indented outline of the inferred paths.
impl Display for InferredTemplateModel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.write_tree(f, 0)
	}
}
