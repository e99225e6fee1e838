use serde::Serialize;

use crate::Context;
use crate::ContextArena;
use crate::Node;
use crate::ParsingOptions;
use crate::StacheError;
use crate::StacheResult;
use crate::Value;

/// A parsed template, ready to render models.
#[derive(Debug, Clone)]
pub struct Template {
	nodes: Vec<Node>,
	options: ParsingOptions,
}

impl Template {
	pub(crate) fn new(nodes: Vec<Node>, options: ParsingOptions) -> Self {
		Self { nodes, options }
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn options(&self) -> &ParsingOptions {
		&self.options
	}

	/// Render the template against `model`.
	pub fn render(&self, model: &Value) -> StacheResult<String> {
		let mut output = String::new();
		self.render_to(model, &mut output)?;
		Ok(output)
	}

	/// Render the template against `model`, appending to `output`. On error
	/// `output` holds whatever was rendered before the failing node.
	pub fn render_to(&self, model: &Value, output: &mut String) -> StacheResult<()> {
		let arena = ContextArena::new(model);
		let result = render_nodes(&self.nodes, arena.root(), &self.options, output);

		tracing::debug!(
			contexts = arena.len(),
			bytes = output.len(),
			ok = result.is_ok(),
			"rendered template"
		);

		result
	}

	/// Convert `model` with [`Value::from_serialize`] and render it.
	pub fn render_serialize<T: Serialize + ?Sized>(&self, model: &T) -> StacheResult<String> {
		self.render(&Value::from_serialize(model)?)
	}
}

fn render_nodes(
	nodes: &[Node],
	context: Context<'_, '_>,
	options: &ParsingOptions,
	output: &mut String,
) -> StacheResult<()> {
	for node in nodes {
		match node {
			Node::Content(text) => output.push_str(text),
			Node::Value { path, escaped } => {
				let resolved = context.resolve(path);
				if resolved.value().is_none() {
					continue;
				}

				let text = resolved.stringify();
				if *escaped && !options.disable_content_safety {
					escape_html(&text, output);
				} else {
					output.push_str(&text);
				}
			}
			Node::Conditional { path, body } => {
				let resolved = context.resolve(path);
				if resolved.exists() {
					render_nodes(body, resolved, options, output)?;
				}
			}
			Node::Inverted { path, body } => {
				let resolved = context.resolve(path);
				if !resolved.exists() {
					render_nodes(body, resolved, options, output)?;
				}
			}
			Node::Collection { path, body } => {
				let resolved = context.resolve(path);
				let Some(value) = resolved.value().filter(|_| resolved.exists()) else {
					continue;
				};

				let Some(elements) = value.elements() else {
					tracing::debug!(path, kind = value.kind(), "collection path holds a scalar");
					return Err(StacheError::ScalarUsedAsCollection { path: path.clone() });
				};

				for (index, element) in elements.enumerate() {
					render_nodes(body, resolved.element(index, element), options, output)?;
				}
			}
			Node::Custom { path, expander } => {
				expander.render(path, context, options, output)?;
			}
		}
	}

	Ok(())
}

/// Append `text` with the HTML special characters `&<>"'` replaced by
/// entities.
pub fn escape_html(text: &str, output: &mut String) {
	for ch in text.chars() {
		match ch {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'>' => output.push_str("&gt;"),
			'"' => output.push_str("&quot;"),
			'\'' => output.push_str("&#39;"),
			_ => output.push(ch),
		}
	}
}
