use std::sync::Arc;

use crate::InferredTemplateModel;
use crate::ParsingOptions;
use crate::StacheResult;
use crate::Template;
use crate::TokenExpander;
use crate::UsedAs;
use crate::lexer::tokenize;
use crate::tokens::Token;

/// A node of a parsed template.
///
/// The tree is built once and never changes, so one [`Template`] can render
/// any number of models, including from several threads at once.
#[derive(Debug, Clone)]
pub enum Node {
	/// Literal text.
	Content(String),
	/// `{{path}}` when `escaped`, `{{{path}}}` or `{{&path}}` otherwise.
	Value { path: String, escaped: bool },
	/// `{{#path}}...{{/path}}`
	Conditional { path: String, body: Vec<Node> },
	/// `{{^path}}...{{/path}}`
	Inverted { path: String, body: Vec<Node> },
	/// `{{#each path}}...{{/each}}`
	Collection { path: String, body: Vec<Node> },
	/// A tag claimed by a [`TokenExpander`].
	Custom {
		path: String,
		expander: Arc<dyn TokenExpander>,
	},
}

impl Node {
	/// The child nodes of a block, empty for everything else.
	pub fn body(&self) -> &[Node] {
		match self {
			Node::Conditional { body, .. }
			| Node::Inverted { body, .. }
			| Node::Collection { body, .. } => body,
			Node::Content(_) | Node::Value { .. } | Node::Custom { .. } => &[],
		}
	}
}

/// The result of [`parse_with_model_inference`].
#[derive(Debug, Clone)]
pub struct ExtendedParseInformation {
	pub template: Template,
	/// The model shape the template expects.
	pub inferred_model: InferredTemplateModel,
}

/// Parse a template.
///
/// Every error found while tokenizing is collected, and the first one is
/// returned. Use [`tokenize`] directly to see all of them.
///
/// ```rust
/// use stache_core::ParsingOptions;
/// use stache_core::Value;
///
/// let template = stache_core::parse("Hello {{name}}!", ParsingOptions::default()).unwrap();
/// let model: Value = [("name", "<World>")].into_iter().collect();
///
/// assert_eq!(template.render(&model).unwrap(), "Hello &lt;World&gt;!");
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(source_name = %options.source_name))]
pub fn parse(template: impl AsRef<str>, options: ParsingOptions) -> StacheResult<Template> {
	let tokens = tokenize_strict(template.as_ref(), &options)?;
	let nodes = build_tree(&tokens, None);

	Ok(Template::new(nodes, options))
}

/// Parse a template and infer the shape of the model it expects.
#[tracing::instrument(level = "debug", skip_all, fields(source_name = %options.source_name))]
pub fn parse_with_model_inference(
	template: impl AsRef<str>,
	options: ParsingOptions,
) -> StacheResult<ExtendedParseInformation> {
	let tokens = tokenize_strict(template.as_ref(), &options)?;
	let mut inferred_model = InferredTemplateModel::new();
	let nodes = build_tree(&tokens, Some(&mut inferred_model));

	Ok(ExtendedParseInformation {
		template: Template::new(nodes, options),
		inferred_model,
	})
}

fn tokenize_strict(template: &str, options: &ParsingOptions) -> StacheResult<Vec<Token>> {
	let mut result = tokenize(template, options);

	if result.errors.is_empty() {
		Ok(result.tokens)
	} else {
		Err(result.errors.swap_remove(0).into())
	}
}

/// Build the node tree for a token sequence, optionally recording every path
/// into `inferred_model`.
pub fn build_tree(tokens: &[Token], inferred_model: Option<&mut InferredTemplateModel>) -> Vec<Node> {
	let (nodes, _) = build_nodes(tokens, 0, inferred_model, false);
	nodes
}

/// Build nodes from `cursor` onwards and return them with the position after
/// the last consumed token.
///
/// A nested call returns at the first close token, whatever kind of block it
/// belongs to: the caller that saw the open token decides which node to
/// build. The outermost call runs to the end and skips stray close tokens.
fn build_nodes(
	tokens: &[Token],
	mut cursor: usize,
	mut scope: Option<&mut InferredTemplateModel>,
	nested: bool,
) -> (Vec<Node>, usize) {
	let mut nodes = vec![];

	while let Some(token) = tokens.get(cursor) {
		cursor += 1;

		match token {
			Token::Content(text) => nodes.push(Node::Content(text.clone())),
			Token::EscapedValue(path) | Token::UnescapedValue(path) => {
				if let Some(model) = scope.as_deref_mut() {
					model.register(path, UsedAs::Scalar);
				}

				nodes.push(Node::Value {
					path: path.clone(),
					escaped: matches!(token, Token::EscapedValue(_)),
				});
			}
			Token::ElementOpen(path) | Token::InvertedOpen(path) | Token::CollectionOpen(path) => {
				let usage = if matches!(token, Token::CollectionOpen(_)) {
					UsedAs::Collection
				} else {
					UsedAs::ConditionalValue
				};

				if let Some(model) = scope.as_deref_mut() {
					model.register(path, usage);
				}

				let (body, next) = build_nodes(tokens, cursor, scope.as_deref_mut(), true);
				cursor = next;
				let path = path.clone();

				nodes.push(match token {
					Token::ElementOpen(_) => Node::Conditional { path, body },
					Token::InvertedOpen(_) => Node::Inverted { path, body },
					_ => Node::Collection { path, body },
				});
			}
			Token::ElementClose(_) | Token::CollectionClose(_) => {
				if nested {
					return (nodes, cursor);
				}
			}
			Token::Custom { path, expander } => {
				nodes.push(Node::Custom {
					path: path.clone(),
					expander: expander.clone(),
				});
			}
		}
	}

	(nodes, cursor)
}
