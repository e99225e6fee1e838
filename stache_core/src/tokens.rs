use std::fmt::Display;
use std::sync::Arc;

use crate::TokenExpander;

/// A token produced by the tokenizer. Every tag yields at most two tokens and
/// text between tags yields a single [`Token::Content`].
#[derive(Debug, Clone)]
pub enum Token {
	/// Literal text between tags, kept verbatim.
	Content(String),
	/// `{{path}}`
	EscapedValue(String),
	/// `{{{path}}}` or `{{&path}}`
	UnescapedValue(String),
	/// `{{#path}}`
	ElementOpen(String),
	/// `{{/path}}`, or a repeated `{{#path}}` / `{{^path}}`
	ElementClose(String),
	/// `{{^path}}`
	InvertedOpen(String),
	/// `{{#each path}}`
	CollectionOpen(String),
	/// `{{/each}}`
	CollectionClose(String),
	/// A tag claimed by a [`TokenExpander`].
	Custom {
		path: String,
		expander: Arc<dyn TokenExpander>,
	},
}

impl Eq for Token {}
impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Token::Content(value), Token::Content(other_value))
			| (Token::EscapedValue(value), Token::EscapedValue(other_value))
			| (Token::UnescapedValue(value), Token::UnescapedValue(other_value))
			| (Token::ElementOpen(value), Token::ElementOpen(other_value))
			| (Token::ElementClose(value), Token::ElementClose(other_value))
			| (Token::InvertedOpen(value), Token::InvertedOpen(other_value))
			| (Token::CollectionOpen(value), Token::CollectionOpen(other_value))
			| (Token::CollectionClose(value), Token::CollectionClose(other_value)) => {
				value == other_value
			}
			(
				Token::Custom { path, expander },
				Token::Custom {
					path: other_path,
					expander: other_expander,
				},
			) => path == other_path && Arc::ptr_eq(expander, other_expander),
			_ => false,
		}
	}
}

impl Token {
	/// The path (or literal text for [`Token::Content`]) carried by the token.
	pub fn value(&self) -> &str {
		match self {
			Token::Content(value)
			| Token::EscapedValue(value)
			| Token::UnescapedValue(value)
			| Token::ElementOpen(value)
			| Token::ElementClose(value)
			| Token::InvertedOpen(value)
			| Token::CollectionOpen(value)
			| Token::CollectionClose(value) => value,
			Token::Custom { path, .. } => path,
		}
	}

	/// Whether this token ends the block that is currently being built.
	pub fn is_close(&self) -> bool {
		matches!(self, Token::ElementClose(_) | Token::CollectionClose(_))
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Token::Content(text) => write!(f, "{text}"),
			Token::EscapedValue(path) => write!(f, "{{{{{path}}}}}"),
			Token::UnescapedValue(path) => write!(f, "{{{{{{{path}}}}}}}"),
			Token::ElementOpen(path) => write!(f, "{{{{#{path}}}}}"),
			Token::ElementClose(path) => write!(f, "{{{{/{path}}}}}"),
			Token::InvertedOpen(path) => write!(f, "{{{{^{path}}}}}"),
			Token::CollectionOpen(path) => write!(f, "{{{{#each {path}}}}}"),
			Token::CollectionClose(_) => write!(f, "{{{{/each}}}}"),
			Token::Custom { path, expander } => write!(f, "{{{{{path}}}}} ({expander:?})"),
		}
	}
}
