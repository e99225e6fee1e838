use std::fmt::Debug;
use std::sync::Arc;

use crate::Context;
use crate::StacheResult;

/// Options that control how a template is tokenized and rendered.
#[derive(Debug, Clone, Default)]
pub struct ParsingOptions {
	/// Write every value unescaped, even `{{value}}` tags.
	pub disable_content_safety: bool,
	/// A label embedded in every parse error, usually the template's file
	/// name.
	pub source_name: String,
	/// Custom tag recognizers, consulted in the order they were added within
	/// each [`Precedence`] level.
	pub token_expanders: Vec<Arc<dyn TokenExpander>>,
}

impl ParsingOptions {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
		self.source_name = source_name.into();
		self
	}

	#[must_use]
	pub fn with_content_safety_disabled(mut self, disabled: bool) -> Self {
		self.disable_content_safety = disabled;
		self
	}

	#[must_use]
	pub fn with_token_expander(mut self, expander: impl TokenExpander + 'static) -> Self {
		self.token_expanders.push(Arc::new(expander));
		self
	}

	/// The registered expanders with the given precedence, in registration
	/// order.
	pub(crate) fn expanders_with(
		&self,
		precedence: Precedence,
	) -> impl Iterator<Item = &Arc<dyn TokenExpander>> {
		self.token_expanders
			.iter()
			.filter(move |expander| expander.precedence() == precedence)
	}
}

/// When a [`TokenExpander`] is consulted relative to the built-in tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precedence {
	/// Before any built-in tag, so it can claim `{{#...}}` style tags.
	High,
	/// After the block, unescaped and comment tags but before a tag falls
	/// back to being an escaped value.
	#[default]
	Medium,
	/// After every `Medium` expander.
	Low,
}

/// A pluggable recognizer for custom tags.
///
/// The tokenizer hands every tag (including its braces, e.g. `{{> header}}`)
/// to [`expand`](TokenExpander::expand). When it returns a path, a custom
/// token is emitted for the tag and, at render time,
/// [`render`](TokenExpander::render) is called with the context the tag is
/// rendered in.
///
/// ```rust
/// use stache_core::Context;
/// use stache_core::ParsingOptions;
/// use stache_core::StacheResult;
/// use stache_core::TokenExpander;
/// use stache_core::Value;
///
/// #[derive(Debug)]
/// struct Upper;
///
/// impl TokenExpander for Upper {
/// 	fn expand(&self, tag: &str) -> Option<String> {
/// 		let inner = tag.strip_prefix("{{upper ")?.strip_suffix("}}")?;
/// 		Some(inner.trim().to_string())
/// 	}
///
/// 	fn render(
/// 		&self,
/// 		path: &str,
/// 		context: Context<'_, '_>,
/// 		_options: &ParsingOptions,
/// 		output: &mut String,
/// 	) -> StacheResult<()> {
/// 		output.push_str(&context.resolve(path).stringify().to_uppercase());
/// 		Ok(())
/// 	}
/// }
///
/// let options = ParsingOptions::new().with_token_expander(Upper);
/// let template = stache_core::parse("{{upper name}}!", options).unwrap();
/// let model: Value = [("name", "world")].into_iter().collect();
/// assert_eq!(template.render(&model).unwrap(), "WORLD!");
/// ```
pub trait TokenExpander: Debug + Send + Sync {
	fn precedence(&self) -> Precedence {
		Precedence::Medium
	}

	/// Return the path this expander should be rendered with, or `None` when
	/// the tag isn't one of its own.
	fn expand(&self, tag: &str) -> Option<String>;

	/// Write the output of the tag.
	fn render(
		&self,
		path: &str,
		context: Context<'_, '_>,
		options: &ParsingOptions,
		output: &mut String,
	) -> StacheResult<()>;
}
