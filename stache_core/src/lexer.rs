use std::ops::Range;

use crate::IndexedParseError;
use crate::LineTable;
use crate::ParseErrorKind;
use crate::ParsingOptions;
use crate::Precedence;
use crate::path::is_valid_path;
use crate::tokens::Token;

/// The output of [`tokenize`]: every token plus every error, in source
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizeResult {
	pub tokens: Vec<Token>,
	pub errors: Vec<IndexedParseError>,
}

impl TokenizeResult {
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Split a template into tokens, collecting errors instead of stopping at
/// the first one.
pub fn tokenize(template: &str, options: &ParsingOptions) -> TokenizeResult {
	let mut walker = TagWalker::new(template, options);
	walker.process();
	let result = walker.finish();

	tracing::debug!(
		source_name = %options.source_name,
		tokens = result.tokens.len(),
		errors = result.errors.len(),
		"tokenized template"
	);

	result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
	/// Opened by `{{#path}}` or `{{^path}}`.
	Section,
	/// Opened by `{{#each path}}`.
	Each,
}

/// An open block waiting for its closing tag.
#[derive(Debug, Clone)]
struct ScopeFrame {
	kind: ScopeKind,
	/// The path of the opening tag. Used to match closing tags and to name the
	/// block when it is never closed.
	path: String,
	/// Byte offset of the opening tag.
	offset: usize,
}

/// Walks the tags of a template, tracking the open block stack.
struct TagWalker<'a> {
	source: &'a str,
	options: &'a ParsingOptions,
	lines: LineTable<'a>,
	/// Byte offset just after the last consumed tag.
	cursor: usize,
	scopes: Vec<ScopeFrame>,
	tokens: Vec<Token>,
	errors: Vec<IndexedParseError>,
}

impl<'a> TagWalker<'a> {
	fn new(source: &'a str, options: &'a ParsingOptions) -> Self {
		Self {
			source,
			options,
			lines: LineTable::new(source),
			cursor: 0,
			scopes: vec![],
			tokens: vec![],
			errors: vec![],
		}
	}

	fn process(&mut self) {
		let source = self.source;

		for span in find_tags(source) {
			if span.start > self.cursor {
				let content = &source[self.cursor..span.start];
				self.tokens.push(Token::Content(content.to_string()));
			}

			self.cursor = span.end;
			self.process_tag(&source[span.clone()], span.start);
		}

		if self.cursor < source.len() {
			let content = &source[self.cursor..];
			self.tokens.push(Token::Content(content.to_string()));
		}
	}

	/// Report every block that is still open and return the result.
	fn finish(mut self) -> TokenizeResult {
		let unclosed = std::mem::take(&mut self.scopes);

		for frame in unclosed.into_iter().rev() {
			self.error(frame.offset, ParseErrorKind::UnclosedBlock(frame.path));
		}

		TokenizeResult {
			tokens: self.tokens,
			errors: self.errors,
		}
	}

	fn error(&mut self, offset: usize, kind: ParseErrorKind) {
		let location = self.lines.location(offset);
		self.errors.push(IndexedParseError::new(
			self.options.source_name.clone(),
			location,
			kind,
		));
	}

	/// Record an error when `path` breaks the path grammar. The token is
	/// still emitted so scanning carries on.
	fn validate(&mut self, path: &str, offset: usize) {
		if !is_valid_path(path) {
			self.error(offset, ParseErrorKind::InvalidPath(path.to_string()));
		}
	}

	fn top_section_is(&self, path: &str) -> bool {
		self.scopes
			.last()
			.is_some_and(|frame| frame.kind == ScopeKind::Section && frame.path == path)
	}

	fn expand(&mut self, tag: &str, precedence: Precedence) -> bool {
		let expanded = self
			.options
			.expanders_with(precedence)
			.find_map(|expander| expander.expand(tag).map(|path| (path, expander.clone())));

		let Some((path, expander)) = expanded else {
			return false;
		};

		tracing::trace!(tag, path, "custom tag");
		self.tokens.push(Token::Custom { path, expander });
		true
	}

	/// Classify one `{{...}}` or `{{{...}}}` span.
	fn process_tag(&mut self, tag: &str, offset: usize) {
		tracing::trace!(tag, offset, "tag");

		if self.expand(tag, Precedence::High) {
			return;
		}

		let interior = &tag[2..tag.len() - 2];

		if let Some(path) = each_open_path(interior) {
			self.open_each(path.trim(), offset);
		} else if interior
			.strip_prefix('/')
			.is_some_and(|rest| rest.trim() == "each")
		{
			self.close_each(offset);
		} else if let Some(path) = interior.strip_prefix('#') {
			self.open_section(path.trim(), offset, Token::ElementOpen);
		} else if let Some(path) = interior.strip_prefix('^') {
			self.open_section(path.trim(), offset, Token::InvertedOpen);
		} else if let Some(path) = interior.strip_prefix('/') {
			self.close_section(path.trim(), offset);
		} else if let Some(inner) = interior
			.strip_prefix('{')
			.and_then(|inner| inner.strip_suffix('}'))
		{
			let inner = inner.trim();
			let path = inner.strip_prefix('&').unwrap_or(inner).trim();
			self.validate(path, offset);
			self.tokens.push(Token::UnescapedValue(path.to_string()));
		} else if let Some(path) = interior.strip_prefix('&') {
			let path = path.trim();
			self.validate(path, offset);
			self.tokens.push(Token::UnescapedValue(path.to_string()));
		} else if interior.starts_with('!') {
			// Comments produce no token.
		} else if !(self.expand(tag, Precedence::Medium) || self.expand(tag, Precedence::Low)) {
			let path = interior.trim();
			self.validate(path, offset);
			self.tokens.push(Token::EscapedValue(path.to_string()));
		}
	}

	fn open_each(&mut self, path: &str, offset: usize) {
		self.scopes.push(ScopeFrame {
			kind: ScopeKind::Each,
			path: path.to_string(),
			offset,
		});

		if path.is_empty() {
			self.error(offset, ParseErrorKind::EachWithoutPath);
			return;
		}

		self.validate(path, offset);
		self.tokens.push(Token::CollectionOpen(path.to_string()));
	}

	fn close_each(&mut self, offset: usize) {
		let is_each = self
			.scopes
			.last()
			.is_some_and(|frame| frame.kind == ScopeKind::Each);

		match self.scopes.pop() {
			Some(frame) if is_each => {
				tracing::trace!(path = frame.path.as_str(), opened_at = frame.offset, "closed each block");
				self.tokens.push(Token::CollectionClose(frame.path));
			}
			popped => {
				self.scopes.extend(popped);
				self.error(offset, ParseErrorKind::EachCloseWithoutOpen);
			}
		}
	}

	/// Open a `{{#path}}` or `{{^path}}` block. Repeating the tag of the
	/// innermost open section closes the previous body and starts a new one
	/// without touching the stack, so `{{#a}}x{{^a}}y{{/a}}` reads as an
	/// if/else.
	fn open_section(&mut self, path: &str, offset: usize, open: fn(String) -> Token) {
		self.validate(path, offset);

		if self.top_section_is(path) {
			self.tokens.push(Token::ElementClose(path.to_string()));
		} else {
			self.scopes.push(ScopeFrame {
				kind: ScopeKind::Section,
				path: path.to_string(),
				offset,
			});
		}

		self.tokens.push(open(path.to_string()));
	}

	fn close_section(&mut self, path: &str, offset: usize) {
		if self.top_section_is(path) {
			self.scopes.pop();
			self.validate(path, offset);
			self.tokens.push(Token::ElementClose(path.to_string()));
			return;
		}

		let expected = self.scopes.last().map(|frame| frame.path.clone());
		self.error(
			offset,
			ParseErrorKind::MismatchedClose {
				found: path.to_string(),
				expected,
			},
		);
	}
}

/// The path of a `{{#each path}}` tag, given the text between the braces.
/// `each` must be followed by whitespace or the end of the tag, so
/// `{{#eachs}}` is an ordinary section.
fn each_open_path(interior: &str) -> Option<&str> {
	let rest = interior.strip_prefix("#each")?;

	if rest.is_empty() || rest.starts_with(char::is_whitespace) {
		Some(rest)
	} else {
		None
	}
}

/// Find the byte ranges of all tags in `source`.
///
/// At each `{{` the scanner first tries `{{` + non-brace characters + `}}`,
/// then `{{{` + non-brace characters + `}}}`. Anything else is content, so
/// malformed brace runs like `{{{{name}}` pass through as text around the
/// innermost valid tag.
pub fn find_tags(source: &str) -> Vec<Range<usize>> {
	let bytes = source.as_bytes();
	let mut spans = vec![];
	let mut position = 0;

	while let Some(found) = memstr(&bytes[position..], b"{{") {
		let start = position + found;

		if let Some(end) = match_tag(bytes, start, 2).or_else(|| match_tag(bytes, start, 3)) {
			spans.push(start..end);
			position = end;
		} else {
			position = start + 1;
		}
	}

	spans
}

/// Try to match `depth` opening braces, one or more non-brace bytes and
/// `depth` closing braces at `start`. Returns the end of the match.
fn match_tag(bytes: &[u8], start: usize, depth: usize) -> Option<usize> {
	let open = start + depth;
	if bytes.len() < open || bytes[start..open].iter().any(|byte| *byte != b'{') {
		return None;
	}

	let interior = bytes[open..]
		.iter()
		.position(|byte| *byte == b'{' || *byte == b'}')?;
	if interior == 0 {
		return None;
	}

	let close = open + interior;
	let end = close + depth;
	if bytes.len() < end || bytes[close..end].iter().any(|byte| *byte != b'}') {
		return None;
	}

	Some(end)
}

pub fn memstr(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}
