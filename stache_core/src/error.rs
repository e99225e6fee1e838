use miette::Diagnostic;
use thiserror::Error;

use crate::Location;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StacheError {
	#[error(transparent)]
	#[diagnostic(transparent)]
	Parse(#[from] IndexedParseError),

	#[error(
		"'{path}' is used like an array by the template, but is a scalar value or object in your \
		 model."
	)]
	#[diagnostic(
		code(stache::render::scalar_collection),
		help("`{{{{#each {path}}}}}` needs a sequence or a map, use `{{{{#{path}}}}}` for a single value")
	)]
	ScalarUsedAsCollection { path: String },

	#[error("failed to convert the model into template values: {0}")]
	#[diagnostic(code(stache::model))]
	Model(String),
}

impl From<serde_json::Error> for StacheError {
	fn from(error: serde_json::Error) -> Self {
		Self::Model(error.to_string())
	}
}

/// An error found while tokenizing a template, pinned to the tag that caused
/// it.
///
/// The display form is `"<source_name> Line: <line> Column: <column>
/// <message>"`. Both `line` and `column` are 1-based and the column counts
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
#[error("{source_name} Line: {line} Column: {column} {kind}")]
#[diagnostic(forward(kind))]
pub struct IndexedParseError {
	/// The label configured through
	/// [`ParsingOptions::source_name`](crate::ParsingOptions::source_name).
	pub source_name: String,
	pub line: usize,
	pub column: usize,
	pub kind: ParseErrorKind,
}

impl IndexedParseError {
	pub fn new(source_name: impl Into<String>, location: Location, kind: ParseErrorKind) -> Self {
		Self {
			source_name: source_name.into(),
			line: location.line,
			column: location.column,
			kind,
		}
	}

	pub fn location(&self) -> Location {
		Location {
			line: self.line,
			column: self.column,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
	#[error(
		"The path '{0}' is not valid. Please see documentation for examples of valid paths."
	)]
	#[diagnostic(
		code(stache::parse::invalid_path),
		help("paths are made of `[A-Za-z0-9_]` names joined by `.`, optionally prefixed by `../`")
	)]
	InvalidPath(String),

	#[error(
		"The 'each' block being opened requires a model path to be specified in the form \
		 '{{{{#each <name>}}}}'."
	)]
	#[diagnostic(code(stache::parse::each_without_path))]
	EachWithoutPath,

	#[error(
		"An 'each' block is being closed, but no corresponding opening element ('{{{{#each \
		 <name>}}}}') was detected."
	)]
	#[diagnostic(code(stache::parse::each_close_without_open))]
	EachCloseWithoutOpen,

	#[error("It appears that open and closing elements are mismatched.")]
	#[diagnostic(
		code(stache::parse::mismatched_close),
		help("blocks must be closed in the reverse order they were opened")
	)]
	MismatchedClose {
		/// The path named by the closing tag.
		found: String,
		/// The path of the innermost open block, if any.
		expected: Option<String>,
	},

	#[error(
		"A scope block to the following path was opened but not closed: '{0}', please close it \
		 using the appropriate syntax."
	)]
	#[diagnostic(
		code(stache::parse::unclosed_block),
		help("add `{{{{/{0}}}}}` (or `{{{{/each}}}}` for an each block) to close it")
	)]
	UnclosedBlock(String),
}

pub type StacheResult<T> = Result<T, StacheError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
