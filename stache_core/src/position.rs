use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// A human readable position in a template. Both fields are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
	pub line: usize,
	/// Counted in characters from the start of the line.
	pub column: usize,
}

impl Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// Pre-computed table of line-start byte offsets. Built once per tokenize
/// call, then every error location is a binary search away.
#[derive(Debug, Clone)]
pub struct LineTable<'a> {
	source: &'a str,
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl<'a> LineTable<'a> {
	pub fn new(source: &'a str) -> Self {
		let mut line_starts = vec![0];
		for (i, byte) in source.bytes().enumerate() {
			if byte == b'\n' {
				line_starts.push(i + 1);
			}
		}

		Self {
			source,
			line_starts,
		}
	}

	/// Convert a byte offset into a [`Location`]. Offsets past the end are
	/// clamped to the end of the source.
	pub fn location(&self, offset: usize) -> Location {
		let offset = offset.min(self.source.len());
		let line_idx = self
			.line_starts
			.partition_point(|start| *start <= offset)
			.saturating_sub(1);
		let line_start = self.line_starts[line_idx];
		let column = self
			.source
			.get(line_start..offset)
			.map_or(offset - line_start, |prefix| prefix.chars().count());

		Location {
			line: line_idx + 1,
			column: column + 1,
		}
	}

	pub fn line_count(&self) -> usize {
		self.line_starts.len()
	}
}
