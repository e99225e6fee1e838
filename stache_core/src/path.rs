use logos::Logos;

/// Raw tokens of a tag path, used to check it against the path grammar.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PathToken {
	#[regex(r"\.+")]
	Dots,
	#[token("/")]
	Slash,
	#[regex(r"[A-Za-z0-9_]+")]
	Name,
}

/// Check a trimmed tag path against the path grammar.
///
/// A valid path only uses `[A-Za-z0-9_./]`, never contains three or more
/// consecutive dots, and every `..` is immediately followed by `/` (which
/// may not appear anywhere else). The empty path and `.` both refer to the
/// current context and are valid.
pub fn is_valid_path(path: &str) -> bool {
	let mut lexer = PathToken::lexer(path);
	let mut previous: Option<(PathToken, usize)> = None;

	while let Some(result) = lexer.next() {
		let Ok(token) = result else {
			return false;
		};
		let length = lexer.slice().len();

		match (token, previous) {
			(PathToken::Dots, _) if length > 2 => return false,
			(PathToken::Slash, Some((PathToken::Dots, 2))) => {}
			(PathToken::Slash, _) => return false,
			(_, Some((PathToken::Dots, 2))) => return false,
			_ => {}
		}

		previous = Some((token, length));
	}

	!matches!(previous, Some((PathToken::Dots, 2)))
}

/// A single resolution step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	/// `../` moves to the parent context.
	Parent,
	/// A key or sequence index looked up in the current value.
	Key(&'a str),
}

/// Split a path into resolution segments.
///
/// `../` (or `..\`) produces [`Segment::Parent`], every maximal run of
/// characters without a `.` produces a [`Segment::Key`], and stray dots are
/// separators. This means `.` and the empty path produce no segments at all.
pub fn segments(path: &str) -> Vec<Segment<'_>> {
	let mut segments = Vec::new();
	let mut rest = path;

	while !rest.is_empty() {
		if rest.starts_with("../") || rest.starts_with("..\\") {
			segments.push(Segment::Parent);
			rest = &rest[3..];
		} else if let Some(stripped) = rest.strip_prefix('.') {
			rest = stripped;
		} else {
			let end = rest.find('.').unwrap_or(rest.len());
			segments.push(Segment::Key(&rest[..end]));
			rest = &rest[end..];
		}
	}

	segments
}

/// The key segments of a path, ignoring parent navigation.
pub fn keys(path: &str) -> impl Iterator<Item = &str> {
	segments(path).into_iter().filter_map(|segment| {
		match segment {
			Segment::Key(key) => Some(key),
			Segment::Parent => None,
		}
	})
}
