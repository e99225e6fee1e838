use std::cell::RefCell;

use crate::Value;
use crate::path::Segment;
use crate::path::segments;

/// Identifies a context record inside a [`ContextArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

#[derive(Debug)]
struct Frame<'m> {
	value: Option<&'m Value>,
	key: String,
	parent: Option<ContextId>,
}

/// Storage for every context created while rendering one model.
///
/// Each path resolution and each collection element adds a record that
/// points back at the record it was resolved from. Records are never
/// removed or changed, so a [`ContextId`] stays valid for the whole render.
#[derive(Debug)]
pub struct ContextArena<'m> {
	frames: RefCell<Vec<Frame<'m>>>,
}

impl<'m> ContextArena<'m> {
	/// Create an arena whose root context wraps `model`.
	pub fn new(model: &'m Value) -> Self {
		let arena = Self {
			frames: RefCell::new(Vec::new()),
		};
		arena.push(Some(model), String::new(), None);
		arena
	}

	pub fn root(&self) -> Context<'_, 'm> {
		self.context(ContextId(0))
	}

	pub fn context(&self, id: ContextId) -> Context<'_, 'm> {
		Context { arena: self, id }
	}

	/// The number of contexts created so far.
	pub fn len(&self) -> usize {
		self.frames.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.borrow().is_empty()
	}

	/// Add a context. `null` values are stored as absent.
	pub(crate) fn push(
		&self,
		value: Option<&'m Value>,
		key: String,
		parent: Option<ContextId>,
	) -> ContextId {
		let mut frames = self.frames.borrow_mut();
		let id = ContextId(frames.len());
		frames.push(Frame {
			value: value.filter(|value| !value.is_null()),
			key,
			parent,
		});
		id
	}

	fn value(&self, id: ContextId) -> Option<&'m Value> {
		self.frames.borrow()[id.0].value
	}

	fn parent(&self, id: ContextId) -> Option<ContextId> {
		self.frames.borrow()[id.0].parent
	}

	fn key(&self, id: ContextId) -> String {
		self.frames.borrow()[id.0].key.clone()
	}
}

/// A view of the model at some path, linked to the context it was resolved
/// from.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a, 'm> {
	arena: &'a ContextArena<'m>,
	id: ContextId,
}

impl<'a, 'm> Context<'a, 'm> {
	pub fn id(&self) -> ContextId {
		self.id
	}

	/// The model value, or `None` when the path didn't lead anywhere.
	pub fn value(&self) -> Option<&'m Value> {
		self.arena.value(self.id)
	}

	/// The path segment this context was reached by. Collection elements use
	/// `[index]` and the root uses the empty string.
	pub fn key(&self) -> String {
		self.arena.key(self.id)
	}

	pub fn parent(&self) -> Option<Context<'a, 'm>> {
		self.arena
			.parent(self.id)
			.map(|id| self.arena.context(id))
	}

	/// Resolve a path relative to this context.
	///
	/// Keys that don't exist produce a context with no value rather than an
	/// error, and `../` above the root stays at the root.
	pub fn resolve(&self, path: &str) -> Context<'a, 'm> {
		let mut current = self.id;

		for segment in segments(path) {
			match segment {
				Segment::Parent => {
					if let Some(parent) = self.arena.parent(current) {
						current = parent;
					}
				}
				Segment::Key(key) => {
					let value = self.arena.value(current).and_then(|value| value.get(key));
					current = self.arena.push(value, key.to_string(), Some(current));
				}
			}
		}

		self.arena.context(current)
	}

	/// Create a child context for one element of a collection.
	pub(crate) fn element(&self, index: usize, value: &'m Value) -> Context<'a, 'm> {
		let id = self
			.arena
			.push(Some(value), format!("[{index}]"), Some(self.id));
		self.arena.context(id)
	}

	/// Whether the value is present and truthy.
	pub fn exists(&self) -> bool {
		self.value().is_some_and(Value::is_truthy)
	}

	/// The text written for this context by a value tag, empty when absent.
	pub fn stringify(&self) -> String {
		self.value()
			.map(Value::to_display_string)
			.unwrap_or_default()
	}
}
