use std::fmt::Display;

use float_cmp::approx_eq;
use indexmap::IndexMap;
use serde::Serialize;

use crate::StacheResult;

/// A model value that templates are rendered against.
///
/// Host data enters the engine through this type: build it directly, convert
/// from a [`serde_json::Value`], or use [`Value::from_serialize`] for any
/// `Serialize` type. Maps keep their insertion order so that `{{#each}}`
/// blocks iterate them predictably.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub enum Value {
	/// An absent value. Renders as nothing and is falsy.
	#[default]
	Null,
	Bool(bool),
	Int(i64),
	/// Unsigned integers that don't fit in an `i64`.
	UInt(u64),
	Float(f64),
	String(String),
	Sequence(Vec<Value>),
	Map(IndexMap<String, Value>),
}

impl Eq for Value {}
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(value), Value::Bool(other_value)) => value == other_value,
			(Value::Int(value), Value::Int(other_value)) => value == other_value,
			(Value::UInt(value), Value::UInt(other_value)) => value == other_value,
			(Value::Float(value), Value::Float(other_value)) => {
				approx_eq!(f64, *value, *other_value, ulps = 2)
			}
			(Value::String(value), Value::String(other_value)) => value == other_value,
			(Value::Sequence(items), Value::Sequence(other_items)) => items == other_items,
			(Value::Map(entries), Value::Map(other_entries)) => entries == other_entries,
			_ => false,
		}
	}
}

impl Value {
	/// Convert any serializable value into a model value.
	pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> StacheResult<Self> {
		Ok(serde_json::to_value(value)?.into())
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Look up a single path segment. Maps are indexed by key, sequences by
	/// decimal position. Everything else has no children.
	pub fn get(&self, key: &str) -> Option<&Value> {
		match self {
			Value::Map(entries) => entries.get(key),
			Value::Sequence(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
			_ => None,
		}
	}

	/// Whether the value passes the gate of conditional and collection
	/// blocks. `null`, `false`, zero, the empty string and empty containers
	/// are falsy.
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Null => false,
			Value::Bool(value) => *value,
			Value::Int(value) => *value != 0,
			Value::UInt(value) => *value != 0,
			Value::Float(value) => *value != 0.0,
			Value::String(value) => !value.is_empty(),
			Value::Sequence(items) => !items.is_empty(),
			Value::Map(entries) => !entries.is_empty(),
		}
	}

	/// The text written for this value by a `{{value}}` tag. Containers have
	/// no textual form and produce an empty string.
	pub fn to_display_string(&self) -> String {
		match self {
			Value::Null | Value::Sequence(_) | Value::Map(_) => String::new(),
			Value::Bool(value) => value.to_string(),
			Value::Int(value) => value.to_string(),
			Value::UInt(value) => value.to_string(),
			Value::Float(value) => format_float(*value),
			Value::String(value) => value.clone(),
		}
	}

	/// The values iterated by a `{{#each}}` block, or `None` for scalars.
	pub fn elements(&self) -> Option<Box<dyn Iterator<Item = &Value> + '_>> {
		match self {
			Value::Sequence(items) => Some(Box::new(items.iter())),
			Value::Map(entries) => Some(Box::new(entries.values())),
			_ => None,
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "boolean",
			Value::Int(_) | Value::UInt(_) => "integer",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::Sequence(_) => "sequence",
			Value::Map(_) => "map",
		}
	}
}

/// Whole floats are written without a fractional part (`3.0` → `3`).
/// Negative zero prints as `0`.
fn format_float(value: f64) -> String {
	if value == 0.0 {
		"0".to_string()
	} else if value.is_finite() && value.fract() == 0.0 {
		format!("{value:.0}")
	} else {
		value.to_string()
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_display_string())
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(value) => Value::Bool(value),
			serde_json::Value::Number(number) => {
				if let Some(value) = number.as_i64() {
					Value::Int(value)
				} else if let Some(value) = number.as_u64() {
					Value::UInt(value)
				} else {
					Value::Float(number.as_f64().unwrap_or(f64::NAN))
				}
			}
			serde_json::Value::String(value) => Value::String(value),
			serde_json::Value::Array(items) => {
				Value::Sequence(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(entries) => Value::Map(
				entries
					.into_iter()
					.map(|(key, value)| (key, Value::from(value)))
					.collect(),
			),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		i64::try_from(value).map_or(Value::UInt(value), Value::Int)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Value::Sequence(items.into_iter().map(Into::into).collect())
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Value::Map(
			iter.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		)
	}
}
