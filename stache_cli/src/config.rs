use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;
use stache_core::Value;

use crate::CliError;
use crate::CliResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["stache.toml", ".stache.toml", ".config/stache.toml"];

/// The format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
	Json,
	Toml,
	#[value(alias = "yml")]
	Yaml,
	/// The whole file becomes a single string model.
	#[value(alias = "txt")]
	Text,
}

impl DataFormat {
	pub fn from_name(name: &str) -> CliResult<Self> {
		match name.to_ascii_lowercase().as_str() {
			"json" => Ok(Self::Json),
			"toml" => Ok(Self::Toml),
			"yaml" | "yml" => Ok(Self::Yaml),
			"text" | "txt" | "string" | "raw" => Ok(Self::Text),
			other => Err(CliError::UnsupportedDataFormat(other.to_string())),
		}
	}

	/// Detect the format from a file extension.
	pub fn from_path(path: &Path) -> CliResult<Self> {
		let extension = path
			.extension()
			.and_then(OsStr::to_str)
			.unwrap_or_default();

		Self::from_name(extension)
	}
}

/// The `data` entry of a config file.
///
/// A plain path picks the format from the file extension:
///
/// ```toml
/// data = "model.json"
/// ```
///
/// A table can name the format explicitly:
///
/// ```toml
/// data = { path = "model", format = "yaml" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DataSource {
	Path(PathBuf),
	Typed(TypedDataSource),
}

impl DataSource {
	pub fn path(&self) -> &Path {
		match self {
			Self::Path(path) => path,
			Self::Typed(typed) => &typed.path,
		}
	}

	/// The explicit format override, if configured.
	pub fn format(&self) -> Option<&str> {
		match self {
			Self::Path(_) => None,
			Self::Typed(typed) => Some(typed.format.as_str()),
		}
	}
}

#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedDataSource {
	pub path: PathBuf,
	pub format: String,
}

/// Configuration loaded from a `stache.toml` file.
///
/// ```toml
/// disable_content_safety = false
/// source_name = "greeting"
/// data = "model.json"
/// ```
///
/// Command-line flags take precedence over every value here.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StacheConfig {
	/// Write every value unescaped.
	#[serde(default)]
	pub disable_content_safety: bool,
	/// The name used for templates in error messages.
	#[serde(default)]
	pub source_name: Option<String>,
	/// The model used when `render` is not given `--data`.
	#[serde(default)]
	pub data: Option<DataSource>,
}

impl StacheConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> CliResult<Option<StacheConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from(&config_path).map(Some)
	}

	/// Load the config at an explicit path.
	pub fn load_from(path: &Path) -> CliResult<StacheConfig> {
		let content = read_file(path)?;
		let config: StacheConfig = toml::from_str(&content).map_err(|e| {
			CliError::ConfigParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		tracing::debug!(path = %path.display(), "loaded config");
		Ok(config)
	}

	/// Read the configured data file, resolving its path against `root`.
	pub fn load_data(&self, root: &Path) -> CliResult<Option<Value>> {
		let Some(source) = &self.data else {
			return Ok(None);
		};

		let format = source.format().map(DataFormat::from_name).transpose()?;
		read_data_file(&root.join(source.path()), format).map(Some)
	}
}

pub fn read_file(path: &Path) -> CliResult<String> {
	std::fs::read_to_string(path).map_err(|source| {
		CliError::ReadFile {
			path: path.display().to_string(),
			source,
		}
	})
}

/// Read a data file into a model. The format is detected from the extension
/// unless one is given.
pub fn read_data_file(path: &Path, format: Option<DataFormat>) -> CliResult<Value> {
	let format = match format {
		Some(format) => format,
		None => DataFormat::from_path(path)?,
	};
	let content = read_file(path)?;

	tracing::debug!(path = %path.display(), ?format, "reading data file");
	parse_data_file(&content, format, &path.display().to_string())
}

/// Parse a data file's content into a model based on its format.
pub fn parse_data_file(content: &str, format: DataFormat, path_display: &str) -> CliResult<Value> {
	let data_error = |reason: String| {
		CliError::DataFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		DataFormat::Text => Ok(Value::String(content.to_string())),
		DataFormat::Json => {
			serde_json::from_str::<serde_json::Value>(content)
				.map(Value::from)
				.map_err(|e| data_error(e.to_string()))
		}
		DataFormat::Toml => {
			toml::from_str::<toml::Value>(content)
				.map(toml_to_value)
				.map_err(|e| data_error(e.to_string()))
		}
		DataFormat::Yaml => {
			serde_yaml_ng::from_str::<serde_json::Value>(content)
				.map(Value::from)
				.map_err(|e| data_error(e.to_string()))
		}
	}
}

/// Convert a `toml::Value` into a model value. Datetimes become strings.
fn toml_to_value(value: toml::Value) -> Value {
	match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::Int(i),
		toml::Value::Float(f) => Value::Float(f),
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_value).collect()),
		toml::Value::Table(table) => {
			table
				.into_iter()
				.map(|(key, value)| (key, toml_to_value(value)))
				.collect()
		}
	}
}
