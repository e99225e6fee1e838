use miette::Diagnostic;
use stache_core::StacheError;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CliError {
	#[error(transparent)]
	#[diagnostic(code(stache::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {source}")]
	#[diagnostic(code(stache::read_file), help("check that the file exists and is readable"))]
	ReadFile {
		path: String,
		source: std::io::Error,
	},

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(stache::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data format: `{0}`")]
	#[diagnostic(
		code(stache::unsupported_format),
		help("supported formats: json, toml, yaml, yml, text")
	)]
	UnsupportedDataFormat(String),

	#[error("failed to parse config `{path}`: {reason}")]
	#[diagnostic(
		code(stache::config_parse),
		help("check that the config is valid TOML with `data`, `source_name` and `disable_content_safety` keys")
	)]
	ConfigParse { path: String, reason: String },

	#[error(transparent)]
	#[diagnostic(transparent)]
	Template(#[from] StacheError),
}

impl From<stache_core::IndexedParseError> for CliError {
	fn from(error: stache_core::IndexedParseError) -> Self {
		Self::Template(error.into())
	}
}

pub type CliResult<T> = Result<T, CliError>;
