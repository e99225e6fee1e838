use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

pub use config::*;
pub use error::*;

mod config;
#[allow(unused_assignments)]
mod error;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render, check and inspect mustache-style templates.",
	long_about = "stache renders logic-less templates against JSON, TOML or YAML \
	              models.\n\nTemplates use `{{value}}` tags for escaped output, `{{{value}}}` \
	              for raw output, `{{#path}}` and `{{^path}}` blocks for conditionals and \
	              `{{#each path}}` blocks for collections.\n\nQuick start:\n  stache render \
	              page.html --data model.json\n  stache check templates/*.html\n  stache infer \
	              page.html --format json"
)]
pub struct StacheCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to a `stache.toml` config file. When omitted, `stache.toml`,
	/// `.stache.toml` and `.config/stache.toml` are searched in the current
	/// directory.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose (debug) logging on stderr.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a template against a data file.
	///
	/// The model is read from `--data` (or the `data` entry of the config
	/// file). Without any data the template renders against an empty model.
	Render {
		/// The template file to render.
		template: PathBuf,

		/// The data file providing the model.
		#[arg(long, short)]
		data: Option<PathBuf>,

		/// The format of the data file. Detected from the file extension when
		/// omitted.
		#[arg(long, short, value_enum)]
		format: Option<DataFormat>,

		/// Write the output to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// The name used for the template in error messages. Defaults to the
		/// template path.
		#[arg(long)]
		source_name: Option<String>,

		/// Write every value unescaped, even `{{value}}` tags.
		#[arg(long, default_value_t = false)]
		disable_content_safety: bool,
	},
	/// Check templates for syntax errors.
	///
	/// Every error in every template is printed, not just the first one.
	/// Exits with status 1 when any template has errors.
	Check {
		/// The template files to check.
		#[arg(required = true)]
		templates: Vec<PathBuf>,
	},
	/// Print the shape of the model a template expects.
	Infer {
		/// The template file to inspect.
		template: PathBuf,

		/// Output format for the inferred model.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the token stream of a template.
	Tokens {
		/// The template file to tokenize.
		template: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable indented outline.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
