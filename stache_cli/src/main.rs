use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use stache_cli::CliResult;
use stache_cli::Commands;
use stache_cli::DataFormat;
use stache_cli::OutputFormat;
use stache_cli::StacheCli;
use stache_cli::StacheConfig;
use stache_cli::read_data_file;
use stache_cli::read_file;
use stache_core::ParsingOptions;
use stache_core::StacheError;
use stache_core::Value;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = StacheCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_logging(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render {
			template,
			data,
			format,
			output,
			source_name,
			disable_content_safety,
		}) => {
			run_render(
				&args,
				&RenderArgs {
					template,
					data: data.as_deref(),
					format: *format,
					output: output.as_deref(),
					source_name: source_name.as_deref(),
					disable_content_safety: *disable_content_safety,
				},
			)
		}
		Some(Commands::Check { templates }) => run_check(templates),
		Some(Commands::Infer { template, format }) => run_infer(&args, template, *format),
		Some(Commands::Tokens { template }) => run_tokens(template),
		None => {
			eprintln!("No subcommand specified. Run `stache --help` for usage.");
			process::exit(2);
		}
	};

	if let Err(e) = result {
		let report = miette::Report::new(e);
		eprintln!("{report:?}");
		process::exit(2);
	}
}

/// Log to stderr. `--verbose` forces `debug`, otherwise `RUST_LOG` is used
/// with a `warn` fallback.
fn init_logging(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(use_color)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

/// The config plus the directory its relative paths are resolved against.
fn load_config(args: &StacheCli) -> CliResult<Option<(StacheConfig, PathBuf)>> {
	if let Some(path) = &args.config {
		let config = StacheConfig::load_from(path)?;
		let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
		return Ok(Some((config, base)));
	}

	let root = std::env::current_dir()?;
	Ok(StacheConfig::load(&root)?.map(|config| (config, root)))
}

struct RenderArgs<'a> {
	template: &'a Path,
	data: Option<&'a Path>,
	format: Option<DataFormat>,
	output: Option<&'a Path>,
	source_name: Option<&'a str>,
	disable_content_safety: bool,
}

fn run_render(args: &StacheCli, render: &RenderArgs<'_>) -> CliResult<()> {
	let loaded = load_config(args)?;
	let config = loaded.as_ref().map(|(config, _)| config);

	let source_name = render
		.source_name
		.map(ToString::to_string)
		.or_else(|| config.and_then(|config| config.source_name.clone()))
		.unwrap_or_else(|| render.template.display().to_string());
	let disable_content_safety = render.disable_content_safety
		|| config.is_some_and(|config| config.disable_content_safety);
	let options = ParsingOptions::new()
		.with_source_name(source_name)
		.with_content_safety_disabled(disable_content_safety);

	let model = match (render.data, &loaded) {
		(Some(path), _) => read_data_file(path, render.format)?,
		(None, Some((config, base))) => config.load_data(base)?.unwrap_or_default(),
		(None, None) => Value::Null,
	};

	let source = read_file(render.template)?;
	let template = stache_core::parse(&source, options)?;
	let rendered = template.render(&model)?;

	match render.output {
		Some(path) => {
			std::fs::write(path, &rendered)?;
			tracing::info!(path = %path.display(), bytes = rendered.len(), "wrote output");
		}
		None => print!("{rendered}"),
	}

	Ok(())
}

fn run_check(templates: &[PathBuf]) -> CliResult<()> {
	let mut error_count = 0;
	let mut failed_templates = 0;

	for path in templates {
		let source = read_file(path)?;
		let options = ParsingOptions::new().with_source_name(path.display().to_string());
		let result = stache_core::tokenize(&source, &options);

		if result.is_ok() {
			println!("{} {}", colored!("ok:", green), path.display());
			continue;
		}

		failed_templates += 1;
		error_count += result.errors.len();
		for error in &result.errors {
			println!("{} {error}", colored!("error:", red));
		}
	}

	println!();

	if error_count > 0 {
		println!(
			"{}",
			colored!(
				format!(
					"Check failed: {error_count} error(s) in {failed_templates} of {} template(s).",
					templates.len()
				),
				bold
			)
		);
		process::exit(1);
	}

	println!("Check passed: {} template(s) are valid.", templates.len());
	Ok(())
}

fn run_infer(args: &StacheCli, template: &Path, format: OutputFormat) -> CliResult<()> {
	let loaded = load_config(args)?;
	let source_name = loaded
		.and_then(|(config, _)| config.source_name)
		.unwrap_or_else(|| template.display().to_string());

	let source = read_file(template)?;
	let info = stache_core::parse_with_model_inference(
		&source,
		ParsingOptions::new().with_source_name(source_name),
	)?;
	let inferred = info.inferred_model;

	match format {
		OutputFormat::Json => {
			let json = serde_json::to_string_pretty(&inferred).map_err(StacheError::from)?;
			println!("{json}");
		}
		OutputFormat::Text if inferred.is_empty() => {
			println!("The template does not use any model values.");
		}
		OutputFormat::Text => print!("{inferred}"),
	}

	Ok(())
}

fn run_tokens(template: &Path) -> CliResult<()> {
	let source = read_file(template)?;
	let options = ParsingOptions::new().with_source_name(template.display().to_string());
	let result = stache_core::tokenize(&source, &options);

	for (index, token) in result.tokens.iter().enumerate() {
		println!("{index:>4}  {token:?}");
	}

	if result.is_ok() {
		return Ok(());
	}

	for error in &result.errors {
		eprintln!("{} {error}", colored!("error:", red));
	}
	process::exit(1);
}
