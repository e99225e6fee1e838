use crate::Context;
use crate::ParsingOptions;
use crate::Precedence;
use crate::StacheResult;
use crate::TokenExpander;
use crate::Value;

pub fn model(json: serde_json::Value) -> Value {
	json.into()
}

/// Parse with default options and render, panicking on any error.
pub fn render(template: &str, model: &Value) -> String {
	render_with(template, model, ParsingOptions::default())
}

pub fn render_with(template: &str, model: &Value, options: ParsingOptions) -> String {
	crate::parse(template, options)
		.unwrap_or_else(|e| panic!("failed to parse `{template}`: {e}"))
		.render(model)
		.unwrap_or_else(|e| panic!("failed to render `{template}`: {e}"))
}

pub fn company_model() -> Value {
	model(serde_json::json!({
		"Company": {
			"ceo": {
				"last_name": "Smith",
				"products": [
					{ "name": "name 0", "version": "version 0" },
					{ "name": "name 1", "version": "version 1" },
					{ "name": "name 2", "version": "version 2" }
				]
			}
		}
	}))
}

/// `{{@key}}` writes the key of the current context, `{{@key ../}}` the key
/// of the context at a path.
#[derive(Debug)]
pub struct KeyExpander;

impl TokenExpander for KeyExpander {
	fn expand(&self, tag: &str) -> Option<String> {
		let inner = tag.strip_prefix("{{@key")?.strip_suffix("}}")?;
		Some(inner.trim().to_string())
	}

	fn render(
		&self,
		path: &str,
		context: Context<'_, '_>,
		_options: &ParsingOptions,
		output: &mut String,
	) -> StacheResult<()> {
		output.push_str(&context.resolve(path).key());
		Ok(())
	}
}

/// `{{#shout path}}` claims a tag that would otherwise open a section.
#[derive(Debug)]
pub struct ShoutExpander;

impl TokenExpander for ShoutExpander {
	fn precedence(&self) -> Precedence {
		Precedence::High
	}

	fn expand(&self, tag: &str) -> Option<String> {
		let inner = tag.strip_prefix("{{#shout ")?.strip_suffix("}}")?;
		Some(inner.trim().to_string())
	}

	fn render(
		&self,
		path: &str,
		context: Context<'_, '_>,
		_options: &ParsingOptions,
		output: &mut String,
	) -> StacheResult<()> {
		output.push_str(&context.resolve(path).stringify().to_uppercase());
		output.push('!');
		Ok(())
	}
}

/// Claims every tag starting with `{{>` and writes nothing.
#[derive(Debug)]
pub struct SilentExpander(pub Precedence);

impl TokenExpander for SilentExpander {
	fn precedence(&self) -> Precedence {
		self.0
	}

	fn expand(&self, tag: &str) -> Option<String> {
		tag.strip_prefix("{{>").map(|rest| rest.trim_end_matches('}').trim().to_string())
	}

	fn render(
		&self,
		_path: &str,
		_context: Context<'_, '_>,
		_options: &ParsingOptions,
		_output: &mut String,
	) -> StacheResult<()> {
		Ok(())
	}
}
