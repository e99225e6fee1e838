//! `stache_core` is the engine behind `stache`, a mustache-style template
//! language. It tokenizes templates, builds an
//! immutable node tree and renders that tree against a hierarchical
//! [`Value`] model.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template text
//!   → Tokenizer (finds tags, validates paths, balances blocks, collects errors)
//!   → Tree builder (turns the token stream into nested Nodes, infers the model shape)
//!   → Renderer (walks the nodes with a context arena over the model)
//! ```
//!
//! ## Syntax
//!
//! | Tag | Meaning |
//! |---|---|
//! | `{{path}}` | HTML-escaped value |
//! | `{{{path}}}` / `{{&path}}` | unescaped value |
//! | `{{#path}}...{{/path}}` | body if the value is truthy |
//! | `{{^path}}...{{/path}}` | body if the value is falsy or missing |
//! | `{{#each path}}...{{/each}}` | body once per element |
//! | `{{!comment}}` | ignored |
//!
//! Paths are dot separated (`company.ceo.name`) and `../` steps up to the
//! parent context, so inside `{{#each products}}` the template can still
//! reach `{{../../company_name}}`.
//!
//! ## Quick Start
//!
//! ```rust
//! use stache_core::ParsingOptions;
//! use stache_core::Value;
//!
//! let template = stache_core::parse(
//! 	"{{#each items}}<li>{{.}}</li>{{/each}}",
//! 	ParsingOptions::default(),
//! )
//! .unwrap();
//! let model: Value = [("items", Value::from(vec!["a", "b"]))]
//! 	.into_iter()
//! 	.collect();
//!
//! assert_eq!(template.render(&model).unwrap(), "<li>a</li><li>b</li>");
//! ```

pub use context::*;
pub use error::*;
pub use inference::*;
pub use lexer::TokenizeResult;
pub use lexer::tokenize;
pub use options::*;
pub use parser::*;
pub use position::*;
pub use render::*;
pub use tokens::Token;
pub use value::*;

mod context;
#[allow(unused_assignments)]
mod error;
mod inference;
pub(crate) mod lexer;
mod options;
mod parser;
pub mod path;
mod position;
mod render;
pub(crate) mod tokens;
mod value;

#[cfg(test)]
mod __fixtures;
