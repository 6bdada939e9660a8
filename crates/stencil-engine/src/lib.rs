//! Single-pass template interpreter for import manifests.
//!
//! The engine scans a text document rune by rune, recognizes directives
//! delimited by `<` and `>`, and replaces each with the result of a named
//! function call or a literal string, optionally piped through modifiers.
//! Everything else is copied through unchanged, except escape sequences and
//! `${...}` environment-variable spans, which pass through verbatim.
//!
//! Directive shapes:
//!
//! - `<@name(param, param) | modifier>`: function call; bare parameters
//!   are resolved against the named-value store, nested directives
//!   (`<@name(<literal>)>`) produce literal parameters
//! - `<text | modifier | modifier>`: literal string with modifiers
//! - `<<` emits one literal `<`; `<>` produces nothing; `\x` copies `x`
//!   verbatim
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use stencil_engine::Parser;
//!
//! let mut out = Vec::new();
//! let mut parser = Parser::new(Cursor::new("name: <stencil| upper>"), &mut out);
//! parser.parse().unwrap();
//! drop(parser);
//! assert_eq!(String::from_utf8(out).unwrap(), "name: STENCIL");
//! ```

mod cancel;
mod error;
mod item;
mod meta;
mod options;
mod output;
mod parser;
mod runes;

pub use cancel::CancelToken;
pub use error::{ErrorKind, ParseError};
pub use meta::{MetaError, MetaMap};
pub use options::MultilineHandling;
pub use parser::Parser;
