//! Syntax module for depgrapher.
//!
//! A [`Syntax`] describes how one line of text encodes zero or more
//! dependency edges. Presets cover the common formats; custom syntaxes can be
//! written inline in a selector string and parsed with [`parse`].
//!
//! # Supported Presets
//!
//! - **Makefile** (`makefile`, `make`, `m`) - `a b: c d`
//! - **Dot** (`dot`, `d`) - `a -> b;` inside `digraph{ ... }`
//! - **MakeCall** (`makecall`, `c`) - `$(call DEPEND_ALL,...)` and
//!   `$(call ALL_SPECS,...)` macro calls
//!
//! # Example
//!
//! ```rust
//! use depgrapher::syntax::{self, Syntax};
//!
//! let syntaxes = syntax::parse("Makefile,Dot").unwrap();
//! assert_eq!(syntaxes, vec![Syntax::makefile(), Syntax::dot()]);
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse, ParseResult, SyntaxError};
pub use types::{Syntax, IGNORE_FIELD};
