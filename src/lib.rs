//! # jsclean - JavaScript source cleaner
//!
//! jsclean reformats JavaScript into one canonical style. It parses with
//! [tree-sitter](https://tree-sitter.github.io/tree-sitter/) and the
//! [tree-sitter-javascript](https://github.com/tree-sitter/tree-sitter-javascript)
//! grammar, applies a fixed pipeline of optional rewrites and prints the
//! result from scratch, so the output does not depend on the input layout.
//!
//! The rewrites:
//!
//! - `==`/`!=` become `===`/`!==` unless one side is `null`
//! - brace-less loop and `if` bodies get braces (or, inversely, lose them)
//! - the last `switch` case gets a `break`
//! - line comments start with a capital letter
//! - multi-binding declarations are split
//! - switch cases, object properties and runs of functions, methods,
//!   constants, simple assignments, `require`s and exports are sorted
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```rust
//! use jsclean::{FormatOptions, format_source};
//!
//! let source = "// greet\nfunction hi(){console.log('hi')}";
//!
//! let formatted = format_source(source, &FormatOptions::default()).unwrap();
//! assert_eq!(formatted, "// Greet\nfunction hi() {\n\tconsole.log('hi');\n}\n");
//! ```
//!
//! ### As a CLI Tool
//!
//! The library is also available as a command-line tool. See the `main` module
//! for CLI usage details.
//!
//! ## Modules
//!
//! - [`parser`] - Tree-sitter integration and lowering to [`ast`]
//! - [`comments`] - Assigns every comment to an owning node
//! - [`transform`] - The rewrite rules and their order
//! - [`emit`] - Printing the tree back to source
//! - [`formatter`] - Options and the public entry points
//!
//! ## Limitations
//!
//! - Scripts only: `import`/`export`, JSX and TypeScript are rejected
//! - Original blank lines are not preserved
//! - Long lines are never wrapped

/// Typed JavaScript syntax tree
pub mod ast;

/// Comment attachment
pub mod comments;

/// Tree dumps for the `debug` subcommand
pub mod debug;

/// Printing the tree back to source
pub mod emit;

/// Error type shared by all stages
pub mod error;

/// Core formatting entry points and options
pub mod formatter;

mod lower;

/// Tree-sitter based JavaScript parser
pub mod parser;

/// Rewrite rules
pub mod transform;

/// Mutable tree traversal
pub mod visit;

pub use error::FormatError;
pub use formatter::{FormatOptions, format_source, is_formatted};
