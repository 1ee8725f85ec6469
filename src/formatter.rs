//! Formatting entry points
//!
//! [`format_source`] runs the whole pipeline on one source text:
//! parse, attach comments, apply the enabled rewrite rules, emit. Either the
//! complete output comes back or an error does; there is no partial result.
//!
//! # Example
//!
//! ```rust
//! use jsclean::formatter::{FormatOptions, format_source};
//!
//! let messy = "var b = 1, a = {y: 2, x: 1};\nif (a == b) go()";
//!
//! let formatted = format_source(messy, &FormatOptions::default()).unwrap();
//! assert_eq!(
//!     formatted,
//!     "var b = 1;\nvar a = {\n\tx: 1,\n\ty: 2,\n};\nif (a === b) {\n\tgo();\n}\n"
//! );
//! ```

use crate::comments;
use crate::emit::emit;
use crate::error::Result;
use crate::parser::parse;
use crate::transform;

/// Configuration options for the formatter
///
/// Every rule toggle defaults to on. Options are read-only once formatting
/// starts.
///
/// # Example
///
/// ```rust
/// use jsclean::formatter::FormatOptions;
///
/// let opts = FormatOptions {
///     indent: "    ".to_string(),
///     sort_functions: false,
///     ..FormatOptions::default()
/// };
/// assert!(opts.sort_properties);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Text of one indentation level
    pub indent: String,
    /// `==`/`!=` become `===`/`!==` unless compared with `null`
    pub exact_equals: bool,
    /// Wrap brace-less bodies in blocks; when off, strip needless braces instead
    pub extra_braces: bool,
    /// Capitalize the first letter of line comments
    pub cap_comments: bool,
    /// One declaration per `var`/`let`/`const` statement
    pub separate_vars: bool,
    /// Sort switch case labels and fallthrough blocks
    pub sort_cases: bool,
    /// Sort runs of adjacent function declarations by name
    pub sort_functions: bool,
    /// Sort object literal properties by key
    pub sort_properties: bool,
    /// Sort runs of class methods by name, constructor first
    pub sort_methods: bool,
    /// Sort runs of single declarations of constants by name
    pub sort_vars: bool,
    /// Sort runs of `name = constant;` assignments by target
    pub sort_assigns: bool,
    /// Sort runs of `require` declarations by name
    pub sort_requires: bool,
    /// Sort runs of `exports.x = x;` statements by name
    pub sort_exports: bool,
    /// Close the last switch case with `break`
    pub trailing_break: bool,
    /// End statements with `;`
    pub semicolons: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            exact_equals: true,
            extra_braces: true,
            cap_comments: true,
            separate_vars: true,
            sort_cases: true,
            sort_functions: true,
            sort_properties: true,
            sort_methods: true,
            sort_vars: true,
            sort_assigns: true,
            sort_requires: true,
            sort_exports: true,
            trailing_break: true,
            semicolons: true,
        }
    }
}

/// Format JavaScript source code.
///
/// # Errors
///
/// - [`FormatError::Syntax`](crate::FormatError::Syntax) for invalid input
/// - [`FormatError::Unsupported`](crate::FormatError::Unsupported) for
///   modules, JSX and other constructs outside the supported dialect
/// - [`FormatError::DetachedComment`](crate::FormatError::DetachedComment) or
///   [`FormatError::CommentCount`](crate::FormatError::CommentCount) if
///   comment attachment goes wrong
///
/// # Example
///
/// ```rust
/// use jsclean::formatter::{FormatOptions, format_source};
///
/// let source = "switch (x) {\ncase 'b':\ncase 'a':\n  f()\n}\n";
/// let formatted = format_source(source, &FormatOptions::default()).unwrap();
/// assert_eq!(formatted, "switch (x) {\ncase 'a':\ncase 'b':\n\tf();\n\tbreak;\n}\n");
/// ```
pub fn format_source(input: &str, opts: &FormatOptions) -> Result<String> {
    let _span = tracing::debug_span!("format", bytes = input.len()).entered();
    let parsed = parse(input)?;
    let mut program = parsed.program;
    comments::attach(&mut program, parsed.comments)?;
    transform::run(&mut program, opts);
    Ok(emit(&program, opts))
}

/// True when formatting `input` would not change it.
pub fn is_formatted(input: &str, opts: &FormatOptions) -> Result<bool> {
    Ok(format_source(input, opts)? == input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn formatted_output_is_stable() {
        let opts = FormatOptions::default();
        let once = format_source("var b = 2, a = 1;\nfunction z() {}\nfunction y() {}\n", &opts).unwrap();
        assert!(is_formatted(&once, &opts).unwrap());
    }

    #[test]
    fn syntax_errors_produce_no_output() {
        let err = format_source("if (", &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, FormatError::Syntax { line: 1, .. }));
    }
}
