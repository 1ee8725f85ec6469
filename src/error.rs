use thiserror::Error;

/// Everything that can stop a file from being formatted.
///
/// A failed run never produces partial output.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input is not valid JavaScript.
    #[error("line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Valid syntax outside the supported dialect (modules, JSX, ...).
    #[error("line {line}: unsupported construct `{construct}`")]
    Unsupported { construct: String, line: usize },

    /// A comment ended up on a node that may not own comments.
    #[error("line {line}: comment left attached to {kind}")]
    DetachedComment { kind: &'static str, line: usize },

    /// Comments were lost or duplicated while attaching them.
    #[error("comment attachment produced {found} comments, expected {expected}")]
    CommentCount { expected: usize, found: usize },

    #[error("parser setup failed: {0}")]
    Parser(String),
}

pub type Result<T, E = FormatError> = std::result::Result<T, E>;
