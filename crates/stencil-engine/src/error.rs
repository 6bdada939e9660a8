//! Error types for the scanning engine.

use stencil_functions::FunctionError;
use stencil_modifiers::ModifierError;

use crate::meta::MetaError;

/// Failure classes raised while a document is interpreted.
///
/// Everything here is wrapped into a [`MetaError`] with positional context
/// before it leaves the engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// `(` outside of a function name section.
    #[error("opening parenthesis at incorrect place")]
    MisplacedParameterStart,

    /// `)` outside of a parameter section.
    #[error("closing parenthesis at incorrect place")]
    MisplacedParameterEnd,

    /// `,` outside of a parameter section.
    #[error("comma at incorrect place")]
    MisplacedParameterSeparator,

    /// `|` inside a function name.
    #[error("modifier character is not allowed in a function name")]
    ModifierInFunctionName,

    /// Something other than spaces between `)` and the first `|`.
    #[error("invalid character, expected space or modifier character")]
    ExpectedModifierSeparator,

    /// `${...}` opened directly inside a function's parameter list.
    #[error("env syntax `${{...}}` is not allowed inside function parameters")]
    EnvInFunctionScope,

    /// End of input with a directive still open.
    #[error("unterminated directive at end of input")]
    UnterminatedDirective,

    /// A bare parameter referenced a name the store does not hold.
    #[error("variable [{0}] not found")]
    VariableNotFound(String),

    /// The configured evaluation ceiling was crossed.
    #[error("max amount of function calls [{limit}] exceeded")]
    CallLimitExceeded { limit: usize },

    #[error(transparent)]
    Function(#[from] FunctionError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

/// Top-level parse outcome.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Caller-initiated abort; does not indicate malformed input and carries
    /// no metadata.
    #[error("parsing canceled")]
    Canceled,

    /// Transport failure reading input or writing output (including invalid
    /// UTF-8 in the input stream).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse failure with positional metadata attached.
    #[error(transparent)]
    Meta(#[from] MetaError),
}
