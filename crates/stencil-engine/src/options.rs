//! Parser configuration surface.

/// How multiline function results are written out.
///
/// Only function results are reshaped; literal string directives are
/// user-authored text and pass through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultilineHandling {
    /// Keep generated newlines exactly as produced.
    #[default]
    Preserve,
    /// Replace every newline with the literal two-character `\n` sequence,
    /// squashing the result onto a single line.
    Squash,
    /// Prefix every continuation line with the indentation of the line the
    /// directive was declared on, so the block stays aligned in YAML.
    Reindent,
}
