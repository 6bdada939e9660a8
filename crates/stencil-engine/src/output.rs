//! Output shaping for multiline function results.

use crate::options::MultilineHandling;

/// Reshapes a function result according to the configured multiline mode.
///
/// Applied exactly once per function directive, after modifiers and before
/// the result folds into its parent or the output stream. `Reindent` uses
/// the indentation captured when the directive's item was created and is a
/// no-op for directives declared without leading indentation.
pub(crate) fn reshape(
    value: String,
    mode: MultilineHandling,
    indent_char: Option<char>,
    indent_count: usize,
) -> String {
    match mode {
        MultilineHandling::Preserve => value,
        MultilineHandling::Squash => value.replace('\n', "\\n"),
        MultilineHandling::Reindent => match indent_char {
            Some(c) if indent_count > 0 => {
                let mut replacement = String::with_capacity(indent_count + 1);
                replacement.push('\n');
                for _ in 0..indent_count {
                    replacement.push(c);
                }
                value.replace('\n', &replacement)
            }
            _ => value,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BLOCK: &str = "first\nsecond\nthird";

    #[test]
    fn preserve_keeps_newlines() {
        assert_eq!(
            reshape(BLOCK.to_owned(), MultilineHandling::Preserve, Some('\t'), 2),
            BLOCK
        );
    }

    #[test]
    fn squash_replaces_newlines_with_escapes() {
        let squashed = reshape(BLOCK.to_owned(), MultilineHandling::Squash, Some('\t'), 2);
        assert_eq!(squashed, "first\\nsecond\\nthird");
        assert_eq!(squashed.matches('\n').count(), 0);
        assert_eq!(squashed.matches("\\n").count(), 2);
    }

    #[test]
    fn reindent_prefixes_continuation_lines() {
        assert_eq!(
            reshape(BLOCK.to_owned(), MultilineHandling::Reindent, Some('\t'), 2),
            "first\n\t\tsecond\n\t\tthird"
        );
        assert_eq!(
            reshape(BLOCK.to_owned(), MultilineHandling::Reindent, Some(' '), 4),
            "first\n    second\n    third"
        );
    }

    #[test]
    fn reindent_without_indentation_is_a_noop() {
        assert_eq!(
            reshape(BLOCK.to_owned(), MultilineHandling::Reindent, None, 0),
            BLOCK
        );
    }
}
