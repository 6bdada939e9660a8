//! The rune-driven scanning engine.

use std::io::{self, BufWriter, Read, Write};

use stencil_functions::{FunctionError, Functions, ValueStore};
use stencil_modifiers::Modifiers;

use crate::cancel::CancelToken;
use crate::error::{ErrorKind, ParseError};
use crate::item::{Item, ItemKind};
use crate::meta::{MetaError, MetaMap};
use crate::options::MultilineHandling;
use crate::output::reshape;
use crate::runes::RuneReader;

const ESCAPE_CHAR: char = '\\';
const NEWLINE_CHAR: char = '\n';
const ITEM_START: char = '<';
const ITEM_END: char = '>';
/// Marks a function when it immediately follows the start marker.
pub(crate) const FUNCTION_SIGIL: char = '@';
const MODIFIER_CHAR: char = '|';
const ENV_SIGIL: char = '$';
const ENV_OPEN: char = '{';
const ENV_CLOSE: char = '}';

/// Evaluations allowed per document unless reconfigured.
const DEFAULT_CALL_LIMIT: usize = 200;

/// Single-pass template interpreter over a rune stream.
///
/// The parser consumes `input` once, front to back, with one rune of
/// lookbehind and no backtracking. Literal text is copied through as it is
/// read; directive results are written the moment the directive closes.
/// One instance interprets one document; the named-value store and the
/// call counter are document-scoped.
pub struct Parser<R, W: Write> {
    input: RuneReader<R>,
    out: BufWriter<W>,

    functions: Functions,
    modifiers: Modifiers,
    store: ValueStore,
    cancel: CancelToken,

    call_limit: Option<usize>,
    call_count: usize,
    multiline: MultilineHandling,

    line: usize,
    column: usize,
    indent_char: Option<char>,
    indent_count: usize,

    /// Innermost item last; the stack is the parent chain.
    items: Vec<Item>,
}

impl<R: Read, W: Write> Parser<R, W> {
    /// A parser with the built-in registries, a fresh named-value store and
    /// the default evaluation ceiling of 200.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RuneReader::new(input),
            out: BufWriter::new(output),
            functions: Functions::new(),
            modifiers: Modifiers::new(),
            store: ValueStore::new(),
            cancel: CancelToken::new(),
            call_limit: Some(DEFAULT_CALL_LIMIT),
            call_count: 0,
            multiline: MultilineHandling::default(),
            line: 1,
            column: 0,
            indent_char: None,
            indent_count: 0,
            items: Vec::new(),
        }
    }

    /// Caps function calls plus modifier applications per document;
    /// `None` lifts the ceiling entirely.
    #[must_use]
    pub fn with_function_call_limit(mut self, limit: Option<usize>) -> Self {
        self.call_limit = limit;
        self
    }

    /// Selects how multiline function results are written out.
    #[must_use]
    pub fn with_multiline_handling(mut self, mode: MultilineHandling) -> Self {
        self.multiline = mode;
        self
    }

    /// Replaces the function registry.
    #[must_use]
    pub fn with_functions(mut self, functions: Functions) -> Self {
        self.functions = functions;
        self
    }

    /// Replaces the modifier registry.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Installs a cancellation token checked once per rune.
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Evaluations performed so far (function calls plus modifier
    /// applications).
    #[must_use]
    pub fn function_calls(&self) -> usize {
        self.call_count
    }

    /// Line the scan is currently on (1-based); after a successful parse,
    /// the line count of the document.
    #[must_use]
    pub fn current_line(&self) -> usize {
        self.line
    }

    /// Consumes the parser and hands back the output writer.
    pub fn into_output(self) -> io::Result<W> {
        self.out.into_inner().map_err(io::IntoInnerError::into_error)
    }

    /// Interprets the whole input, writing the result incrementally.
    ///
    /// Stops at the first unrecoverable error; output written up to that
    /// point stays written. Every error except [`ParseError::Canceled`] and
    /// I/O failures carries positional metadata.
    pub fn parse(&mut self) -> Result<(), ParseError> {
        let mut previous_rune = '\0';
        let mut skip_initialize = 0_usize;
        let mut indent_section = true;
        let mut last_escaped = false;
        let mut env_depth = 0_usize;

        loop {
            if self.cancel.is_canceled() {
                return Err(ParseError::Canceled);
            }
            let Some(r) = self.input.next_rune()? else {
                break;
            };
            let previous = previous_rune;
            previous_rune = r;

            self.column += 1;
            if indent_section {
                indent_section = self.count_indent(r);
            }
            if r == NEWLINE_CHAR {
                self.line += 1;
                self.column = 0;
                self.indent_char = None;
                self.indent_count = 0;
                indent_section = true;
            }

            // inside `${...}`: copy verbatim until the matching unescaped `}`
            if env_depth > 0 {
                self.write_out(r)?;
                if previous != ESCAPE_CHAR {
                    if r == ENV_OPEN {
                        env_depth += 1;
                    } else if r == ENV_CLOSE {
                        env_depth -= 1;
                    }
                }
                continue;
            }

            // a directive begins on the first rune after an unescaped `<`;
            // `<>` is dropped entirely
            let escaped_start = skip_initialize > 0;
            if previous == ITEM_START && !escaped_start && r != ITEM_START {
                if r == ITEM_END {
                    continue;
                }
                self.initialize_item(r);
                continue;
            }
            if skip_initialize > 0 {
                skip_initialize -= 1;
            }

            // `\` is eaten; a doubled `\\` emits one literal `\`
            if r == ESCAPE_CHAR {
                if previous == ESCAPE_CHAR && !last_escaped {
                    self.write_rune(ESCAPE_CHAR)?;
                    last_escaped = true;
                } else {
                    last_escaped = false;
                }
                continue;
            }
            // the rune following a live `\` is copied with no interpretation
            if previous == ESCAPE_CHAR && !last_escaped {
                self.write_rune(r)?;
                if r == ITEM_START {
                    skip_initialize += 1;
                }
                continue;
            }

            // `${` opens an environment-variable passthrough span
            if r == ENV_OPEN && previous == ENV_SIGIL {
                match self.items.last() {
                    None => {
                        env_depth = 1;
                        self.write_out(r)?;
                        continue;
                    }
                    Some(item) if item.is_function() => {
                        return Err(self.wrap_err(
                            previous,
                            Some(r),
                            ErrorKind::EnvInFunctionScope,
                        ));
                    }
                    // inside a String item `${` is ordinary text
                    Some(_) => {}
                }
            }

            // a bare `<` only arms directive detection; each extra `<` in a
            // chain emits one literal `<`
            if r == ITEM_START {
                if previous == ITEM_START && !escaped_start {
                    self.write_rune(ITEM_START)?;
                }
                continue;
            }

            // no directive open: straight through to the output
            if self.items.is_empty() {
                self.write_out(r)?;
                continue;
            }

            // `>` closes the innermost item once it is closable; a function
            // item mid-parameters routes `>` onward as parameter text
            if r == ITEM_END && self.items.last().is_some_and(Item::closable) {
                match self.finish_current_item() {
                    Ok(Some(text)) => self.write_out_str(&text)?,
                    Ok(None) => {}
                    Err(kind) => return Err(self.wrap_err(previous, Some(r), kind)),
                }
                continue;
            }

            self.route_to_item(previous, r)?;
        }

        if !self.items.is_empty() {
            return Err(self.wrap_err(previous_rune, None, ErrorKind::UnterminatedDirective));
        }

        self.out.flush()?;
        tracing::debug!(
            lines = self.line,
            calls = self.call_count,
            "document parsed"
        );
        Ok(())
    }

    /// Feeds a rune to the innermost item: section structure first, then the
    /// string-item modifier switch, then plain accumulation.
    fn route_to_item(&mut self, previous: char, r: char) -> Result<(), ParseError> {
        let consumed = match self.items.last_mut() {
            Some(item) => item.process_function_section(r),
            None => return Ok(()),
        };
        match consumed {
            Ok(true) => Ok(()),
            Ok(false) => {
                if let Some(item) = self.items.last_mut() {
                    if r == MODIFIER_CHAR && item.is_string() {
                        item.enter_modifiers();
                    } else {
                        item.push(r);
                    }
                }
                Ok(())
            }
            Err(kind) => Err(self.wrap_err(previous, Some(r), kind)),
        }
    }

    /// Evaluates the innermost item and folds the result into its parent;
    /// returns the text destined for the output stream when there is none.
    fn finish_current_item(&mut self) -> Result<Option<String>, ErrorKind> {
        let Some(item) = self.items.last() else {
            return Ok(None);
        };

        let mut value = match item.kind {
            ItemKind::Function => {
                bump_call_count(&mut self.call_count, self.call_limit)?;
                if !self.functions.contains(&item.name) {
                    return Err(FunctionError::NotFound(item.name.clone()).into());
                }
                let params = item.interpreted_parameters(&self.store)?;
                tracing::debug!(
                    function = %item.name,
                    params = params.len(),
                    call = self.call_count,
                    "evaluating function directive"
                );
                self.functions.call(&item.name, &params, &mut self.store)?
            }
            ItemKind::String => item.name.clone(),
        };

        for name in item.modifier_names() {
            bump_call_count(&mut self.call_count, self.call_limit)?;
            value = self.modifiers.call(name, &value)?;
        }

        // only generated output is reshaped; literal strings are the
        // author's text
        if item.is_function() {
            value = reshape(value, self.multiline, item.indent_char, item.indent_count);
        }

        self.items.pop();
        match self.items.last_mut() {
            Some(parent) => {
                parent.absorb(&value);
                Ok(None)
            }
            None => Ok(Some(value)),
        }
    }

    /// Pushes a new item seeded with `r`, nested under the current one.
    fn initialize_item(&mut self, r: char) {
        // an escape seed only escapes the next rune; keep it out of the name
        let seed = if r == ESCAPE_CHAR { None } else { Some(r) };
        let item = Item::new(seed, self.indent_char, self.indent_count);
        tracing::trace!(
            kind = item.kind.as_str(),
            line = self.line,
            depth = self.items.len() + 1,
            "directive opened"
        );
        self.items.push(item);
    }

    /// Tracks leading whitespace of the current line; returns `false` once
    /// the indentation run ends.
    fn count_indent(&mut self, r: char) -> bool {
        if r != '\t' && r != ' ' {
            return false;
        }
        if self.indent_char.is_none() {
            self.indent_char = Some(r);
        }
        self.indent_count += 1;
        true
    }

    /// Writes a rune to the innermost item, or to the output when no
    /// directive is open.
    fn write_rune(&mut self, r: char) -> Result<(), ParseError> {
        match self.items.last_mut() {
            Some(item) => {
                item.push_verbatim(r);
                Ok(())
            }
            None => self.write_out(r),
        }
    }

    fn write_out(&mut self, r: char) -> Result<(), ParseError> {
        let mut buf = [0u8; 4];
        self.out.write_all(r.encode_utf8(&mut buf).as_bytes())?;
        Ok(())
    }

    fn write_out_str(&mut self, text: &str) -> Result<(), ParseError> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Attaches positional context and the innermost item's state to `kind`.
    fn wrap_err(&self, previous: char, current: Option<char>, kind: ErrorKind) -> ParseError {
        let near = match current {
            Some(current) => format!("{previous}{current}"),
            None => previous.to_string(),
        };

        let mut meta = MetaMap::new();
        meta.insert("position_line".to_owned(), vec![self.line.to_string()]);
        meta.insert("position_column".to_owned(), vec![self.column.to_string()]);
        meta.insert("position_near".to_owned(), vec![near]);
        meta.insert(
            "function_calls".to_owned(),
            vec![self.call_count.to_string()],
        );
        meta.insert(
            "function_calls_limit".to_owned(),
            vec![self
                .call_limit
                .map_or_else(|| "unlimited".to_owned(), |limit| limit.to_string())],
        );
        if let Some(item) = self.items.last() {
            meta.insert("item".to_owned(), vec![item.name.clone()]);
            meta.insert("item_kind".to_owned(), vec![item.kind.as_str().to_owned()]);
            let params = item.parameters_for_meta();
            if !params.is_empty() {
                meta.insert("item_params".to_owned(), params);
            }
        }

        tracing::debug!(error = %kind, line = self.line, column = self.column, "parse failed");
        MetaError::new(kind, meta).into()
    }
}

/// Counts one evaluation against the configured ceiling.
fn bump_call_count(count: &mut usize, limit: Option<usize>) -> Result<(), ErrorKind> {
    *count += 1;
    match limit {
        Some(limit) if *count > limit => Err(ErrorKind::CallLimitExceeded { limit }),
        _ => Ok(()),
    }
}
