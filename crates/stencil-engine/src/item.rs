//! In-progress directive parse nodes.

use stencil_functions::ValueStore;

use crate::error::ErrorKind;
use crate::parser::FUNCTION_SIGIL;

/// What a directive evaluates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemKind {
    /// `<@name(params) | modifiers>`, resolved through the function registry.
    Function,
    /// `<text | modifiers>`, literal text.
    String,
}

impl ItemKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::String => "string",
        }
    }
}

/// Part of the directive currently receiving runes.
///
/// Transitions are monotonic: `Name` → `Parameters` → `Modifiers`. String
/// items skip `Parameters` entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Name,
    Parameters,
    Modifiers,
}

/// One parameter slot of a function item.
#[derive(Debug, Clone)]
pub(crate) struct Param {
    pub(crate) value: String,
    /// Still a candidate for named-value-store resolution. Cleared when a
    /// nested directive's result lands in the slot.
    pub(crate) is_variable: bool,
}

impl Param {
    fn new() -> Self {
        Self {
            value: String::new(),
            is_variable: true,
        }
    }
}

/// The mutable parse node for one directive span.
///
/// Items live on the engine's stack; the stack itself is the parent chain,
/// so nodes carry no back-pointers.
#[derive(Debug)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    /// Function name, or accumulated content for a String item.
    pub(crate) name: String,
    pub(crate) parameters: Vec<Param>,
    modifiers: Vec<String>,
    pub(crate) section: Section,
    current_param: usize,
    /// `None` until the first `|` after the parameter list ("before first
    /// modifier" sentinel).
    current_modifier: Option<usize>,
    /// Indentation of the declaration line, captured at creation; only used
    /// when a function result spans multiple lines.
    pub(crate) indent_char: Option<char>,
    pub(crate) indent_count: usize,
}

impl Item {
    /// A new item seeded with the first rune after `<`.
    ///
    /// `@` makes the item a function; an escape seed arrives as `None` and
    /// contributes nothing to the name.
    pub(crate) fn new(seed: Option<char>, indent_char: Option<char>, indent_count: usize) -> Self {
        let mut item = Self {
            kind: ItemKind::String,
            name: String::new(),
            parameters: Vec::new(),
            modifiers: Vec::new(),
            section: Section::Name,
            current_param: 0,
            current_modifier: None,
            indent_char,
            indent_count,
        };
        match seed {
            Some(FUNCTION_SIGIL) => {
                item.kind = ItemKind::Function;
                item.parameters.push(Param::new());
            }
            Some(c) => item.name.push(c),
            None => {}
        }
        item
    }

    pub(crate) fn is_function(&self) -> bool {
        self.kind == ItemKind::Function
    }

    pub(crate) fn is_string(&self) -> bool {
        self.kind == ItemKind::String
    }

    /// Whether `>` may close this item right now.
    ///
    /// String items always close; a function item only once its parameter
    /// list is complete, so a literal `>` can appear inside parameter text.
    pub(crate) fn closable(&self) -> bool {
        match self.kind {
            ItemKind::String => true,
            ItemKind::Function => self.section == Section::Modifiers,
        }
    }

    /// Interprets function-structure runes; `Ok(true)` means the rune was
    /// consumed as structure.
    pub(crate) fn process_function_section(&mut self, r: char) -> Result<bool, ErrorKind> {
        if !self.is_function() {
            return Ok(false);
        }

        match r {
            '(' => {
                if self.section != Section::Name {
                    return Err(ErrorKind::MisplacedParameterStart);
                }
                self.section = Section::Parameters;
            }
            ')' => {
                if self.section != Section::Parameters {
                    return Err(ErrorKind::MisplacedParameterEnd);
                }
                self.section = Section::Modifiers;
            }
            ',' => {
                if self.section != Section::Parameters {
                    return Err(ErrorKind::MisplacedParameterSeparator);
                }
                self.current_param += 1;
            }
            '|' => match self.section {
                Section::Name => return Err(ErrorKind::ModifierInFunctionName),
                // pipes are permitted verbatim inside parameter text
                Section::Parameters => return Ok(false),
                Section::Modifiers => self.advance_modifier(),
            },
            ' ' => {
                // only the spaces between `)` and the first `|` are eaten
                if !(self.section == Section::Modifiers && self.current_modifier.is_none()) {
                    return Ok(false);
                }
            }
            _ => {
                if self.section == Section::Modifiers && self.current_modifier.is_none() {
                    return Err(ErrorKind::ExpectedModifierSeparator);
                }
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Starts the next modifier slot (first `|` moves past the sentinel).
    pub(crate) fn advance_modifier(&mut self) {
        self.current_modifier = Some(self.current_modifier.map_or(0, |i| i + 1));
    }

    /// Switches a String item into its modifier section.
    pub(crate) fn enter_modifiers(&mut self) {
        self.section = Section::Modifiers;
        self.advance_modifier();
    }

    /// Routes a rune into the active section's buffer.
    pub(crate) fn push(&mut self, r: char) {
        match self.section {
            Section::Name => self.name.push(r),
            Section::Parameters => self.push_parameter(r),
            Section::Modifiers => self.push_modifier(r),
        }
    }

    fn push_parameter(&mut self, r: char) {
        self.ensure_param_slot();
        let param = &mut self.parameters[self.current_param];
        // leading spaces of a parameter are eaten
        if param.value.is_empty() && r == ' ' {
            return;
        }
        if r != ' ' {
            param.is_variable = true;
        }
        param.value.push(r);
    }

    fn push_modifier(&mut self, r: char) {
        let Some(index) = self.current_modifier else {
            return;
        };
        if self.modifiers.len() <= index {
            self.modifiers.resize_with(index + 1, String::new);
        }
        self.modifiers[index].push(r);
    }

    /// Writes an escaped rune to wherever this item currently collects text,
    /// with no structural interpretation.
    pub(crate) fn push_verbatim(&mut self, r: char) {
        if self.is_function() {
            self.ensure_param_slot();
            self.parameters[self.current_param].value.push(r);
        } else {
            self.name.push(r);
        }
    }

    /// Folds a nested directive's result into this item.
    pub(crate) fn absorb(&mut self, text: &str) {
        if self.is_function() {
            self.ensure_param_slot();
            let param = &mut self.parameters[self.current_param];
            param.value.push_str(text);
            param.is_variable = false;
        } else {
            self.name.push_str(text);
        }
    }

    fn ensure_param_slot(&mut self) {
        if self.parameters.len() <= self.current_param {
            self.parameters.resize_with(self.current_param + 1, Param::new);
        }
    }

    /// Parameters with bare variable references resolved against the store.
    ///
    /// Variable slots are trimmed before lookup; literal slots produced by
    /// nested directives pass through verbatim. A function closed with an
    /// empty `()` yields no parameters at all.
    pub(crate) fn interpreted_parameters(
        &self,
        store: &ValueStore,
    ) -> Result<Vec<String>, ErrorKind> {
        if self.parameters.len() == 1
            && self.current_param == 0
            && self.parameters[0].is_variable
            && self.parameters[0].value.is_empty()
        {
            return Ok(Vec::new());
        }

        self.parameters
            .iter()
            .map(|param| {
                if param.is_variable {
                    let key = param.value.trim();
                    store
                        .get(key)
                        .map(str::to_owned)
                        .ok_or_else(|| ErrorKind::VariableNotFound(key.to_owned()))
                } else {
                    Ok(param.value.clone())
                }
            })
            .collect()
    }

    /// Raw parameters for error metadata (variable slots trimmed, nothing
    /// resolved).
    pub(crate) fn parameters_for_meta(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|param| {
                if param.is_variable {
                    param.value.trim().to_owned()
                } else {
                    param.value.clone()
                }
            })
            .collect()
    }

    /// Modifier names in application order, surrounding spaces trimmed.
    pub(crate) fn modifier_names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.iter().map(|name| name.trim())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn function_item() -> Item {
        Item::new(Some('@'), None, 0)
    }

    fn feed(item: &mut Item, input: &str) {
        for r in input.chars() {
            match item.process_function_section(r) {
                Ok(true) => {}
                Ok(false) => {
                    if r == '|' && item.is_string() {
                        item.enter_modifiers();
                    } else {
                        item.push(r);
                    }
                }
                Err(err) => panic!("unexpected structure error on {r:?}: {err}"),
            }
        }
    }

    #[test]
    fn function_sections_progress_monotonically() {
        let mut item = function_item();
        assert_eq!(item.section, Section::Name);
        assert!(!item.closable());

        feed(&mut item, "setVar(a, b)");
        assert_eq!(item.section, Section::Modifiers);
        assert_eq!(item.name, "setVar");
        assert!(item.closable());
    }

    #[test]
    fn string_items_are_always_closable() {
        let item = Item::new(Some('t'), None, 0);
        assert!(item.closable());
        assert!(item.is_string());
    }

    #[test]
    fn parameter_leading_spaces_are_eaten() {
        let mut item = function_item();
        feed(&mut item, "f(  spaced value ,  second)");
        assert_eq!(item.parameters[0].value, "spaced value ");
        assert_eq!(item.parameters[1].value, "second");
    }

    #[test]
    fn pipe_passes_through_inside_parameters() {
        let mut item = function_item();
        feed(&mut item, "f(a|b)");
        assert_eq!(item.parameters[0].value, "a|b");
    }

    #[test]
    fn pipe_in_function_name_is_an_error() {
        let mut item = function_item();
        let err = item.process_function_section('|').unwrap_err();
        assert!(matches!(err, ErrorKind::ModifierInFunctionName));
    }

    #[test]
    fn misplaced_structure_characters() {
        let mut item = function_item();
        assert!(matches!(
            item.process_function_section(')').unwrap_err(),
            ErrorKind::MisplacedParameterEnd
        ));
        assert!(matches!(
            item.process_function_section(',').unwrap_err(),
            ErrorKind::MisplacedParameterSeparator
        ));

        feed(&mut item, "f(x)");
        assert!(matches!(
            item.process_function_section('(').unwrap_err(),
            ErrorKind::MisplacedParameterStart
        ));
    }

    #[test]
    fn junk_between_parens_and_first_pipe() {
        let mut item = function_item();
        feed(&mut item, "f(x)");
        assert!(item.process_function_section(' ').unwrap());
        assert!(matches!(
            item.process_function_section('y').unwrap_err(),
            ErrorKind::ExpectedModifierSeparator
        ));
    }

    #[test]
    fn modifier_names_are_trimmed() {
        let mut item = function_item();
        feed(&mut item, "f(x) | upper | sha256 ");
        let names: Vec<&str> = item.modifier_names().collect();
        assert_eq!(names, vec!["upper", "sha256"]);
    }

    #[test]
    fn absorb_clears_variable_marking() {
        let mut item = function_item();
        feed(&mut item, "f(");
        item.absorb("generated");
        assert!(!item.parameters[0].is_variable);

        // literal text after a nested result re-arms resolution
        item.push('x');
        assert!(item.parameters[0].is_variable);
        assert_eq!(item.parameters[0].value, "generatedx");
    }

    #[test]
    fn empty_parens_mean_no_parameters() {
        let mut item = function_item();
        feed(&mut item, "f()");
        let store = ValueStore::new();
        assert_eq!(item.interpreted_parameters(&store).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn variable_slots_resolve_against_the_store() {
        let mut store = ValueStore::new();
        store.set("name", "stored value");

        let mut item = function_item();
        feed(&mut item, "f( name )");
        assert_eq!(
            item.interpreted_parameters(&store).unwrap(),
            vec!["stored value".to_owned()]
        );

        let mut missing = function_item();
        feed(&mut missing, "f(unknown)");
        assert!(matches!(
            missing.interpreted_parameters(&store).unwrap_err(),
            ErrorKind::VariableNotFound(key) if key == "unknown"
        ));
    }
}
