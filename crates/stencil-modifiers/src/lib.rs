//! Modifier registry and built-in text transforms for stencil.
//!
//! A modifier is a named single-input single-output text transform applied
//! after a directive's primary value has been computed: hashing, casing and
//! encoding. Modifiers are pure; they never touch shared document state.
//!
//! ```
//! use stencil_modifiers::Modifiers;
//!
//! let modifiers = Modifiers::new();
//! assert_eq!(modifiers.call("upper", "quiet").unwrap(), "QUIET");
//! ```

mod builtin;
mod casing;
mod error;
mod registry;

pub use casing::title_case;
pub use error::ModifierError;
pub use registry::{ModifierFn, Modifiers};
