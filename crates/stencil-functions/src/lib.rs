//! Function registry and built-in function library for stencil.
//!
//! A function is a named operation taking zero or more string parameters and
//! producing a string result. Functions are resolved by name through
//! [`Functions`] and may read and write the document-scoped [`ValueStore`],
//! which is how one directive's result becomes referencable by a later one.
//!
//! The registry ships with the standard set (random generation, named
//! values, RSA keypairs) and accepts additional entries through
//! [`Functions::with_function`]:
//!
//! ```
//! use stencil_functions::{Functions, ValueStore};
//!
//! let functions = Functions::new()
//!     .with_function("shout", |params, _store| Ok(params.join("!").to_uppercase()));
//!
//! let mut store = ValueStore::new();
//! let result = functions
//!     .call("shout", &["hey".to_owned(), "ho".to_owned()], &mut store)
//!     .unwrap();
//! assert_eq!(result, "HEY!HO");
//! ```

mod builtin;
mod error;
mod keys;
mod registry;
mod store;

pub use error::FunctionError;
pub use registry::{FunctionFn, Functions};
pub use store::ValueStore;
