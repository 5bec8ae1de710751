#![allow(unsafe_op_in_unsafe_fn)]
//!
//! dummy-strings - String Concatenation
//!
//! Provides the one operation of the dummy module in every shape a host
//! needs it:
//!
//! ## Rust API
//! - `concatenate(a: &str, b: &str) -> Result<String, CatError>`
//! - `concatenate_bytes(a: &[u8], b: &[u8]) -> Result<Vec<u8>, CatError>`
//! - `StringConcatenator` - the same operation behind an arity-checked `call`
//!
//! ## C ABI
//! - `dummy_cat(a, b) -> *mut DummyString` - concatenate two heap strings
//! - `dummy_cat_argv(argv, argc) -> *mut DummyString` - dynamic call form
//!
//! The copy touches only memory owned by the call, so hosts with a global
//! interpreter lock may run it with that lock released.
//!

pub mod concat;
pub mod ffi;

pub use concat::*;
pub use ffi::*;

pub use dummy_core::{CatError, ErrorKind};
