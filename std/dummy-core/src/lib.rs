//!
//! dummy-core - Core Runtime Types
//!
//! This crate provides the types shared by the dummy crates:
//!
//! - `HeapHeader` and `HeapTag` for reference-counted heap objects
//! - `DummyString` for NUL-terminated, heap-allocated UTF-8 strings
//! - `DummyBytes` for heap-allocated byte arrays
//! - `CatError` and the thread-local last-error slot used by the C ABI
//!
//! All heap objects use atomic reference counting. Allocation never panics:
//! a failed allocation surfaces as a null pointer on the C side and as
//! `CatError::Allocation` on the Rust side.
//!

pub mod value;
pub mod bytes;
pub mod error;

pub use value::*;
pub use bytes::*;
pub use error::*;
