//!
//! Error Types and the Last-Error Slot
//!
//! `CatError` is the only error a concatenation can produce. Rust callers
//! receive it directly; C callers receive a null result and read the error
//! kind from a thread-local slot, mirroring how a host runtime keeps its
//! pending exception.
//!
//! Error kind codes:
//! - 0: no error
//! - 1: ArgumentError
//! - 2: AllocationError
//!

use std::cell::RefCell;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatError {
    /// The call did not receive exactly two string arguments.
    #[error("{message}")]
    Argument { message: String },

    /// The result buffer could not be obtained.
    #[error("failed to allocate memory for a {requested}-byte result")]
    Allocation { requested: usize },
}

impl CatError {
    pub fn argument(message: impl Into<String>) -> Self {
        CatError::Argument { message: message.into() }
    }

    pub fn arity(given: usize) -> Self {
        CatError::argument(format!("cat() takes exactly 2 arguments ({} given)", given))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatError::Argument { .. } => ErrorKind::Argument,
            CatError::Allocation { .. } => ErrorKind::Allocation,
        }
    }
}

#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    None = 0,
    Argument = 1,
    Allocation = 2,
}

pub const ERROR_KIND_NONE: i64 = ErrorKind::None as i64;
pub const ERROR_KIND_ARGUMENT: i64 = ErrorKind::Argument as i64;
pub const ERROR_KIND_ALLOCATION: i64 = ErrorKind::Allocation as i64;

thread_local! {
    static LAST_ERROR: RefCell<Option<CatError>> = const { RefCell::new(None) };
}

/// Record `err` as the pending error of the current thread.
pub fn set_last_error(err: CatError) {
    tracing::debug!(kind = ?err.kind(), %err, "recording error");
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(err));
}

/// Remove and return the pending error of the current thread.
pub fn take_last_error() -> Option<CatError> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

/// Get the pending error kind (0 if none)
#[unsafe(no_mangle)]
pub extern "C" fn dummy_error_kind() -> i64 {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ERROR_KIND_NONE, |err| err.kind() as i64)
    })
}

/// Check if there's a pending error
#[unsafe(no_mangle)]
pub extern "C" fn dummy_error_check() -> i64 {
    LAST_ERROR.with(|slot| if slot.borrow().is_some() { 1 } else { 0 })
}

/// Clear the pending error
#[unsafe(no_mangle)]
pub extern "C" fn dummy_error_clear() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        insta::assert_snapshot!(CatError::arity(3), @"cat() takes exactly 2 arguments (3 given)");
        insta::assert_snapshot!(
            CatError::Allocation { requested: 42 },
            @"failed to allocate memory for a 42-byte result"
        );
    }

    #[test]
    fn test_slot_roundtrip() {
        dummy_error_clear();
        assert_eq!(dummy_error_check(), 0);
        assert_eq!(dummy_error_kind(), ERROR_KIND_NONE);

        set_last_error(CatError::arity(1));
        assert_eq!(dummy_error_check(), 1);
        assert_eq!(dummy_error_kind(), ERROR_KIND_ARGUMENT);

        let err = take_last_error().unwrap();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert_eq!(dummy_error_check(), 0);
    }

    #[test]
    fn test_slot_is_per_thread() {
        set_last_error(CatError::Allocation { requested: 1 });
        let other = std::thread::spawn(|| dummy_error_kind()).join().unwrap();
        assert_eq!(other, ERROR_KIND_NONE);
        assert_eq!(dummy_error_kind(), ERROR_KIND_ALLOCATION);
        dummy_error_clear();
    }
}
