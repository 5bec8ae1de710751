//!
//! C ABI
//!
//! Both entry points return a new string with refcount 1 on success and
//! clear the last-error slot. On failure they return null and leave the
//! error in the slot (see `dummy_core::error`). Inputs are only borrowed;
//! callers keep their own references.
//!

use std::ptr::NonNull;

use dummy_core::{
    dummy_error_clear, set_last_error, CatError, DummyString, HeapHeader, HeapTag,
};

fn heap_concat(a: &[u8], b: &[u8]) -> Result<NonNull<DummyString>, CatError> {
    let len = a
        .len()
        .checked_add(b.len())
        .ok_or(CatError::Allocation { requested: usize::MAX })?;
    let ptr = DummyString::try_alloc(len)?;
    unsafe {
        let payload = (*ptr.as_ptr()).payload_mut();
        payload[..a.len()].copy_from_slice(a);
        payload[a.len()..].copy_from_slice(b);
    }
    Ok(ptr)
}

fn finish(result: Result<NonNull<DummyString>, CatError>) -> *mut DummyString {
    match result {
        Ok(ptr) => {
            dummy_error_clear();
            ptr.as_ptr()
        }
        Err(err) => {
            set_last_error(err);
            std::ptr::null_mut()
        }
    }
}

unsafe fn string_arg<'a>(obj: *const HeapHeader, position: usize) -> Result<&'a DummyString, CatError> {
    if obj.is_null() {
        return Err(CatError::argument(format!(
            "cat() argument {} must be str, not null",
            position
        )));
    }
    match (*obj).tag {
        HeapTag::String => Ok(&*(obj as *const DummyString)),
        other => Err(CatError::argument(format!(
            "cat() argument {} must be str, not {}",
            position,
            other.name()
        ))),
    }
}

/// Concatenate two strings
///
/// # Safety
/// `a` and `b` must each be null or a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_cat(a: *const DummyString, b: *const DummyString) -> *mut DummyString {
    let result = string_arg(a as *const HeapHeader, 1)
        .and_then(|a| Ok((a, string_arg(b as *const HeapHeader, 2)?)))
        .and_then(|(a, b)| heap_concat(a.as_bytes(), b.as_bytes()));
    finish(result)
}

/// Concatenate the two strings in an argument vector
///
/// # Safety
/// `argv` must be null or point to `argc` entries, each null or a live
/// heap object.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_cat_argv(argv: *const *const HeapHeader, argc: usize) -> *mut DummyString {
    if argv.is_null() || argc != 2 {
        let given = if argv.is_null() { 0 } else { argc };
        tracing::debug!(given, "rejecting call with wrong arity");
        return finish(Err(CatError::arity(given)));
    }
    let args = std::slice::from_raw_parts(argv, argc);
    let result = string_arg(args[0], 1)
        .and_then(|a| Ok((a, string_arg(args[1], 2)?)))
        .and_then(|(a, b)| heap_concat(a.as_bytes(), b.as_bytes()));
    finish(result)
}
