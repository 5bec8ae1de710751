//!
//! Heap String Representation
//!
//! Strings handed across the C ABI live on the heap behind a `HeapHeader`
//! carrying an atomic refcount and a type tag. The payload is followed by a
//! NUL terminator so C hosts can read it as a plain `char *`.
//!
//! Layout: `[header][len][data: len bytes][0]`
//!

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{dummy_error_clear, set_last_error, CatError};

/// Type tags for heap objects
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapTag {
    String = 0,
    Bytes = 1,
}

impl HeapTag {
    pub fn name(self) -> &'static str {
        match self {
            HeapTag::String => "str",
            HeapTag::Bytes => "bytes",
        }
    }
}

/// Header for all heap-allocated objects
#[repr(C)]
pub struct HeapHeader {
    pub refcount: AtomicUsize,
    pub tag: HeapTag,
    pub _pad: [u8; 7],
}

impl HeapHeader {
    pub fn new(tag: HeapTag) -> Self {
        Self {
            refcount: AtomicUsize::new(1),
            tag,
            _pad: [0; 7],
        }
    }

    pub fn incref(&self) {
        self.refcount.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns true when the last reference was dropped.
    pub fn decref(&self) -> bool {
        if self.refcount.fetch_sub(1, Ordering::Release) == 1 {
            std::sync::atomic::fence(Ordering::Acquire);
            true
        } else {
            false
        }
    }

    pub fn refcount(&self) -> usize {
        self.refcount.load(Ordering::Relaxed)
    }
}

/// A heap-allocated, NUL-terminated UTF-8 string
#[repr(C)]
pub struct DummyString {
    pub header: HeapHeader,
    pub len: usize,
    pub data: [u8; 0],
}

fn string_layout(len: usize) -> Option<Layout> {
    let size = std::mem::size_of::<DummyString>()
        .checked_add(len)?
        .checked_add(1)?;
    Layout::from_size_align(size, std::mem::align_of::<DummyString>()).ok()
}

impl DummyString {
    /// Allocate a zero-filled string of `len` bytes plus terminator.
    ///
    /// The payload is all NULs until the caller fills it; callers that
    /// expose the result through `as_str` must write valid UTF-8 first.
    pub fn try_alloc(len: usize) -> Result<NonNull<DummyString>, CatError> {
        let Some(layout) = string_layout(len) else {
            tracing::warn!(len, "string size overflows the address space");
            return Err(CatError::Allocation { requested: len });
        };

        let raw = unsafe { alloc_zeroed(layout) } as *mut DummyString;
        let Some(ptr) = NonNull::new(raw) else {
            tracing::warn!(len, "failed to allocate string");
            return Err(CatError::Allocation { requested: len });
        };

        unsafe {
            std::ptr::write(
                ptr.as_ptr(),
                DummyString {
                    header: HeapHeader::new(HeapTag::String),
                    len,
                    data: [],
                },
            );
        }
        Ok(ptr)
    }

    /// Allocate a string holding a copy of `s`.
    pub fn try_from_str(s: &str) -> Result<NonNull<DummyString>, CatError> {
        let ptr = Self::try_alloc(s.len())?;
        unsafe {
            std::ptr::copy_nonoverlapping(s.as_ptr(), (*ptr.as_ptr()).data.as_mut_ptr(), s.len());
        }
        Ok(ptr)
    }

    pub fn as_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    pub fn as_str(&self) -> &str {
        unsafe { std::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Mutable view of the payload, excluding the terminator.
    ///
    /// # Safety
    /// The caller must be the sole owner of the string.
    pub unsafe fn payload_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.data.as_mut_ptr(), self.len) }
    }
}

/// Allocate a new string on the heap.
///
/// Returns null on allocation failure with the error left in the
/// last-error slot; a successful call clears the slot.
///
/// # Safety
/// `data` must point to `len` bytes of valid UTF-8, or be null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_string_new(data: *const u8, len: usize) -> *mut DummyString {
    match DummyString::try_alloc(len) {
        Ok(ptr) => {
            if !data.is_null() && len > 0 {
                unsafe {
                    std::ptr::copy_nonoverlapping(data, (*ptr.as_ptr()).data.as_mut_ptr(), len);
                }
            }
            dummy_error_clear();
            ptr.as_ptr()
        }
        Err(err) => {
            set_last_error(err);
            std::ptr::null_mut()
        }
    }
}

/// Increment reference count of a string
///
/// # Safety
/// `s` must be null or a live string from `dummy_string_new`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_string_incref(s: *mut DummyString) {
    if !s.is_null() {
        unsafe { (*s).header.incref(); }
    }
}

/// Decrement reference count and free if zero
///
/// # Safety
/// `s` must be null or a live string from `dummy_string_new`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_string_decref(s: *mut DummyString) {
    if s.is_null() {
        return;
    }
    unsafe {
        if (*s).header.decref() {
            // The layout was valid when the string was allocated.
            if let Some(layout) = string_layout((*s).len) {
                dealloc(s as *mut u8, layout);
            }
        }
    }
}

/// Get string length in bytes
///
/// # Safety
/// `s` must be null or a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_string_len(s: *const DummyString) -> i64 {
    if s.is_null() {
        0
    } else {
        unsafe { (*s).len as i64 }
    }
}

/// Get a pointer to the NUL-terminated string data
///
/// # Safety
/// `s` must be null or a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_string_data(s: *const DummyString) -> *const u8 {
    if s.is_null() {
        std::ptr::null()
    } else {
        unsafe { (*s).data.as_ptr() }
    }
}
