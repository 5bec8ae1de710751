///
/// DummyBytes - Core Bytes Type
///
/// Heap-allocated byte array sharing the string header layout. Hosts use it
/// to pass binary values, which string operations reject by tag.
///

use std::alloc::{alloc_zeroed, dealloc, Layout};

use crate::{dummy_error_clear, set_last_error, CatError, HeapHeader, HeapTag};

/// A heap-allocated byte array
#[repr(C)]
pub struct DummyBytes {
    pub header: HeapHeader,
    pub len: usize,
    pub data: [u8; 0],
}

impl DummyBytes {
    pub fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }
}

fn bytes_layout(len: usize) -> Option<Layout> {
    let size = std::mem::size_of::<DummyBytes>().checked_add(len)?;
    Layout::from_size_align(size, std::mem::align_of::<DummyBytes>()).ok()
}

/// Create a bytes object holding a copy of `data`.
///
/// Returns null on allocation failure with the error left in the
/// last-error slot; a successful call clears the slot.
///
/// # Safety
/// `data` must point to `len` readable bytes, or be null.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_bytes_new(data: *const u8, len: usize) -> *mut DummyBytes {
    let Some(layout) = bytes_layout(len) else {
        tracing::warn!(len, "bytes size overflows the address space");
        set_last_error(CatError::Allocation { requested: len });
        return std::ptr::null_mut();
    };
    unsafe {
        let ptr = alloc_zeroed(layout) as *mut DummyBytes;
        if ptr.is_null() {
            tracing::warn!(len, "failed to allocate bytes");
            set_last_error(CatError::Allocation { requested: len });
            return ptr;
        }
        std::ptr::write(
            ptr,
            DummyBytes {
                header: HeapHeader::new(HeapTag::Bytes),
                len,
                data: [],
            },
        );
        if !data.is_null() && len > 0 {
            std::ptr::copy_nonoverlapping(data, (*ptr).data.as_mut_ptr(), len);
        }
        dummy_error_clear();
        ptr
    }
}

/// Decrement reference count and free if zero
///
/// # Safety
/// `b` must be null or a live bytes object from `dummy_bytes_new`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dummy_bytes_decref(b: *mut DummyBytes) {
    if b.is_null() {
        return;
    }
    unsafe {
        if (*b).header.decref() {
            if let Some(layout) = bytes_layout((*b).len) {
                dealloc(b as *mut u8, layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dummy_error_kind, ERROR_KIND_ALLOCATION, ERROR_KIND_NONE};

    #[test]
    fn test_bytes_creation() {
        unsafe {
            let b = dummy_bytes_new(b"\x00\xff".as_ptr(), 2);
            assert!(!b.is_null());
            assert_eq!((*b).header.tag, HeapTag::Bytes);
            assert_eq!((*b).as_slice(), &[0x00, 0xff]);
            assert_eq!(dummy_error_kind(), ERROR_KIND_NONE);
            dummy_bytes_decref(b);
        }
    }

    #[test]
    fn test_impossible_size_sets_allocation_error() {
        let b = unsafe { dummy_bytes_new(std::ptr::null(), usize::MAX) };
        assert!(b.is_null());
        assert_eq!(dummy_error_kind(), ERROR_KIND_ALLOCATION);
        dummy_error_clear();
    }
}
