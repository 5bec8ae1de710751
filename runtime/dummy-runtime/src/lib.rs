///
/// dummy Runtime Static Library
///
/// Bundles every C-ABI symbol of the dummy module into one static library
/// (libdummy_runtime.a) that a host links against:
/// - Heap objects (dummy_string_new, dummy_string_decref, dummy_bytes_new, ...)
/// - Error slot (dummy_error_kind, dummy_error_check, dummy_error_clear)
/// - Concatenation (dummy_cat, dummy_cat_argv)
///

pub use dummy_core::*;
pub use dummy_strings::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exports_link_together() {
        unsafe {
            let a = dummy_string_new(b"foo".as_ptr(), 3);
            let b = dummy_string_new(b"bar".as_ptr(), 3);
            let c = dummy_cat(a, b);
            assert_eq!(dummy_string_len(c), 6);
            assert_eq!(dummy_error_check(), 0);
            for s in [a, b, c] {
                dummy_string_decref(s);
            }
        }
    }
}
