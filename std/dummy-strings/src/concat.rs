//!
//! Concatenation
//!
//! The result buffer is reserved up front with a fallible reservation, so
//! an allocation failure becomes `CatError::Allocation` instead of an abort,
//! and no partially filled buffer ever escapes.
//!

use dummy_core::CatError;

fn total_len(a: usize, b: usize) -> Result<usize, CatError> {
    a.checked_add(b)
        .ok_or(CatError::Allocation { requested: usize::MAX })
}

/// Reserve an empty string with room for exactly `len` bytes.
pub fn reserve_string(len: usize) -> Result<String, CatError> {
    let mut buffer = String::new();
    buffer.try_reserve_exact(len).map_err(|err| {
        tracing::warn!(len, %err, "failed to reserve result buffer");
        CatError::Allocation { requested: len }
    })?;
    Ok(buffer)
}

/// Concatenate `a` and `b` into a new string.
pub fn concatenate(a: &str, b: &str) -> Result<String, CatError> {
    tracing::trace!(a_len = a.len(), b_len = b.len(), "concatenate");
    let mut buffer = reserve_string(total_len(a.len(), b.len())?)?;
    buffer.push_str(a);
    buffer.push_str(b);
    Ok(buffer)
}

/// Byte-exact form of [`concatenate`]
pub fn concatenate_bytes(a: &[u8], b: &[u8]) -> Result<Vec<u8>, CatError> {
    let len = total_len(a.len(), b.len())?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|err| {
        tracing::warn!(len, %err, "failed to reserve result buffer");
        CatError::Allocation { requested: len }
    })?;
    buffer.extend_from_slice(a);
    buffer.extend_from_slice(b);
    Ok(buffer)
}

/// Stateless concatenation service.
///
/// `call` mirrors a dynamic host call: the argument list must hold exactly
/// two strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringConcatenator;

impl StringConcatenator {
    pub fn new() -> Self {
        StringConcatenator
    }

    pub fn concatenate(&self, a: &str, b: &str) -> Result<String, CatError> {
        concatenate(a, b)
    }

    pub fn call(&self, args: &[&str]) -> Result<String, CatError> {
        match args {
            [a, b] => self.concatenate(a, b),
            _ => {
                tracing::debug!(given = args.len(), "rejecting call with wrong arity");
                Err(CatError::arity(args.len()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "x",
        "foo",
        "bar",
        "hello world",
        "héllo",
        "日本語",
        "🦀 crab",
        "line\nbreak\ttab",
        "nul\0inside",
    ];

    #[test]
    fn test_examples() {
        assert_eq!(concatenate("foo", "bar").unwrap(), "foobar");
        assert_eq!(concatenate("", "x").unwrap(), "x");
        assert_eq!(concatenate("x", "").unwrap(), "x");
        assert_eq!(concatenate("", "").unwrap(), "");
    }

    #[test]
    fn test_length_and_affixes() {
        for a in SAMPLES {
            for b in SAMPLES {
                let out = concatenate(a, b).unwrap();
                assert_eq!(out.len(), a.len() + b.len(), "{:?} + {:?}", a, b);
                assert!(out.starts_with(a));
                assert!(out.ends_with(b));
            }
        }
    }

    #[test]
    fn test_empty_operand_is_identity() {
        for s in SAMPLES {
            assert_eq!(concatenate("", s).unwrap(), *s);
            assert_eq!(concatenate(s, "").unwrap(), *s);
        }
    }

    #[test]
    fn test_bytes_are_copied_verbatim() {
        let a = [0xff, 0x00, 0x10];
        let b = [0x00, 0xfe];
        assert_eq!(concatenate_bytes(&a, &b).unwrap(), vec![0xff, 0x00, 0x10, 0x00, 0xfe]);
        assert!(concatenate_bytes(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_reserve_failure_is_reported() {
        let err = reserve_string(usize::MAX).unwrap_err();
        assert_eq!(err, CatError::Allocation { requested: usize::MAX });
    }

    #[test]
    fn test_call_arity() {
        let cat = StringConcatenator::new();
        assert_eq!(cat.call(&["foo", "bar"]).unwrap(), "foobar");

        for args in [&[][..], &["a"][..], &["a", "b", "c"][..]] {
            let err = cat.call(args).unwrap_err();
            assert!(matches!(err, CatError::Argument { .. }));
        }
        insta::assert_snapshot!(cat.call(&["a"]).unwrap_err(), @"cat() takes exactly 2 arguments (1 given)");
    }
}
