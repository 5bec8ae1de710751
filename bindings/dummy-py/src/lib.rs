//!
//! dummy - CPython Extension Module
//!
//! Exposes `dummy.cat(a, b)` (alias `dummy.concatenate`). Arguments are
//! checked while holding the GIL; the copy itself only touches memory owned
//! by the call, so it runs inside `allow_threads` and other Python threads
//! keep running meanwhile.
//!
//! Errors:
//! - `dummy.ArgumentError` (a `ValueError`): wrong arity, keyword arguments,
//!   or a non-`str` argument
//! - `dummy.AllocationError` (a `MemoryError`): the result could not be allocated
//!

use pyo3::create_exception;
use pyo3::exceptions::{PyMemoryError, PyValueError};
use pyo3::ffi;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString, PyTuple};

use dummy_strings::{concatenate, CatError};

create_exception!(dummy, ArgumentError, PyValueError, "cat() received arguments it cannot concatenate.");
create_exception!(dummy, AllocationError, PyMemoryError, "cat() could not allocate its result.");

fn to_py_err(err: CatError) -> PyErr {
    match err {
        CatError::Argument { .. } => ArgumentError::new_err(err.to_string()),
        CatError::Allocation { .. } => AllocationError::new_err(err.to_string()),
    }
}

fn string_arg<'py>(args: &Bound<'py, PyTuple>, index: usize) -> PyResult<Bound<'py, PyString>> {
    let item = args.get_item(index)?;
    if let Ok(s) = item.downcast::<PyString>() {
        return Ok(s.clone());
    }
    let type_name = item.get_type().name()?;
    tracing::debug!(position = index + 1, %type_name, "rejecting non-str argument");
    Err(to_py_err(CatError::argument(format!(
        "cat() argument {} must be str, not {}",
        index + 1,
        type_name
    ))))
}

/// Build the Python result from the concatenated buffer.
///
/// A failed `str` allocation surfaces as `AllocationError` rather than the
/// panic of the infallible conversion.
fn into_py_string<'py>(py: Python<'py>, s: &str) -> PyResult<Bound<'py, PyString>> {
    let allocation_failed = || to_py_err(CatError::Allocation { requested: s.len() });
    let len = ffi::Py_ssize_t::try_from(s.len()).map_err(|_| allocation_failed())?;
    unsafe {
        let raw = ffi::PyUnicode_FromStringAndSize(s.as_ptr().cast(), len);
        Bound::from_owned_ptr_or_err(py, raw)
            .map(|obj| obj.downcast_into_unchecked::<PyString>())
            .map_err(|err| {
                if err.is_instance_of::<PyMemoryError>(py) {
                    allocation_failed()
                } else {
                    err
                }
            })
    }
}

/// Concatenate two strings.
#[pyfunction]
#[pyo3(signature = (*args, **kwargs))]
fn cat<'py>(
    py: Python<'py>,
    args: &Bound<'py, PyTuple>,
    kwargs: Option<&Bound<'py, PyDict>>,
) -> PyResult<Bound<'py, PyString>> {
    if kwargs.is_some_and(|kwargs| !kwargs.is_empty()) {
        return Err(to_py_err(CatError::argument("cat() takes no keyword arguments")));
    }
    if args.len() != 2 {
        return Err(to_py_err(CatError::arity(args.len())));
    }
    let a = string_arg(args, 0)?;
    let b = string_arg(args, 1)?;

    // Strings with lone surrogates have no UTF-8 form.
    let a = a
        .to_cow()
        .map_err(|err| to_py_err(CatError::argument(format!("cat() argument 1: {}", err))))?;
    let b = b
        .to_cow()
        .map_err(|err| to_py_err(CatError::argument(format!("cat() argument 2: {}", err))))?;

    let joined = py.allow_threads(|| concatenate(&a, &b)).map_err(to_py_err)?;
    into_py_string(py, &joined)
}

/// Python module definition.
#[pymodule]
fn dummy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(cat, m)?)?;
    m.add("concatenate", m.getattr("cat")?)?;

    m.add("ArgumentError", m.py().get_type::<ArgumentError>())?;
    m.add("AllocationError", m.py().get_type::<AllocationError>())?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
