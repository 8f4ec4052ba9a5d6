//! Python argument conversion and numpy output.

use numpy::{AllowTypeChange, Element, PyArray1, PyArray2, PyArrayLikeDyn, PyUntypedArray, prelude::*};
use pyo3::{
    prelude::*,
    types::{PyBool, PyByteArray, PyBytes, PyFloat, PyInt, PyList, PyString, PyTuple},
};

use crate::{
    error::Error,
    uniform::{Nested, UniformValue},
};

pub(super) fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .name()
        .map(|name| name.to_string())
        .unwrap_or_else(|_| "object".to_string())
}

/// Whether numpy has been imported. Array type checks go through numpy's C
/// API, so they are skipped until a caller has loaded it.
pub(super) fn numpy_loaded(py: Python<'_>) -> PyResult<bool> {
    py.import("sys")?.getattr("modules")?.contains("numpy")
}

/// Raw bytes of `bytes`, `bytearray`, `str` (UTF-8) or anything with a
/// `tobytes()` method, such as numpy arrays and memoryviews.
pub(super) fn bytes_of(obj: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if let Ok(bytes) = obj.cast::<PyBytes>() {
        return Ok(bytes.as_bytes().to_vec());
    }
    if let Ok(array) = obj.cast::<PyByteArray>() {
        return Ok(array.to_vec());
    }
    if let Ok(text) = obj.cast::<PyString>() {
        return Ok(text.to_str()?.as_bytes().to_vec());
    }
    if obj.hasattr("tobytes")? {
        let bytes = obj.call_method0("tobytes")?.cast_into::<PyBytes>()?;
        return Ok(bytes.as_bytes().to_vec());
    }
    Err(Error::Type(format!("Expected bytes-like data, got '{}'", type_name(obj))).into())
}

/// Resolves a uniform argument: bools and ints become `Int`, floats
/// `Float`, and numpy arrays or nested lists and tuples go by shape.
pub(super) fn uniform_value(obj: &Bound<'_, PyAny>) -> PyResult<UniformValue> {
    if let Ok(flag) = obj.cast::<PyBool>() {
        return Ok(UniformValue::Int(flag.is_true().into()));
    }
    if obj.is_instance_of::<PyInt>() {
        return Ok(UniformValue::int(int_of(obj)?)?);
    }
    if let Ok(float) = obj.cast::<PyFloat>() {
        return Ok(UniformValue::Float(float.value() as f32));
    }
    if numpy_loaded(obj.py())? {
        if let Ok(array) = obj.cast::<PyUntypedArray>() {
            return array_uniform(array);
        }
    }
    if obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>() {
        return Ok(UniformValue::from_nested(&nested(obj)?)?);
    }
    Err(Error::Argument(format!("Cannot use '{}' as a uniform value", type_name(obj))).into())
}

fn int_of(obj: &Bound<'_, PyAny>) -> PyResult<i64> {
    obj.extract::<i64>()
        .map_err(|_| Error::Argument(format!("Uniform integer {obj} out of range")).into())
}

fn array_uniform(array: &Bound<'_, PyUntypedArray>) -> PyResult<UniformValue> {
    let integral = matches!(array.dtype().kind(), b'b' | b'i' | b'u');
    if array.ndim() == 0 && integral {
        return Ok(UniformValue::int(int_of(&array.call_method0("item")?)?)?);
    }
    let shape = array.shape().to_vec();
    let data = array
        .as_any()
        .extract::<PyArrayLikeDyn<'_, f32, AllowTypeChange>>()?;
    let values: Vec<f32> = data.as_array().iter().copied().collect();
    Ok(UniformValue::from_shape(&shape, &values)?)
}

fn nested(obj: &Bound<'_, PyAny>) -> PyResult<Nested> {
    if obj.is_instance_of::<PyList>() || obj.is_instance_of::<PyTuple>() {
        let items = obj
            .try_iter()?
            .map(|item| nested(&item?))
            .collect::<PyResult<Vec<_>>>()?;
        return Ok(Nested::Seq(items));
    }
    let value = obj.extract::<f64>().map_err(|_| {
        Error::Argument(format!("Uniform sequences must hold numbers, not '{}'", type_name(obj)))
    })?;
    Ok(Nested::Scalar(value))
}

/// Rows as an `(N, K)` numpy array.
pub(super) fn rows_array<'py, T: Element + Copy, const K: usize>(
    py: Python<'py>,
    rows: &[[T; K]],
) -> PyResult<Bound<'py, PyArray2<T>>> {
    // Without numpy loaded, the C API lookup below panics.
    py.import("numpy")?;
    PyArray1::from_slice(py, rows.as_flattened()).reshape([rows.len(), K])
}
