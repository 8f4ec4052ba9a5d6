use pyo3::{
    create_exception,
    exceptions::{PyIndexError, PyKeyError, PyRuntimeError, PyTypeError, PyValueError},
    prelude::*,
};

use crate::error::{Error, ErrorKind};

create_exception!(gl, CompileError, PyRuntimeError, "A shader stage failed to compile.");
create_exception!(gl, LinkError, PyRuntimeError, "A shader program failed to link.");
create_exception!(gl, GLError, PyRuntimeError, "OpenGL reported an error code.");
create_exception!(gl, AssetError, PyRuntimeError, "A scene file could not be imported.");
create_exception!(gl, SizeError, PyValueError, "A value has an unsupported size or shape.");
create_exception!(gl, WindowError, PyRuntimeError, "The window system failed.");

impl From<Error> for PyErr {
    fn from(err: Error) -> PyErr {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Compile => CompileError::new_err(message),
            ErrorKind::Link => LinkError::new_err(message),
            ErrorKind::Native => GLError::new_err(message),
            ErrorKind::Import => AssetError::new_err(message),
            ErrorKind::Size => SizeError::new_err(message),
            ErrorKind::Window => WindowError::new_err(message),
            ErrorKind::Type => PyTypeError::new_err(message),
            ErrorKind::Index => PyIndexError::new_err(message),
            ErrorKind::UnknownUniform => PyKeyError::new_err(message),
            ErrorKind::Argument => PyValueError::new_err(message),
        }
    }
}

pub(super) fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("CompileError", py.get_type::<CompileError>())?;
    m.add("LinkError", py.get_type::<LinkError>())?;
    m.add("GLError", py.get_type::<GLError>())?;
    m.add("AssetError", py.get_type::<AssetError>())?;
    m.add("SizeError", py.get_type::<SizeError>())?;
    m.add("WindowError", py.get_type::<WindowError>())?;
    Ok(())
}
