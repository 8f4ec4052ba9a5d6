use std::cell::RefCell;

use pyo3::prelude::*;

use crate::{
    bindings::make_current,
    error::{Error, Result},
    window::{Glfw, Monitor, Window},
};

thread_local! {
    static WINDOW_SYSTEM: RefCell<Option<Glfw>> = const { RefCell::new(None) };
}

/// Makes `glfw` the window system `gl.glfw` uses on this thread. Without
/// one, the first use initializes native GLFW.
pub fn install_window_system(glfw: &Glfw) {
    WINDOW_SYSTEM.with_borrow_mut(|system| *system = Some(glfw.clone()));
}

fn window_system() -> Result<Glfw> {
    match WINDOW_SYSTEM.with_borrow(Clone::clone) {
        Some(glfw) => Ok(glfw),
        None => native_window_system(),
    }
}

#[cfg(feature = "glfw")]
fn native_window_system() -> Result<Glfw> {
    let glfw = Glfw::native(crate::Config::from_env())?;
    install_window_system(&glfw);
    Ok(glfw)
}

#[cfg(not(feature = "glfw"))]
fn native_window_system() -> Result<Glfw> {
    Err(Error::Window("Built without GLFW support".to_string()))
}

/// A connected monitor.
#[pyclass(unsendable, name = "Monitor", module = "gl.glfw")]
pub struct PyMonitor(pub Monitor);

#[pymethods]
impl PyMonitor {
    /// Monitor `idx`, or the primary monitor when `idx` is omitted or
    /// negative.
    #[new]
    #[pyo3(signature = (idx = None))]
    fn new(idx: Option<i64>) -> PyResult<Self> {
        let glfw = window_system()?;
        let monitor = match idx.map(usize::try_from) {
            Some(Ok(index)) => Monitor::from_index(&glfw, index)?,
            _ => Monitor::primary(&glfw)?,
        };
        Ok(Self(monitor))
    }

    #[getter]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[getter]
    fn index(&self) -> usize {
        self.0.index()
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// A window with an OpenGL context.
#[pyclass(unsendable, name = "Window", module = "gl.glfw")]
pub struct PyWindow(pub Window);

#[pymethods]
impl PyWindow {
    /// Opens a window (full screen on `monitor` if given) and makes its
    /// context the current one.
    #[new]
    #[pyo3(signature = (name, size, monitor = None))]
    fn new(name: &str, size: Vec<i32>, monitor: Option<PyRef<'_, PyMonitor>>) -> PyResult<Self> {
        let size = match size[..] {
            [width, height] => (width, height),
            _ => {
                return Err(Error::Argument(format!(
                    "Expected 'size' to be a tuple of length 2, got length {}",
                    size.len()
                ))
                .into());
            }
        };
        let glfw = window_system()?;
        let window = Window::new(&glfw, name, size, monitor.as_ref().map(|m| &m.0))?;
        make_current(&window.load_gl()?);
        Ok(Self(window))
    }

    /// Makes this window's context the current one.
    fn make_current(&self) -> PyResult<()> {
        make_current(&self.0.load_gl()?);
        Ok(())
    }

    fn show(&self) -> PyResult<()> {
        Ok(self.0.show()?)
    }

    fn hide(&self) -> PyResult<()> {
        Ok(self.0.hide()?)
    }

    fn swap(&self) -> PyResult<()> {
        Ok(self.0.swap()?)
    }

    fn close(&self) -> PyResult<()> {
        Ok(self.0.set_should_close(true)?)
    }

    #[getter]
    fn size(&self) -> PyResult<(i32, i32)> {
        Ok(self.0.size()?)
    }

    #[getter]
    fn pos(&self) -> PyResult<(i32, i32)> {
        Ok(self.0.pos()?)
    }

    #[getter]
    fn title(&self) -> &str {
        self.0.title()
    }

    /// False once a close request has been polled.
    fn __bool__(&self) -> bool {
        self.0.is_open()
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// Processes pending window events.
#[pyfunction]
fn poll() -> PyResult<()> {
    window_system()?.poll();
    Ok(())
}

/// Seconds since the window system was initialized.
#[pyfunction]
fn time() -> PyResult<f64> {
    Ok(window_system()?.time())
}

pub(super) fn module(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let m = PyModule::new(py, "glfw")?;
    m.add("__doc__", "GLFW windows, monitors and events")?;
    m.add_class::<PyMonitor>()?;
    m.add_class::<PyWindow>()?;
    m.add_function(wrap_pyfunction!(poll, &m)?)?;
    m.add_function(wrap_pyfunction!(time, &m)?)?;
    Ok(m)
}
