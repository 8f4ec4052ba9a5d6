//! The Python `gl` extension module.
//!
//! [`gl`] registers the resource classes, the draw helpers, the GL enum
//! constants and the exception types, and nests the `gl.glfw` and `gl.ai`
//! submodules. Module functions and constructors act on the calling
//! thread's current context: opening a `gl.glfw.Window` sets it, embedders
//! set it with [`make_current`].

mod asset;
mod convert;
mod errors;
mod resources;
mod window;

use std::cell::RefCell;

use pyo3::{prelude::*, types::PyTuple};

pub use asset::{PyMesh, PyNode, PyScene};
pub use errors::{AssetError, CompileError, GLError, LinkError, SizeError, WindowError};
pub use resources::{PyEbo, PyShader, PyTexture2D, PyVao, PyVbo};
pub use window::{PyMonitor, PyWindow, install_window_system};

use crate::{
    context::Context,
    error::{Error, Result},
    native::consts,
    window::Glfw,
};

thread_local! {
    static CURRENT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

/// Makes `ctx` the context module functions and new resources use on this
/// thread.
pub fn make_current(ctx: &Context) {
    CURRENT.with_borrow_mut(|current| *current = Some(ctx.clone()));
}

pub fn current_context() -> Option<Context> {
    CURRENT.with_borrow(Clone::clone)
}

fn context() -> Result<Context> {
    current_context().ok_or_else(|| {
        Error::Window("No current OpenGL context; open a gl.glfw.Window first".to_string())
    })
}

/// Constants registered on the `gl` module.
const CONSTANTS: &[(&str, u32)] = &[
    ("ARRAY_BUFFER", consts::ARRAY_BUFFER),
    ("ELEMENT_ARRAY_BUFFER", consts::ELEMENT_ARRAY_BUFFER),
    ("STATIC_DRAW", consts::STATIC_DRAW),
    ("DYNAMIC_DRAW", consts::DYNAMIC_DRAW),
    ("STREAM_DRAW", consts::STREAM_DRAW),
    ("BYTE", consts::BYTE),
    ("UNSIGNED_BYTE", consts::UNSIGNED_BYTE),
    ("UNSIGNED_SHORT", consts::UNSIGNED_SHORT),
    ("INT", consts::INT),
    ("UNSIGNED_INT", consts::UNSIGNED_INT),
    ("FLOAT", consts::FLOAT),
    ("POINTS", consts::POINTS),
    ("LINES", consts::LINES),
    ("TRIANGLES", consts::TRIANGLES),
    ("TRIANGLE_STRIP", consts::TRIANGLE_STRIP),
    ("TRIANGLE_FAN", consts::TRIANGLE_FAN),
    ("COLOR_BUFFER_BIT", consts::COLOR_BUFFER_BIT),
    ("DEPTH_BUFFER_BIT", consts::DEPTH_BUFFER_BIT),
    ("STENCIL_BUFFER_BIT", consts::STENCIL_BUFFER_BIT),
    ("DEPTH_TEST", consts::DEPTH_TEST),
    ("CULL_FACE", consts::CULL_FACE),
    ("BLEND", consts::BLEND),
    ("RED", consts::RED),
    ("RG", consts::RG),
    ("RGB", consts::RGB),
    ("RGBA", consts::RGBA),
    ("R8", consts::R8),
    ("RGBA8", consts::RGBA8),
    ("TEXTURE_2D", consts::TEXTURE_2D),
    ("NO_ERROR", consts::NO_ERROR),
    ("INVALID_ENUM", consts::INVALID_ENUM),
    ("INVALID_VALUE", consts::INVALID_VALUE),
    ("INVALID_OPERATION", consts::INVALID_OPERATION),
    ("OUT_OF_MEMORY", consts::OUT_OF_MEMORY),
];

/// Clears the buffers selected by `mask`.
#[pyfunction]
#[pyo3(signature = (mask = consts::COLOR_BUFFER_BIT | consts::DEPTH_BUFFER_BIT))]
fn clear(mask: u32) -> PyResult<()> {
    let ctx = context()?;
    ctx.gl().clear(mask);
    Ok(ctx.check()?)
}

/// Sets the clear color from up to four components, defaulting to opaque
/// black.
#[pyfunction]
#[pyo3(signature = (*components))]
fn clear_color(components: &Bound<'_, PyTuple>) -> PyResult<()> {
    if components.len() > 4 {
        return Err(Error::Argument("Expected at most 4 arguments to create color from".to_string()).into());
    }
    let mut rgba = [0.0, 0.0, 0.0, 1.0];
    for (slot, component) in rgba.iter_mut().zip(components.iter()) {
        *slot = component.extract::<f32>()?;
    }
    let ctx = context()?;
    let [r, g, b, a] = rgba;
    ctx.gl().clear_color(r, g, b, a);
    Ok(ctx.check()?)
}

#[pyfunction]
fn viewport(x: i32, y: i32, w: i32, h: i32) -> PyResult<()> {
    let ctx = context()?;
    ctx.gl().viewport(x, y, w, h);
    Ok(ctx.check()?)
}

#[pyfunction]
fn enable(cap: u32) -> PyResult<()> {
    let ctx = context()?;
    ctx.gl().enable(cap);
    Ok(ctx.check()?)
}

#[pyfunction]
fn disable(cap: u32) -> PyResult<()> {
    let ctx = context()?;
    ctx.gl().disable(cap);
    Ok(ctx.check()?)
}

/// Draws `count` vertices of the bound vertex array from `first`.
#[pyfunction]
fn draw_arrays(mode: u32, first: i32, count: i32) -> PyResult<()> {
    let ctx = context()?;
    ctx.gl().draw_arrays(mode, first, count);
    Ok(ctx.check()?)
}

/// Draws indexed primitives from the bound element buffer.
#[pyfunction]
#[pyo3(signature = (mode, count, r#type = consts::UNSIGNED_INT, offset = 0))]
fn draw_elements(mode: u32, count: i32, r#type: u32, offset: i32) -> PyResult<()> {
    let ctx = context()?;
    ctx.gl().draw_elements(mode, count, r#type, offset);
    Ok(ctx.check()?)
}

/// Raises `GLError` if OpenGL reports an error.
#[pyfunction]
fn check() -> PyResult<()> {
    Ok(context()?.check()?)
}

/// Switches this thread to a headless context and window system.
#[pyfunction]
fn headless() {
    let (ctx, _gl) = Context::headless();
    make_current(&ctx);
    let (glfw, _system) = Glfw::headless();
    install_window_system(&glfw);
}

/// Nests `sub` under `parent` and registers it in `sys.modules`, so that
/// `import gl.glfw` works.
fn add_submodule(parent: &Bound<'_, PyModule>, sub: &Bound<'_, PyModule>) -> PyResult<()> {
    parent.add_submodule(sub)?;
    let name = format!("{}.{}", parent.name()?, sub.name()?);
    parent.py().import("sys")?.getattr("modules")?.set_item(name, sub)
}

/// OpenGL, GLFW and asset import bindings.
#[pymodule]
pub fn gl(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyShader>()?;
    m.add_class::<PyVbo>()?;
    m.add_class::<PyEbo>()?;
    m.add_class::<PyVao>()?;
    m.add_class::<PyTexture2D>()?;
    m.add_function(wrap_pyfunction!(clear, m)?)?;
    m.add_function(wrap_pyfunction!(clear_color, m)?)?;
    m.add_function(wrap_pyfunction!(viewport, m)?)?;
    m.add_function(wrap_pyfunction!(enable, m)?)?;
    m.add_function(wrap_pyfunction!(disable, m)?)?;
    m.add_function(wrap_pyfunction!(draw_arrays, m)?)?;
    m.add_function(wrap_pyfunction!(draw_elements, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add_function(wrap_pyfunction!(headless, m)?)?;
    for (name, value) in CONSTANTS {
        m.add(*name, *value)?;
    }
    errors::register(m)?;
    add_submodule(m, &window::module(m.py())?)?;
    add_submodule(m, &asset::module(m.py())?)?;
    Ok(())
}
