//! flow-gl
//!
//! Python bindings for OpenGL, GLFW and 3D asset import. Native objects are
//! wrapped in owned Rust types that release their handles exactly once, and
//! the `bindings` module (feature `python`) exposes them as the `gl`,
//! `gl.glfw` and `gl.ai` modules. Every native library sits behind a trait
//! with a headless implementation, so the whole surface runs without a
//! display.
//!
//! High-level modules
//! - `asset`: scene import (OBJ, glTF) into scenes, nodes and meshes
//! - `bindings`: the Python `gl` extension module
//! - `config`: context version, swap interval and limits
//! - `context`: the GL context resources are created against, handle ownership
//! - `error`: error kinds raised by every operation
//! - `native`: the OpenGL entry points (glow and headless backends)
//! - `resources`: shaders, buffers, vertex arrays and textures
//! - `uniform`: shader uniform values
//! - `window`: window system, monitors and windows
//!

pub mod asset;
#[cfg(feature = "python")]
pub mod bindings;
pub mod config;
pub mod context;
pub mod error;
pub mod native;
pub mod resources;
pub mod uniform;
pub mod window;

// Re-exports commonly used types for convenience in downstream code.
pub use config::Config;
pub use context::{Context, GlHandle};
pub use error::{Error, ErrorKind, Result};
pub use uniform::UniformValue;
