//! Owned OpenGL objects: shader programs, buffers, vertex arrays and 2D
//! textures.
//!
//! Each wrapper holds a [`GlHandle`](crate::context::GlHandle), so the native
//! object is deleted exactly once, by `destroy()` or on drop, and every
//! native call is followed by an error check.

pub mod buffer;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use buffer::{ArrayTarget, Buffer, BufferTarget, ElementBuffer, ElementTarget, VertexBuffer};
pub use shader::Shader;
pub use texture::{Texture2D, TextureImage};
pub use vertex_array::{AttribPointer, VertexArray};
