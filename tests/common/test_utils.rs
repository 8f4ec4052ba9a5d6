#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use flow_gl::{
    Context,
    native::HeadlessGl,
    window::{Glfw, HeadlessWindowSystem},
};
#[cfg(feature = "python")]
use pyo3::prelude::*;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Declares a uniform of every shape the dispatch supports.
pub const VERTEX_SRC: &str = r#"#version 330 core
layout (location = 0) in vec3 pos;
uniform mat4 model;
uniform mat3 normal_matrix;
uniform mat2 rotation;
uniform mat2x3 skew;
uniform mat4x3 affine;
uniform vec2 offset;
void main() {
    gl_Position = model * vec4(pos, 1.0);
}
"#;

pub const FRAGMENT_SRC: &str = r#"#version 330 core
uniform float alpha;
uniform int mode;
uniform vec3 tint;
uniform vec4 color;
uniform float weights;
out vec4 frag;
void main() {
    frag = color;
}
"#;

pub const BROKEN_SRC: &str = r#"#version 330 core
#error missing semicolon
"#;

pub struct Headless {
    pub ctx: Context,
    pub gl: Rc<HeadlessGl>,
    pub glfw: Glfw,
    pub windows: Rc<RefCell<HeadlessWindowSystem>>,
}

/// A headless GL context and window system, both current on this thread.
pub fn headless() -> Headless {
    init_logger();
    let (ctx, gl) = Context::headless();
    let (glfw, windows) = Glfw::headless();
    #[cfg(feature = "python")]
    {
        flow_gl::bindings::make_current(&ctx);
        flow_gl::bindings::install_window_system(&glfw);
    }
    Headless {
        ctx,
        gl,
        glfw,
        windows,
    }
}

/// Runs `f` with the `gl` module loaded into the interpreter.
#[cfg(feature = "python")]
pub fn with_gl<R>(f: impl for<'py> FnOnce(Python<'py>, &Bound<'py, PyModule>) -> R) -> R {
    Python::initialize();
    Python::attach(|py| {
        let module = pyo3::wrap_pymodule!(flow_gl::bindings::gl)(py).into_bound(py);
        f(py, &module)
    })
}

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Two quads, each its own object, with normals and texture coordinates.
pub const QUADS_OBJ: &str = "\
o Front
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
o Floor
v -1.0 0.0 -1.0
v 1.0 0.0 -1.0
v 1.0 0.0 1.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vn 0.0 1.0 0.0
f 5/5/2 7/7/2 6/6/2
";

/// One triangle in a node translated by (1, 2, 3); the buffer is embedded
/// as a data URI.
pub const TRIANGLE_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "name": "Stage", "nodes": [0] }],
  "nodes": [{ "name": "Tri", "mesh": 0, "translation": [1.0, 2.0, 3.0] }],
  "meshes": [{
    "name": "Triangle",
    "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
  }],
  "buffers": [{
    "byteLength": 42,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIA"
  }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "accessors": [
    {
      "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
    },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ]
}"#;
