//! Opens a window and draws a pulsing triangle with the resource wrappers.
//! `demos/triangle.py` draws the same through the Python module.
//!
//! Run with `cargo run --example triangle --features glfw`.

use cgmath::Vector3;
use flow_gl::{
    Config,
    native::consts,
    resources::{AttribPointer, Shader, VertexArray, VertexBuffer},
    window::{Glfw, Window},
};

const VERTEX: &str = r#"#version 330 core
layout (location = 0) in vec2 pos;
uniform float scale;
void main() {
    gl_Position = vec4(pos * scale, 0.0, 1.0);
}
"#;

const FRAGMENT: &str = r#"#version 330 core
uniform vec3 tint;
out vec4 color;
void main() {
    color = vec4(tint, 1.0);
}
"#;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let glfw = Glfw::native(Config::from_env())?;
    let window = Window::new(&glfw, "flow-gl triangle", (640, 480), None)?;
    let ctx = window.load_gl()?;

    let shader = Shader::new(&ctx, VERTEX, FRAGMENT)?;
    let vao = VertexArray::new(&ctx)?;
    vao.bind()?;
    let vbo = VertexBuffer::from_slice(&ctx, &[-0.5f32, -0.5, 0.5, -0.5, 0.0, 0.5], consts::STATIC_DRAW)?;
    vbo.bind()?;
    vao.attrib(AttribPointer {
        index: 0,
        size: 2,
        ty: consts::FLOAT,
        normalized: false,
        stride: 0,
        offset: 0,
    })?;

    while window.is_open() {
        let t = glfw.time() as f32;
        ctx.gl().clear_color(0.1, 0.1, 0.12, 1.0);
        ctx.gl().clear(consts::COLOR_BUFFER_BIT | consts::DEPTH_BUFFER_BIT);
        shader.set_uniform("scale", 1.0 + 0.25 * t.sin())?;
        shader.set_uniform("tint", Vector3::new(0.5 + 0.5 * t.cos(), 0.6, 0.5 + 0.5 * t.sin()))?;
        vao.bind()?;
        ctx.gl().draw_arrays(consts::TRIANGLES, 0, 3);
        ctx.check()?;
        window.swap()?;
        glfw.poll();
    }
    Ok(())
}
