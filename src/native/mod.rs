//! The native OpenGL surface the bindings are written against.
//!
//! [`GlApi`] lists exactly the entry points the wrappers use, with integer
//! object names the way OpenGL hands them out. Two backends implement it:
//!
//! - `glow::Context`, a loader-backed context created from a live window
//! - [`HeadlessGl`], an in-process emulation of the object model used for
//!   tests and tooling where no display is available
//!
//! All methods take `&self` because OpenGL state is owned by the driver,
//! not by the Rust value.

pub mod glow_backend;
pub mod headless;

pub use headless::{HeadlessGl, UniformCall};

/// OpenGL enum values accepted by the wrappers.
pub mod consts {
    pub use glow::{
        ARRAY_BUFFER, BLEND, BYTE, CLAMP_TO_EDGE, COLOR_BUFFER_BIT, COMPILE_STATUS, CULL_FACE,
        DEPTH_BUFFER_BIT, DEPTH_TEST, DYNAMIC_DRAW, ELEMENT_ARRAY_BUFFER, FLOAT, FRAGMENT_SHADER,
        INT, INVALID_ENUM, INVALID_OPERATION, INVALID_VALUE, LINEAR, LINEAR_MIPMAP_LINEAR, LINES,
        LINK_STATUS, NEAREST, NO_ERROR, OUT_OF_MEMORY, POINTS, R8, RED, REPEAT, RG, RGB, RGBA, RGBA8,
        STATIC_DRAW, STENCIL_BUFFER_BIT, STREAM_DRAW, TEXTURE0, TEXTURE_2D, TEXTURE_MAG_FILTER,
        TEXTURE_MIN_FILTER, TEXTURE_WRAP_S, TEXTURE_WRAP_T, TRIANGLE_FAN, TRIANGLE_STRIP,
        TRIANGLES, UNSIGNED_BYTE, UNSIGNED_INT, UNSIGNED_SHORT, VERTEX_SHADER,
    };
}

/// Color components per pixel for a client pixel `format`.
pub fn format_components(format: u32) -> Option<usize> {
    use consts::*;
    match format {
        RED => Some(1),
        RG => Some(2),
        RGB => Some(3),
        RGBA => Some(4),
        _ => None,
    }
}

/// Size in bytes of one component of type `ty`.
pub fn type_size(ty: u32) -> Option<usize> {
    use consts::*;
    match ty {
        UNSIGNED_BYTE | BYTE => Some(1),
        UNSIGNED_SHORT => Some(2),
        UNSIGNED_INT | INT | FLOAT => Some(4),
        _ => None,
    }
}

/// Bytes `glTexImage2D` reads for a tightly packed `width`x`height` image,
/// or `None` for unknown enums, negative sizes or overflow.
pub fn image_size(width: i32, height: i32, format: u32, ty: u32) -> Option<usize> {
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    format_components(format)?
        .checked_mul(type_size(ty)?)?
        .checked_mul(width)?
        .checked_mul(height)
}

/// The kinds of OpenGL objects the wrappers own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Shader,
    Program,
    Buffer,
    VertexArray,
    Texture,
}

impl ObjectKind {
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Shader => "shader",
            ObjectKind::Program => "program",
            ObjectKind::Buffer => "buffer",
            ObjectKind::VertexArray => "vertex array",
            ObjectKind::Texture => "texture",
        }
    }
}

/// Dimensions of a uniform matrix, named `MatCxR` after GLSL's `matCxR`
/// (`cols` columns, `rows` rows).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatrixShape {
    Mat2,
    Mat3,
    Mat4,
    Mat2x3,
    Mat2x4,
    Mat3x2,
    Mat3x4,
    Mat4x2,
    Mat4x3,
}

impl MatrixShape {
    /// `None` unless both dimensions are in `2..=4`.
    pub fn new(cols: usize, rows: usize) -> Option<Self> {
        use MatrixShape::*;
        Some(match (cols, rows) {
            (2, 2) => Mat2,
            (3, 3) => Mat3,
            (4, 4) => Mat4,
            (2, 3) => Mat2x3,
            (2, 4) => Mat2x4,
            (3, 2) => Mat3x2,
            (3, 4) => Mat3x4,
            (4, 2) => Mat4x2,
            (4, 3) => Mat4x3,
            _ => return None,
        })
    }

    pub fn cols(self) -> usize {
        use MatrixShape::*;
        match self {
            Mat2 | Mat2x3 | Mat2x4 => 2,
            Mat3 | Mat3x2 | Mat3x4 => 3,
            Mat4 | Mat4x2 | Mat4x3 => 4,
        }
    }

    pub fn rows(self) -> usize {
        use MatrixShape::*;
        match self {
            Mat2 | Mat3x2 | Mat4x2 => 2,
            Mat3 | Mat2x3 | Mat4x3 => 3,
            Mat4 | Mat2x4 | Mat3x4 => 4,
        }
    }

    pub fn component_count(self) -> usize {
        self.cols() * self.rows()
    }
}

/// The subset of OpenGL 3.3 used by the resource wrappers.
///
/// Object names are plain `u32`s; `0` is never a valid object and binding
/// `0` unbinds. `create_*` returns `None` when the driver refuses to
/// allocate a name.
pub trait GlApi {
    /// `glGetError`: returns and clears the oldest recorded error flag.
    fn get_error(&self) -> u32;

    fn create_shader(&self, kind: u32) -> Option<u32>;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> Option<u32>;
    fn attach_shader(&self, program: u32, shader: u32);
    fn detach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);
    fn delete_program(&self, program: u32);

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;
    fn uniform_1_i32(&self, location: u32, x: i32);
    fn uniform_1_f32(&self, location: u32, x: f32);
    fn uniform_2_f32(&self, location: u32, x: f32, y: f32);
    fn uniform_3_f32(&self, location: u32, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&self, location: u32, x: f32, y: f32, z: f32, w: f32);
    /// `glUniformMatrix{cols}x{rows}fv` (square forms when equal) for a
    /// single matrix.
    fn uniform_matrix_f32(&self, location: u32, shape: MatrixShape, transpose: bool, values: &[f32]);

    fn create_buffer(&self) -> Option<u32>;
    fn bind_buffer(&self, target: u32, buffer: u32);
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);
    fn get_buffer_sub_data(&self, target: u32, offset: i32, out: &mut [u8]);
    fn delete_buffer(&self, buffer: u32);

    fn create_vertex_array(&self) -> Option<u32>;
    fn bind_vertex_array(&self, vertex_array: u32);
    fn vertex_attrib_pointer(&self, index: u32, size: i32, ty: u32, normalized: bool, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn disable_vertex_attrib_array(&self, index: u32);
    fn delete_vertex_array(&self, vertex_array: u32);

    fn create_texture(&self) -> Option<u32>;
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: u32);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    fn generate_mipmap(&self, target: u32);
    fn delete_texture(&self, texture: u32);

    fn clear(&self, mask: u32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn enable(&self, capability: u32);
    fn disable(&self, capability: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
    fn draw_elements(&self, mode: u32, count: i32, ty: u32, offset: i32);
}
