//! [`GlApi`] over a loader-backed `glow::Context`.
//!
//! Every call here is a direct driver call; the context must be current on
//! the calling thread (see `Window::load_gl`).

#![cfg(not(target_arch = "wasm32"))]

use std::num::NonZeroU32;

use glow::HasContext;

use super::{GlApi, MatrixShape};

fn object<T>(id: u32, wrap: fn(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(id).map(wrap)
}

fn location(id: u32) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(id)
}

impl GlApi for glow::Context {
    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn create_shader(&self, kind: u32) -> Option<u32> {
        match unsafe { HasContext::create_shader(self, kind) } {
            Ok(shader) => Some(shader.0.get()),
            Err(e) => {
                log::error!("glCreateShader failed: {e}");
                None
            }
        }
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(shader) = object(shader, glow::NativeShader) {
            unsafe { HasContext::shader_source(self, shader, source) }
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(shader) = object(shader, glow::NativeShader) {
            unsafe { HasContext::compile_shader(self, shader) }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        object(shader, glow::NativeShader)
            .map(|shader| unsafe { self.get_shader_compile_status(shader) })
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        object(shader, glow::NativeShader)
            .map(|shader| unsafe { self.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        if let Some(shader) = object(shader, glow::NativeShader) {
            unsafe { HasContext::delete_shader(self, shader) }
        }
    }

    fn create_program(&self) -> Option<u32> {
        match unsafe { HasContext::create_program(self) } {
            Ok(program) => Some(program.0.get()),
            Err(e) => {
                log::error!("glCreateProgram failed: {e}");
                None
            }
        }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (
            object(program, glow::NativeProgram),
            object(shader, glow::NativeShader),
        ) {
            unsafe { HasContext::attach_shader(self, program, shader) }
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let (Some(program), Some(shader)) = (
            object(program, glow::NativeProgram),
            object(shader, glow::NativeShader),
        ) {
            unsafe { HasContext::detach_shader(self, program, shader) }
        }
    }

    fn link_program(&self, program: u32) {
        if let Some(program) = object(program, glow::NativeProgram) {
            unsafe { HasContext::link_program(self, program) }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        object(program, glow::NativeProgram)
            .map(|program| unsafe { self.get_program_link_status(program) })
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: u32) -> String {
        object(program, glow::NativeProgram)
            .map(|program| unsafe { self.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn use_program(&self, program: u32) {
        unsafe { HasContext::use_program(self, object(program, glow::NativeProgram)) }
    }

    fn delete_program(&self, program: u32) {
        if let Some(program) = object(program, glow::NativeProgram) {
            unsafe { HasContext::delete_program(self, program) }
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let program = object(program, glow::NativeProgram)?;
        unsafe { self.get_uniform_location(program, name) }.map(|location| location.0)
    }

    fn uniform_1_i32(&self, location_id: u32, x: i32) {
        unsafe { HasContext::uniform_1_i32(self, Some(&location(location_id)), x) }
    }

    fn uniform_1_f32(&self, location_id: u32, x: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(&location(location_id)), x) }
    }

    fn uniform_2_f32(&self, location_id: u32, x: f32, y: f32) {
        unsafe { HasContext::uniform_2_f32(self, Some(&location(location_id)), x, y) }
    }

    fn uniform_3_f32(&self, location_id: u32, x: f32, y: f32, z: f32) {
        unsafe { HasContext::uniform_3_f32(self, Some(&location(location_id)), x, y, z) }
    }

    fn uniform_4_f32(&self, location_id: u32, x: f32, y: f32, z: f32, w: f32) {
        unsafe { HasContext::uniform_4_f32(self, Some(&location(location_id)), x, y, z, w) }
    }

    fn uniform_matrix_f32(&self, location_id: u32, shape: MatrixShape, transpose: bool, values: &[f32]) {
        let loc = location(location_id);
        let loc = Some(&loc);
        unsafe {
            match shape {
                MatrixShape::Mat2 => self.uniform_matrix_2_f32_slice(loc, transpose, values),
                MatrixShape::Mat3 => self.uniform_matrix_3_f32_slice(loc, transpose, values),
                MatrixShape::Mat4 => self.uniform_matrix_4_f32_slice(loc, transpose, values),
                MatrixShape::Mat2x3 => self.uniform_matrix_2x3_f32_slice(loc, transpose, values),
                MatrixShape::Mat2x4 => self.uniform_matrix_2x4_f32_slice(loc, transpose, values),
                MatrixShape::Mat3x2 => self.uniform_matrix_3x2_f32_slice(loc, transpose, values),
                MatrixShape::Mat3x4 => self.uniform_matrix_3x4_f32_slice(loc, transpose, values),
                MatrixShape::Mat4x2 => self.uniform_matrix_4x2_f32_slice(loc, transpose, values),
                MatrixShape::Mat4x3 => self.uniform_matrix_4x3_f32_slice(loc, transpose, values),
            }
        }
    }

    fn create_buffer(&self) -> Option<u32> {
        match unsafe { HasContext::create_buffer(self) } {
            Ok(buffer) => Some(buffer.0.get()),
            Err(e) => {
                log::error!("glGenBuffers failed: {e}");
                None
            }
        }
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        unsafe { HasContext::bind_buffer(self, target, object(buffer, glow::NativeBuffer)) }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        unsafe { self.buffer_data_u8_slice(target, data, usage) }
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: i32, out: &mut [u8]) {
        unsafe { HasContext::get_buffer_sub_data(self, target, offset, out) }
    }

    fn delete_buffer(&self, buffer: u32) {
        if let Some(buffer) = object(buffer, glow::NativeBuffer) {
            unsafe { HasContext::delete_buffer(self, buffer) }
        }
    }

    fn create_vertex_array(&self) -> Option<u32> {
        match unsafe { HasContext::create_vertex_array(self) } {
            Ok(vertex_array) => Some(vertex_array.0.get()),
            Err(e) => {
                log::error!("glGenVertexArrays failed: {e}");
                None
            }
        }
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        unsafe {
            HasContext::bind_vertex_array(self, object(vertex_array, glow::NativeVertexArray))
        }
    }

    fn vertex_attrib_pointer(&self, index: u32, size: i32, ty: u32, normalized: bool, stride: i32, offset: i32) {
        unsafe { self.vertex_attrib_pointer_f32(index, size, ty, normalized, stride, offset) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::disable_vertex_attrib_array(self, index) }
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        if let Some(vertex_array) = object(vertex_array, glow::NativeVertexArray) {
            unsafe { HasContext::delete_vertex_array(self, vertex_array) }
        }
    }

    fn create_texture(&self) -> Option<u32> {
        match unsafe { HasContext::create_texture(self) } {
            Ok(texture) => Some(texture.0.get()),
            Err(e) => {
                log::error!("glGenTextures failed: {e}");
                None
            }
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) }
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        unsafe { HasContext::bind_texture(self, target, object(texture, glow::NativeTexture)) }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, parameter, value) }
    }

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
    ) {
        unsafe {
            // Rows are tightly packed.
            HasContext::pixel_store_i32(self, glow::UNPACK_ALIGNMENT, 1);
            HasContext::tex_image_2d(
                self,
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                pixels,
            )
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { HasContext::generate_mipmap(self, target) }
    }

    fn delete_texture(&self, texture: u32) {
        if let Some(texture) = object(texture, glow::NativeTexture) {
            unsafe { HasContext::delete_texture(self, texture) }
        }
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn enable(&self, capability: u32) {
        unsafe { HasContext::enable(self, capability) }
    }

    fn disable(&self, capability: u32) {
        unsafe { HasContext::disable(self, capability) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, mode, first, count) }
    }

    fn draw_elements(&self, mode: u32, count: i32, ty: u32, offset: i32) {
        unsafe { HasContext::draw_elements(self, mode, count, ty, offset) }
    }
}
