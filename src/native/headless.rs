//! In-process emulation of the OpenGL object model.
//!
//! [`HeadlessGl`] implements [`GlApi`] without a driver: it hands out object
//! names per object kind, keeps buffer and texture contents in memory,
//! tracks bindings, validates calls the way a core profile context does and
//! records the first error flag for `glGetError`. Shaders "compile" when the
//! source has a `main` function and no `#error` directive; active uniforms
//! are the names declared with the `uniform` qualifier.
//!
//! It also keeps a journal of deletions and uniform calls so tests can
//! assert on what reached the native layer.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
};

use super::{GlApi, MatrixShape, ObjectKind, consts::*, format_components, image_size, type_size};

const MAX_VERTEX_ATTRIBS: u32 = 16;
const MAX_COMBINED_TEXTURE_UNITS: u32 = 32;

/// A uniform upload as it reached the native layer.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformCall {
    /// `glUniform1i`
    Int(i32),
    /// `glUniform{n}f` where `n == values.len()`
    Float(Vec<f32>),
    /// `glUniformMatrix{cols}x{rows}fv`
    Matrix {
        cols: usize,
        rows: usize,
        transpose: bool,
        values: Vec<f32>,
    },
}

/// Snapshot of a texture object's level-0 image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureInfo {
    pub width: i32,
    pub height: i32,
    pub internal_format: i32,
    pub format: u32,
    pub ty: u32,
    pub data: Option<Vec<u8>>,
    pub mipmapped: bool,
    pub parameters: HashMap<u32, i32>,
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Arrays { mode: u32, first: i32, count: i32 },
    Elements { mode: u32, count: i32, ty: u32, offset: i32 },
}

#[derive(Debug)]
struct ShaderObject {
    kind: u32,
    source: String,
    compiled: bool,
    info_log: String,
    delete_pending: bool,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    info_log: String,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
struct BufferObject {
    data: Vec<u8>,
    usage: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AttribPointer {
    size: i32,
    ty: u32,
    normalized: bool,
    stride: i32,
    offset: i32,
    buffer: u32,
}

#[derive(Debug, Default)]
struct VertexArrayObject {
    enabled: BTreeSet<u32>,
    pointers: HashMap<u32, AttribPointer>,
    element_buffer: u32,
}

#[derive(Debug, Default)]
struct State {
    next_names: HashMap<ObjectKind, u32>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashMap<u32, BufferObject>,
    vertex_arrays: HashMap<u32, VertexArrayObject>,
    textures: HashMap<u32, TextureInfo>,

    array_buffer: u32,
    // Element binding while no vertex array is bound.
    loose_element_buffer: u32,
    vertex_array: u32,
    current_program: u32,
    active_unit: u32,
    bound_textures: HashMap<u32, u32>,

    error: u32,
    deletions: Vec<(ObjectKind, u32)>,
    uniform_calls: Vec<(u32, u32, UniformCall)>,
    draw_calls: Vec<DrawCall>,
    clear_color: [f32; 4],
    viewport: [i32; 4],
    capabilities: BTreeSet<u32>,
    link_failure: Option<String>,
}

impl State {
    fn next_name(&mut self, kind: ObjectKind) -> u32 {
        let next = self.next_names.entry(kind).or_insert(1);
        let name = *next;
        *next += 1;
        name
    }

    /// GL keeps the first error until it is queried.
    fn raise(&mut self, code: u32) {
        if self.error == NO_ERROR {
            log::trace!("headless GL raised error {code:#x}");
            self.error = code;
        }
    }

    fn element_buffer(&self) -> u32 {
        if self.vertex_array == 0 {
            return self.loose_element_buffer;
        }
        self.vertex_arrays
            .get(&self.vertex_array)
            .map(|vao| vao.element_buffer)
            .unwrap_or(0)
    }

    fn bound_buffer(&self, target: u32) -> Option<u32> {
        match target {
            ARRAY_BUFFER => Some(self.array_buffer),
            ELEMENT_ARRAY_BUFFER => Some(self.element_buffer()),
            _ => None,
        }
    }

    /// Resolves the buffer bound to `target`, raising the matching error
    /// when the target is unknown or nothing is bound.
    fn target_buffer(&mut self, target: u32) -> Option<u32> {
        match self.bound_buffer(target) {
            None => {
                self.raise(INVALID_ENUM);
                None
            }
            Some(0) => {
                self.raise(INVALID_OPERATION);
                None
            }
            Some(name) => Some(name),
        }
    }

    fn bound_texture(&self) -> u32 {
        self.bound_textures.get(&self.active_unit).copied().unwrap_or(0)
    }

    fn uniform(&mut self, location: u32, call: UniformCall) {
        let program = self.current_program;
        let known = self
            .programs
            .get(&program)
            .is_some_and(|p| (location as usize) < p.uniforms.len());
        if !known {
            self.raise(INVALID_OPERATION);
            return;
        }
        self.uniform_calls.push((program, location, call));
    }
}

/// Software stand-in for a current OpenGL 3.3 core context.
#[derive(Debug, Default)]
pub struct HeadlessGl {
    state: RefCell<State>,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an error flag as if the last native call had failed.
    pub fn raise_error(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    /// Makes the next `link_program` fail with `info_log`.
    pub fn fail_next_link(&self, info_log: impl Into<String>) {
        self.state.borrow_mut().link_failure = Some(info_log.into());
    }

    /// Whether `name` currently refers to a live object of `kind`.
    pub fn is_live(&self, kind: ObjectKind, name: u32) -> bool {
        let state = self.state.borrow();
        match kind {
            ObjectKind::Shader => state.shaders.get(&name).is_some_and(|s| !s.delete_pending),
            ObjectKind::Program => state.programs.contains_key(&name),
            ObjectKind::Buffer => state.buffers.contains_key(&name),
            ObjectKind::VertexArray => state.vertex_arrays.contains_key(&name),
            ObjectKind::Texture => state.textures.contains_key(&name),
        }
    }

    /// Number of live objects of `kind`.
    pub fn live_count(&self, kind: ObjectKind) -> usize {
        let state = self.state.borrow();
        match kind {
            ObjectKind::Shader => state.shaders.values().filter(|s| !s.delete_pending).count(),
            ObjectKind::Program => state.programs.len(),
            ObjectKind::Buffer => state.buffers.len(),
            ObjectKind::VertexArray => state.vertex_arrays.len(),
            ObjectKind::Texture => state.textures.len(),
        }
    }

    /// How many times `glDelete*` was issued for `name`, whether or not it
    /// still referred to a live object.
    pub fn deletions_of(&self, kind: ObjectKind, name: u32) -> usize {
        self.state
            .borrow()
            .deletions
            .iter()
            .filter(|(k, n)| *k == kind && *n == name)
            .count()
    }

    pub fn deletions(&self) -> Vec<(ObjectKind, u32)> {
        self.state.borrow().deletions.clone()
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).map(|b| b.data.clone())
    }

    pub fn buffer_usage(&self, buffer: u32) -> Option<u32> {
        self.state.borrow().buffers.get(&buffer).map(|b| b.usage)
    }

    /// Buffer bound to `ARRAY_BUFFER` or, through the bound vertex array,
    /// `ELEMENT_ARRAY_BUFFER`.
    pub fn bound_buffer(&self, target: u32) -> u32 {
        self.state.borrow().bound_buffer(target).unwrap_or(0)
    }

    pub fn bound_vertex_array(&self) -> u32 {
        self.state.borrow().vertex_array
    }

    pub fn current_program(&self) -> u32 {
        self.state.borrow().current_program
    }

    pub fn active_texture_unit(&self) -> u32 {
        self.state.borrow().active_unit
    }

    /// Texture bound to `TEXTURE_2D` on texture unit `unit` (0-based).
    pub fn bound_texture(&self, unit: u32) -> u32 {
        self.state.borrow().bound_textures.get(&unit).copied().unwrap_or(0)
    }

    pub fn texture_info(&self, texture: u32) -> Option<TextureInfo> {
        self.state.borrow().textures.get(&texture).cloned()
    }

    pub fn enabled_attribs(&self, vertex_array: u32) -> Vec<u32> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .map(|vao| vao.enabled.iter().copied().collect())
            .unwrap_or_default()
    }

    /// `(size, type, stride, offset)` of an attribute pointer.
    pub fn attrib_pointer(&self, vertex_array: u32, index: u32) -> Option<(i32, u32, i32, i32)> {
        self.state
            .borrow()
            .vertex_arrays
            .get(&vertex_array)
            .and_then(|vao| vao.pointers.get(&index))
            .map(|p| (p.size, p.ty, p.stride, p.offset))
    }

    pub fn program_uniforms(&self, program: u32) -> Vec<String> {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.uniforms.clone())
            .unwrap_or_default()
    }

    /// Uniform uploads as `(program, uniform name, call)`, oldest first.
    pub fn uniform_calls(&self) -> Vec<(u32, String, UniformCall)> {
        let state = self.state.borrow();
        state
            .uniform_calls
            .iter()
            .map(|(program, location, call)| {
                let name = state
                    .programs
                    .get(program)
                    .and_then(|p| p.uniforms.get(*location as usize))
                    .cloned()
                    .unwrap_or_default();
                (*program, name, call.clone())
            })
            .collect()
    }

    pub fn last_uniform_call(&self) -> Option<UniformCall> {
        self.state.borrow().uniform_calls.last().map(|(_, _, call)| call.clone())
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.borrow().draw_calls.clone()
    }

    pub fn clear_color_value(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    pub fn viewport_value(&self) -> [i32; 4] {
        self.state.borrow().viewport
    }

    pub fn is_enabled(&self, capability: u32) -> bool {
        self.state.borrow().capabilities.contains(&capability)
    }
}

fn compile(source: &str) -> Result<(), String> {
    for (line, text) in source.lines().enumerate() {
        if let Some(message) = text.trim_start().strip_prefix("#error") {
            return Err(format!("0:{}(1): error: {}", line + 1, message.trim()));
        }
    }
    if !source.contains("void main") {
        return Err("0:1(1): error: no function with name 'main'".to_string());
    }
    Ok(())
}

/// Names declared with the `uniform` storage qualifier, in declaration order.
fn declared_uniforms(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for statement in source.split(';') {
        let tokens: Vec<&str> = statement.split_whitespace().collect();
        if !tokens.contains(&"uniform") {
            continue;
        }
        // Interface blocks and stray qualifiers carry no plain uniform name.
        if statement.contains('{') || statement.contains('}') {
            continue;
        }
        if let Some(last) = tokens.last() {
            let name = last.split('[').next().unwrap_or(last);
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names
}

impl GlApi for HeadlessGl {
    fn get_error(&self) -> u32 {
        std::mem::replace(&mut self.state.borrow_mut().error, NO_ERROR)
    }

    fn create_shader(&self, kind: u32) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        if kind != VERTEX_SHADER && kind != FRAGMENT_SHADER {
            state.raise(INVALID_ENUM);
            return None;
        }
        let name = state.next_name(ObjectKind::Shader);
        state.shaders.insert(
            name,
            ShaderObject {
                kind,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
                delete_pending: false,
            },
        );
        Some(name)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(object) => object.source = source.to_string(),
            None => state.raise(INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(object) => match compile(&object.source) {
                Ok(()) => {
                    object.compiled = true;
                    object.info_log.clear();
                }
                Err(log) => {
                    object.compiled = false;
                    object.info_log = log;
                }
            },
            None => state.raise(INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state.borrow().shaders.get(&shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        state.deletions.push((ObjectKind::Shader, shader));
        if !state.shaders.contains_key(&shader) {
            if shader != 0 {
                state.raise(INVALID_VALUE);
            }
            return;
        }
        let attached = state.programs.values().any(|p| p.attached.contains(&shader));
        if attached {
            if let Some(object) = state.shaders.get_mut(&shader) {
                object.delete_pending = true;
            }
        } else {
            state.shaders.remove(&shader);
        }
    }

    fn create_program(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let name = state.next_name(ObjectKind::Program);
        state.programs.insert(name, ProgramObject::default());
        Some(name)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        if !state.shaders.contains_key(&shader) {
            state.raise(INVALID_VALUE);
            return;
        }
        match state.programs.get_mut(&program) {
            Some(object) if object.attached.contains(&shader) => state.raise(INVALID_OPERATION),
            Some(object) => object.attached.push(shader),
            None => state.raise(INVALID_VALUE),
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        let Some(object) = state.programs.get_mut(&program) else {
            state.raise(INVALID_VALUE);
            return;
        };
        let before = object.attached.len();
        object.attached.retain(|s| *s != shader);
        if object.attached.len() == before {
            state.raise(INVALID_OPERATION);
            return;
        }
        let still_attached = state.programs.values().any(|p| p.attached.contains(&shader));
        if !still_attached && state.shaders.get(&shader).is_some_and(|s| s.delete_pending) {
            state.shaders.remove(&shader);
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            state.raise(INVALID_VALUE);
            return;
        };
        let mut failure = state.link_failure.take();
        let mut uniforms: Vec<String> = Vec::new();
        for kind in [VERTEX_SHADER, FRAGMENT_SHADER] {
            if failure.is_some() {
                break;
            }
            let stage = attached
                .iter()
                .filter_map(|s| state.shaders.get(s))
                .find(|s| s.kind == kind);
            match stage {
                None => {
                    let stage = if kind == VERTEX_SHADER { "vertex" } else { "fragment" };
                    failure = Some(format!("error: program lacks a {stage} shader"));
                }
                Some(s) if !s.compiled => {
                    failure = Some("error: linking with uncompiled shader".to_string());
                }
                Some(s) => {
                    for name in declared_uniforms(&s.source) {
                        if !uniforms.contains(&name) {
                            uniforms.push(name);
                        }
                    }
                }
            }
        }
        if let Some(object) = state.programs.get_mut(&program) {
            match failure {
                None => {
                    object.linked = true;
                    object.info_log.clear();
                    object.uniforms = uniforms;
                }
                Some(log) => {
                    object.linked = false;
                    object.info_log = log;
                    object.uniforms.clear();
                }
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().programs.get(&program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        if program == 0 {
            state.current_program = 0;
            return;
        }
        match state.programs.get(&program) {
            Some(object) if object.linked => state.current_program = program,
            Some(_) => state.raise(INVALID_OPERATION),
            None => state.raise(INVALID_VALUE),
        }
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        state.deletions.push((ObjectKind::Program, program));
        let Some(object) = state.programs.remove(&program) else {
            if program != 0 {
                state.raise(INVALID_VALUE);
            }
            return;
        };
        if state.current_program == program {
            state.current_program = 0;
        }
        for shader in object.attached {
            let still_attached = state.programs.values().any(|p| p.attached.contains(&shader));
            if !still_attached && state.shaders.get(&shader).is_some_and(|s| s.delete_pending) {
                state.shaders.remove(&shader);
            }
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let object = state.programs.get(&program)?;
        object
            .uniforms
            .iter()
            .position(|u| u == name)
            .map(|index| index as u32)
    }

    fn uniform_1_i32(&self, location: u32, x: i32) {
        self.state.borrow_mut().uniform(location, UniformCall::Int(x));
    }

    fn uniform_1_f32(&self, location: u32, x: f32) {
        self.state.borrow_mut().uniform(location, UniformCall::Float(vec![x]));
    }

    fn uniform_2_f32(&self, location: u32, x: f32, y: f32) {
        self.state.borrow_mut().uniform(location, UniformCall::Float(vec![x, y]));
    }

    fn uniform_3_f32(&self, location: u32, x: f32, y: f32, z: f32) {
        self.state.borrow_mut().uniform(location, UniformCall::Float(vec![x, y, z]));
    }

    fn uniform_4_f32(&self, location: u32, x: f32, y: f32, z: f32, w: f32) {
        self.state.borrow_mut().uniform(location, UniformCall::Float(vec![x, y, z, w]));
    }

    fn uniform_matrix_f32(&self, location: u32, shape: MatrixShape, transpose: bool, values: &[f32]) {
        let mut state = self.state.borrow_mut();
        if values.len() != shape.component_count() {
            state.raise(INVALID_VALUE);
            return;
        }
        let (cols, rows) = (shape.cols(), shape.rows());
        state.uniform(
            location,
            UniformCall::Matrix {
                cols,
                rows,
                transpose,
                values: values.to_vec(),
            },
        );
    }

    fn create_buffer(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let name = state.next_name(ObjectKind::Buffer);
        state.buffers.insert(name, BufferObject::default());
        Some(name)
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        let mut state = self.state.borrow_mut();
        if buffer != 0 && !state.buffers.contains_key(&buffer) {
            state.raise(INVALID_OPERATION);
            return;
        }
        match target {
            ARRAY_BUFFER => state.array_buffer = buffer,
            ELEMENT_ARRAY_BUFFER => {
                let vertex_array = state.vertex_array;
                match state.vertex_arrays.get_mut(&vertex_array) {
                    Some(vao) => vao.element_buffer = buffer,
                    None => state.loose_element_buffer = buffer,
                }
            }
            _ => state.raise(INVALID_ENUM),
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        let mut state = self.state.borrow_mut();
        if ![STATIC_DRAW, DYNAMIC_DRAW, STREAM_DRAW].contains(&usage) {
            state.raise(INVALID_ENUM);
            return;
        }
        if let Some(name) = state.target_buffer(target) {
            if let Some(object) = state.buffers.get_mut(&name) {
                object.data = data.to_vec();
                object.usage = usage;
            }
        }
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        let Some(name) = state.target_buffer(target) else {
            return;
        };
        let Ok(offset) = usize::try_from(offset) else {
            state.raise(INVALID_VALUE);
            return;
        };
        let fits = state
            .buffers
            .get(&name)
            .is_some_and(|b| offset.checked_add(data.len()).is_some_and(|end| end <= b.data.len()));
        if !fits {
            state.raise(INVALID_VALUE);
            return;
        }
        if let Some(object) = state.buffers.get_mut(&name) {
            object.data[offset..offset + data.len()].copy_from_slice(data);
        }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: i32, out: &mut [u8]) {
        let mut state = self.state.borrow_mut();
        let Some(name) = state.target_buffer(target) else {
            return;
        };
        let Ok(offset) = usize::try_from(offset) else {
            state.raise(INVALID_VALUE);
            return;
        };
        let source = state.buffers.get(&name).and_then(|b| {
            let end = offset.checked_add(out.len())?;
            b.data.get(offset..end)
        });
        match source {
            Some(bytes) => out.copy_from_slice(bytes),
            None => state.raise(INVALID_VALUE),
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        state.deletions.push((ObjectKind::Buffer, buffer));
        if state.buffers.remove(&buffer).is_none() {
            return;
        }
        if state.array_buffer == buffer {
            state.array_buffer = 0;
        }
        if state.loose_element_buffer == buffer {
            state.loose_element_buffer = 0;
        }
        for vao in state.vertex_arrays.values_mut() {
            if vao.element_buffer == buffer {
                vao.element_buffer = 0;
            }
        }
    }

    fn create_vertex_array(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let name = state.next_name(ObjectKind::VertexArray);
        state.vertex_arrays.insert(name, VertexArrayObject::default());
        Some(name)
    }

    fn bind_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        if vertex_array != 0 && !state.vertex_arrays.contains_key(&vertex_array) {
            state.raise(INVALID_OPERATION);
            return;
        }
        state.vertex_array = vertex_array;
    }

    fn vertex_attrib_pointer(&self, index: u32, size: i32, ty: u32, normalized: bool, stride: i32, offset: i32) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBS || !(1..=4).contains(&size) || stride < 0 {
            state.raise(INVALID_VALUE);
            return;
        }
        if type_size(ty).is_none() {
            state.raise(INVALID_ENUM);
            return;
        }
        let buffer = state.array_buffer;
        if buffer == 0 && offset != 0 {
            state.raise(INVALID_OPERATION);
            return;
        }
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) => {
                vao.pointers.insert(
                    index,
                    AttribPointer {
                        size,
                        ty,
                        normalized,
                        stride,
                        offset,
                        buffer,
                    },
                );
            }
            None => state.raise(INVALID_OPERATION),
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBS {
            state.raise(INVALID_VALUE);
            return;
        }
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) => {
                vao.enabled.insert(index);
            }
            None => state.raise(INVALID_OPERATION),
        }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBS {
            state.raise(INVALID_VALUE);
            return;
        }
        let vertex_array = state.vertex_array;
        match state.vertex_arrays.get_mut(&vertex_array) {
            Some(vao) => {
                vao.enabled.remove(&index);
            }
            None => state.raise(INVALID_OPERATION),
        }
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        state.deletions.push((ObjectKind::VertexArray, vertex_array));
        if state.vertex_arrays.remove(&vertex_array).is_none() {
            return;
        }
        if state.vertex_array == vertex_array {
            state.vertex_array = 0;
        }
    }

    fn create_texture(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let name = state.next_name(ObjectKind::Texture);
        state.textures.insert(name, TextureInfo::default());
        Some(name)
    }

    fn active_texture(&self, unit: u32) {
        let mut state = self.state.borrow_mut();
        match unit.checked_sub(TEXTURE0) {
            Some(index) if index < MAX_COMBINED_TEXTURE_UNITS => state.active_unit = index,
            _ => state.raise(INVALID_ENUM),
        }
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        let mut state = self.state.borrow_mut();
        if target != TEXTURE_2D {
            state.raise(INVALID_ENUM);
            return;
        }
        if texture != 0 && !state.textures.contains_key(&texture) {
            state.raise(INVALID_OPERATION);
            return;
        }
        let unit = state.active_unit;
        state.bound_textures.insert(unit, texture);
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        let mut state = self.state.borrow_mut();
        if target != TEXTURE_2D {
            state.raise(INVALID_ENUM);
            return;
        }
        let texture = state.bound_texture();
        match state.textures.get_mut(&texture) {
            Some(info) => {
                info.parameters.insert(parameter, value);
            }
            None => state.raise(INVALID_OPERATION),
        }
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
        let mut state = self.state.borrow_mut();
        if target != TEXTURE_2D {
            state.raise(INVALID_ENUM);
            return;
        }
        if level < 0 || width < 0 || height < 0 {
            state.raise(INVALID_VALUE);
            return;
        }
        if format_components(format).is_none() || type_size(ty).is_none() {
            state.raise(INVALID_ENUM);
            return;
        }
        let Some(required) = image_size(width, height, format, ty) else {
            state.raise(INVALID_VALUE);
            return;
        };
        if pixels.is_some_and(|p| p.len() < required) {
            state.raise(INVALID_OPERATION);
            return;
        }
        let texture = state.bound_texture();
        let Some(info) = state.textures.get_mut(&texture) else {
            state.raise(INVALID_OPERATION);
            return;
        };
        if level == 0 {
            info.width = width;
            info.height = height;
            info.internal_format = internal_format;
            info.format = format;
            info.ty = ty;
            info.data = pixels.map(|p| p[..required].to_vec());
            info.mipmapped = false;
        }
    }

    fn generate_mipmap(&self, target: u32) {
        let mut state = self.state.borrow_mut();
        if target != TEXTURE_2D {
            state.raise(INVALID_ENUM);
            return;
        }
        let texture = state.bound_texture();
        match state.textures.get_mut(&texture) {
            Some(info) => info.mipmapped = true,
            None => state.raise(INVALID_OPERATION),
        }
    }

    fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.deletions.push((ObjectKind::Texture, texture));
        if state.textures.remove(&texture).is_none() {
            return;
        }
        for bound in state.bound_textures.values_mut() {
            if *bound == texture {
                *bound = 0;
            }
        }
    }

    fn clear(&self, mask: u32) {
        let mut state = self.state.borrow_mut();
        if mask & !(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT | STENCIL_BUFFER_BIT) != 0 {
            state.raise(INVALID_VALUE);
        }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state.borrow_mut().clear_color = [r, g, b, a];
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        if width < 0 || height < 0 {
            state.raise(INVALID_VALUE);
            return;
        }
        state.viewport = [x, y, width, height];
    }

    fn enable(&self, capability: u32) {
        let mut state = self.state.borrow_mut();
        match capability {
            BLEND | CULL_FACE | DEPTH_TEST => {
                state.capabilities.insert(capability);
            }
            _ => state.raise(INVALID_ENUM),
        }
    }

    fn disable(&self, capability: u32) {
        let mut state = self.state.borrow_mut();
        match capability {
            BLEND | CULL_FACE | DEPTH_TEST => {
                state.capabilities.remove(&capability);
            }
            _ => state.raise(INVALID_ENUM),
        }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        let mut state = self.state.borrow_mut();
        if first < 0 || count < 0 {
            state.raise(INVALID_VALUE);
            return;
        }
        if state.current_program == 0 || state.vertex_array == 0 {
            state.raise(INVALID_OPERATION);
            return;
        }
        state.draw_calls.push(DrawCall::Arrays { mode, first, count });
    }

    fn draw_elements(&self, mode: u32, count: i32, ty: u32, offset: i32) {
        let mut state = self.state.borrow_mut();
        if count < 0 {
            state.raise(INVALID_VALUE);
            return;
        }
        if ![UNSIGNED_BYTE, UNSIGNED_SHORT, UNSIGNED_INT].contains(&ty) {
            state.raise(INVALID_ENUM);
            return;
        }
        if state.current_program == 0 || state.vertex_array == 0 || state.element_buffer() == 0 {
            state.raise(INVALID_OPERATION);
            return;
        }
        state.draw_calls.push(DrawCall::Elements { mode, count, ty, offset });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_declared_uniforms() {
        let source = "#version 330 core\nuniform mat4 u_model;\nuniform highp vec3 u_light[4];\nin vec3 pos;\nvoid main() {}";
        assert_eq!(declared_uniforms(source), vec!["u_model", "u_light"]);
    }

    #[test]
    fn error_directive_fails_compilation() {
        let log = compile("void main() {}\n#error broken on purpose").unwrap_err();
        assert!(log.contains("0:2(1)"));
        assert!(log.contains("broken on purpose"));
    }

    #[test]
    fn names_count_up_per_object_kind() {
        let gl = HeadlessGl::new();
        assert_eq!(gl.create_buffer(), Some(1));
        assert_eq!(gl.create_buffer(), Some(2));
        assert_eq!(gl.create_texture(), Some(1));
        assert_eq!(gl.create_vertex_array(), Some(1));
    }

    #[test]
    fn short_pixel_data_is_rejected() {
        let gl = HeadlessGl::new();
        let texture = gl.create_texture().unwrap();
        gl.bind_texture(TEXTURE_2D, texture);
        gl.tex_image_2d(TEXTURE_2D, 0, RGBA as i32, 64, 64, RGBA, UNSIGNED_BYTE, Some(&[0; 4]));
        assert_eq!(gl.get_error(), INVALID_OPERATION);
        assert_eq!(gl.texture_info(texture).unwrap().width, 0);
    }

    #[test]
    fn keeps_first_error_until_queried() {
        let gl = HeadlessGl::new();
        gl.bind_buffer(ARRAY_BUFFER, 42);
        gl.viewport(0, 0, -1, 1);
        assert_eq!(gl.get_error(), INVALID_OPERATION);
        assert_eq!(gl.get_error(), NO_ERROR);
    }
}
