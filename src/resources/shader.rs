use std::fmt;

use crate::{
    context::{Context, GlHandle},
    error::{Error, Result, ShaderStage},
    native::{ObjectKind, consts},
    uniform::UniformValue,
};

/// A linked vertex + fragment shader program.
#[derive(Debug)]
pub struct Shader {
    program: GlHandle,
}

impl Shader {
    pub const TYPE_NAME: &'static str = "gl.Shader";

    /// Compiles both stages and links them.
    ///
    /// Stage objects never outlive this call, and no program is left behind
    /// when compiling or linking fails.
    pub fn new(ctx: &Context, vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let vertex = compile_stage(ctx, ShaderStage::Vertex, vertex_src)?;
        let fragment = compile_stage(ctx, ShaderStage::Fragment, fragment_src)?;
        let program = link(ctx, &[&vertex, &fragment])?;
        log::debug!("Linked shader program {}", program.name().unwrap_or_default());
        Ok(Self { program })
    }

    pub fn handle(&self) -> Option<u32> {
        self.program.name()
    }

    pub fn context(&self) -> &Context {
        self.program.context()
    }

    /// Makes this the current program.
    pub fn use_program(&self) -> Result<()> {
        let program = self.program.require(Self::TYPE_NAME)?;
        let ctx = self.program.context();
        ctx.gl().use_program(program);
        ctx.check()
    }

    /// Uploads `value` to the active uniform `name`, making the program
    /// current first. Malformed values fail before any native call.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        let value = value.into();
        value.validate()?;
        let program = self.program.require(Self::TYPE_NAME)?;
        let ctx = self.program.context();
        let location = ctx
            .gl()
            .uniform_location(program, name)
            .ok_or_else(|| Error::UnknownUniform(name.to_string()))?;
        ctx.gl().use_program(program);
        value.apply(ctx.gl(), location)?;
        ctx.check()
    }

    /// Deletes the program. Later calls are no-ops.
    pub fn destroy(&self) {
        self.program.release();
    }
}

impl fmt::Display for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} val={}>", Self::TYPE_NAME, self.program.name().unwrap_or_default())
    }
}

fn compile_stage(ctx: &Context, stage: ShaderStage, source: &str) -> Result<GlHandle> {
    let kind = match stage {
        ShaderStage::Vertex => consts::VERTEX_SHADER,
        ShaderStage::Fragment => consts::FRAGMENT_SHADER,
    };
    let shader = GlHandle::create_shader(ctx, kind)?;
    let name = shader.require("shader")?;
    let gl = ctx.gl();
    gl.shader_source(name, source);
    gl.compile_shader(name);
    if !gl.shader_compile_status(name) {
        let log = truncate_log(gl.shader_info_log(name), ctx.config().info_log_max);
        log::warn!("Compiling {stage} shader failed: {log}");
        return Err(Error::Compile { stage, log });
    }
    Ok(shader)
}

fn link(ctx: &Context, stages: &[&GlHandle]) -> Result<GlHandle> {
    let program = GlHandle::create(ctx, ObjectKind::Program)?;
    let name = program.require(Shader::TYPE_NAME)?;
    let gl = ctx.gl();
    let stage_names: Vec<u32> = stages.iter().filter_map(|s| s.name()).collect();
    for stage in &stage_names {
        gl.attach_shader(name, *stage);
    }
    gl.link_program(name);
    // A linked program keeps its binaries; the stages can go now.
    for stage in &stage_names {
        gl.detach_shader(name, *stage);
    }
    if !gl.program_link_status(name) {
        let log = truncate_log(gl.program_info_log(name), ctx.config().info_log_max);
        log::warn!("Linking shader failed: {log}");
        return Err(Error::Link(log));
    }
    Ok(program)
}

/// Trims trailing NULs/whitespace and caps the log at `max` bytes.
fn truncate_log(mut log: String, max: usize) -> String {
    let trimmed = log.trim_end_matches(['\0', '\n', '\r', ' ']).len();
    log.truncate(trimmed);
    if log.len() > max {
        let mut end = max;
        while !log.is_char_boundary(end) {
            end -= 1;
        }
        log.truncate(end);
    }
    log
}
