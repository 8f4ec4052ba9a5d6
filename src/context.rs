//! The GL context every resource is created against, and handle ownership.
//!
//! OpenGL keeps its bindings and object namespaces per context. Instead of
//! treating that as ambient global state, a [`Context`] is passed to every
//! constructor and each resource keeps a clone of it, so two contexts (two
//! headless instances in a test, say) never see each other's objects.
//!
//! [`GlHandle`] is the owned form of an object name: it is released at most
//! once, either explicitly through [`GlHandle::release`] or on drop.

use std::{cell::Cell, fmt, rc::Rc};

use crate::{
    config::Config,
    error::{Error, Result},
    native::{GlApi, HeadlessGl, ObjectKind, consts},
};

#[derive(Clone)]
pub struct Context {
    gl: Rc<dyn GlApi>,
    config: Rc<Config>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("gl", &Rc::as_ptr(&self.gl))
            .field("config", &self.config)
            .finish()
    }
}

impl Context {
    pub fn new(gl: impl GlApi + 'static) -> Self {
        Self::from_shared(Rc::new(gl), Config::default())
    }

    /// Wraps an already shared backend, e.g. a [`HeadlessGl`] the caller
    /// keeps a handle to for inspection.
    pub fn from_shared(gl: Rc<dyn GlApi>, config: Config) -> Self {
        Self {
            gl,
            config: Rc::new(config),
        }
    }

    /// A context backed by [`HeadlessGl`], returned alongside it.
    pub fn headless() -> (Self, Rc<HeadlessGl>) {
        Self::headless_with_config(Config::default())
    }

    pub fn headless_with_config(config: Config) -> (Self, Rc<HeadlessGl>) {
        let gl = Rc::new(HeadlessGl::new());
        (Self::from_shared(gl.clone(), config), gl)
    }

    pub fn gl(&self) -> &dyn GlApi {
        self.gl.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn same_context(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.gl, &other.gl)
    }

    /// Queries the native error flag. A non-zero code becomes
    /// [`Error::Native`]; zero is a silent success.
    pub fn check(&self) -> Result<()> {
        match self.gl.get_error() {
            consts::NO_ERROR => Ok(()),
            code => {
                log::debug!("OpenGL reported error {code:#x}");
                Err(Error::Native(code))
            }
        }
    }

    /// The error for a `glGen*`/`glCreate*` that handed out no name.
    fn allocation_error(&self, kind: ObjectKind) -> Error {
        let code = match self.gl.get_error() {
            consts::NO_ERROR => consts::OUT_OF_MEMORY,
            code => code,
        };
        log::error!("Could not allocate a {} object (error {code:#x})", kind.name());
        Error::Native(code)
    }
}

/// An owned OpenGL object name.
///
/// `None` means nothing is left to release: either the object was never
/// assigned or it has been deleted already.
pub struct GlHandle {
    ctx: Context,
    kind: ObjectKind,
    name: Cell<Option<u32>>,
}

impl fmt::Debug for GlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlHandle")
            .field("kind", &self.kind)
            .field("name", &self.name.get())
            .finish()
    }
}

impl GlHandle {
    /// Generates a program, buffer, vertex array or texture name.
    pub(crate) fn create(ctx: &Context, kind: ObjectKind) -> Result<Self> {
        let gl = ctx.gl();
        let name = match kind {
            ObjectKind::Program => gl.create_program(),
            ObjectKind::Buffer => gl.create_buffer(),
            ObjectKind::VertexArray => gl.create_vertex_array(),
            ObjectKind::Texture => gl.create_texture(),
            ObjectKind::Shader => return Self::create_shader(ctx, consts::VERTEX_SHADER),
        };
        match name {
            Some(name) => Ok(Self::adopt(ctx, kind, name)),
            None => Err(ctx.allocation_error(kind)),
        }
    }

    /// Creates a shader object of the given stage (`VERTEX_SHADER`, ...).
    pub(crate) fn create_shader(ctx: &Context, stage: u32) -> Result<Self> {
        match ctx.gl().create_shader(stage) {
            Some(name) => Ok(Self::adopt(ctx, ObjectKind::Shader, name)),
            None => Err(ctx.allocation_error(ObjectKind::Shader)),
        }
    }

    pub(crate) fn adopt(ctx: &Context, kind: ObjectKind, name: u32) -> Self {
        log::trace!("Acquired {} {name}", kind.name());
        Self {
            ctx: ctx.clone(),
            kind,
            name: Cell::new(Some(name)),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The object name, or `None` once released.
    pub fn name(&self) -> Option<u32> {
        self.name.get()
    }

    /// The object name, failing for a released handle.
    pub(crate) fn require(&self, type_name: &str) -> Result<u32> {
        self.name
            .get()
            .ok_or_else(|| Error::Argument(format!("'{type_name}' has already been destroyed")))
    }

    /// Deletes the native object if one is still held. Returns whether a
    /// deletion was issued.
    pub fn release(&self) -> bool {
        let Some(name) = self.name.take() else {
            return false;
        };
        let gl = self.ctx.gl();
        match self.kind {
            ObjectKind::Shader => gl.delete_shader(name),
            ObjectKind::Program => gl.delete_program(name),
            ObjectKind::Buffer => gl.delete_buffer(name),
            ObjectKind::VertexArray => gl.delete_vertex_array(name),
            ObjectKind::Texture => gl.delete_texture(name),
        }
        log::trace!("Released {} {name}", self.kind.name());
        true
    }
}

impl Drop for GlHandle {
    fn drop(&mut self) {
        self.release();
    }
}
