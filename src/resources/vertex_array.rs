use std::fmt;

use crate::{
    context::{Context, GlHandle},
    error::Result,
    native::ObjectKind,
};

/// Layout of one vertex attribute in the bound `ARRAY_BUFFER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttribPointer {
    pub index: u32,
    /// Components per vertex, 1 to 4.
    pub size: i32,
    /// Component type (`FLOAT`, ...).
    pub ty: u32,
    pub normalized: bool,
    pub stride: i32,
    /// Byte offset of the first component.
    pub offset: i32,
}

/// A vertex array object.
///
/// Attribute calls act on whichever vertex array is bound, so bind this one
/// first.
#[derive(Debug)]
pub struct VertexArray {
    handle: GlHandle,
}

impl VertexArray {
    pub const TYPE_NAME: &'static str = "gl.VAO";

    pub fn new(ctx: &Context) -> Result<Self> {
        let handle = GlHandle::create(ctx, ObjectKind::VertexArray)?;
        log::debug!("Created {} {}", Self::TYPE_NAME, handle.name().unwrap_or_default());
        Ok(Self { handle })
    }

    pub fn handle(&self) -> Option<u32> {
        self.handle.name()
    }

    pub fn bind(&self) -> Result<()> {
        let name = self.handle.require(Self::TYPE_NAME)?;
        let ctx = self.handle.context();
        ctx.gl().bind_vertex_array(name);
        ctx.check()
    }

    pub fn unbind(&self) -> Result<()> {
        let ctx = self.handle.context();
        ctx.gl().bind_vertex_array(0);
        ctx.check()
    }

    /// Sets the attribute pointer and enables the attribute.
    pub fn attrib(&self, pointer: AttribPointer) -> Result<()> {
        self.handle.require(Self::TYPE_NAME)?;
        let ctx = self.handle.context();
        let gl = ctx.gl();
        gl.vertex_attrib_pointer(
            pointer.index,
            pointer.size,
            pointer.ty,
            pointer.normalized,
            pointer.stride,
            pointer.offset,
        );
        ctx.check()?;
        gl.enable_vertex_attrib_array(pointer.index);
        ctx.check()
    }

    pub fn attrib_enable(&self, index: u32) -> Result<()> {
        self.handle.require(Self::TYPE_NAME)?;
        let ctx = self.handle.context();
        ctx.gl().enable_vertex_attrib_array(index);
        ctx.check()
    }

    pub fn attrib_disable(&self, index: u32) -> Result<()> {
        self.handle.require(Self::TYPE_NAME)?;
        let ctx = self.handle.context();
        ctx.gl().disable_vertex_attrib_array(index);
        ctx.check()
    }

    /// Deletes the vertex array. Later calls are no-ops.
    pub fn destroy(&self) {
        self.handle.release();
    }
}

impl fmt::Display for VertexArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} val={}>", Self::TYPE_NAME, self.handle.name().unwrap_or_default())
    }
}
