use std::{cell::Cell, fmt, marker::PhantomData};

use crate::{
    context::{Context, GlHandle},
    error::{Error, Result},
    native::{ObjectKind, consts},
};

/// The binding point a [`Buffer`] is used on.
pub trait BufferTarget: 'static {
    const TARGET: u32;
    const TYPE_NAME: &'static str;
}

#[derive(Debug)]
pub enum ArrayTarget {}

impl BufferTarget for ArrayTarget {
    const TARGET: u32 = consts::ARRAY_BUFFER;
    const TYPE_NAME: &'static str = "gl.VBO";
}

#[derive(Debug)]
pub enum ElementTarget {}

impl BufferTarget for ElementTarget {
    const TARGET: u32 = consts::ELEMENT_ARRAY_BUFFER;
    const TYPE_NAME: &'static str = "gl.EBO";
}

/// Vertex attribute data, bound on `ARRAY_BUFFER`.
pub type VertexBuffer = Buffer<ArrayTarget>;
/// Index data, bound on `ELEMENT_ARRAY_BUFFER`.
pub type ElementBuffer = Buffer<ElementTarget>;

/// A buffer object bound on `T`'s target.
pub struct Buffer<T: BufferTarget> {
    handle: GlHandle,
    len: Cell<usize>,
    _target: PhantomData<T>,
}

impl<T: BufferTarget> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(T::TYPE_NAME)
            .field("handle", &self.handle.name())
            .field("len", &self.len.get())
            .finish()
    }
}

impl<T: BufferTarget> Buffer<T> {
    /// Generates a buffer, binds it and uploads `data` (which may be empty)
    /// with the given usage hint (`STATIC_DRAW`, ...).
    pub fn new(ctx: &Context, data: &[u8], usage: u32) -> Result<Self> {
        let buffer = Self {
            handle: GlHandle::create(ctx, ObjectKind::Buffer)?,
            len: Cell::new(0),
            _target: PhantomData,
        };
        buffer.upload(data, usage)?;
        log::debug!(
            "Created {} {} with {} bytes",
            T::TYPE_NAME,
            buffer.handle.name().unwrap_or_default(),
            data.len()
        );
        Ok(buffer)
    }

    /// Like [`Buffer::new`] for a slice of plain-old-data values.
    pub fn from_slice<P: bytemuck::Pod>(ctx: &Context, data: &[P], usage: u32) -> Result<Self> {
        Self::new(ctx, bytemuck::cast_slice(data), usage)
    }

    pub fn handle(&self) -> Option<u32> {
        self.handle.name()
    }

    /// Bytes held since the last full upload.
    pub fn len(&self) -> usize {
        self.len.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len.get() == 0
    }

    pub fn bind(&self) -> Result<()> {
        let name = self.handle.require(T::TYPE_NAME)?;
        let ctx = self.handle.context();
        ctx.gl().bind_buffer(T::TARGET, name);
        ctx.check()
    }

    pub fn unbind(&self) -> Result<()> {
        let ctx = self.handle.context();
        ctx.gl().bind_buffer(T::TARGET, 0);
        ctx.check()
    }

    /// Binds the buffer and replaces its whole content.
    pub fn upload(&self, data: &[u8], usage: u32) -> Result<()> {
        self.bind()?;
        let ctx = self.handle.context();
        ctx.gl().buffer_data(T::TARGET, data, usage);
        ctx.check()?;
        self.len.set(data.len());
        Ok(())
    }

    /// Binds the buffer and overwrites `data.len()` bytes at `offset`.
    pub fn write(&self, offset: usize, data: &[u8]) -> Result<()> {
        let offset = self.check_range(offset, data.len())?;
        self.bind()?;
        let ctx = self.handle.context();
        ctx.gl().buffer_sub_data(T::TARGET, offset, data);
        ctx.check()
    }

    pub fn write_slice<P: bytemuck::Pod>(&self, offset: usize, data: &[P]) -> Result<()> {
        self.write(offset, bytemuck::cast_slice(data))
    }

    /// Binds the buffer and reads `len` bytes back from `offset`.
    pub fn read(&self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let offset = self.check_range(offset, len)?;
        self.bind()?;
        let ctx = self.handle.context();
        let mut out = vec![0; len];
        ctx.gl().get_buffer_sub_data(T::TARGET, offset, &mut out);
        ctx.check()?;
        Ok(out)
    }

    /// Checks `offset..offset + len` against the buffer and returns the
    /// offset as the native type.
    fn check_range(&self, offset: usize, len: usize) -> Result<i32> {
        match offset.checked_add(len) {
            Some(end) if end <= self.len.get() => i32::try_from(offset)
                .map_err(|_| Error::Argument(format!("Buffer offset {offset} is out of range"))),
            _ => Err(Error::Argument(format!(
                "Range {offset}..{} is outside the {}-byte buffer",
                offset.saturating_add(len),
                self.len.get()
            ))),
        }
    }

    /// Deletes the buffer. Later calls are no-ops.
    pub fn destroy(&self) {
        self.handle.release();
    }
}

impl<T: BufferTarget> fmt::Display for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} val={}>", T::TYPE_NAME, self.handle.name().unwrap_or_default())
    }
}
