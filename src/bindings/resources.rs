use pyo3::{prelude::*, types::PyBytes};

use crate::{
    bindings::{context, convert},
    error::Error,
    native::consts,
    resources::{
        ArrayTarget, AttribPointer, Buffer, ElementTarget, Shader, Texture2D, TextureImage, VertexArray,
    },
};

/// A linked program from vertex and fragment source.
#[pyclass(unsendable, name = "Shader", module = "gl")]
pub struct PyShader(pub Shader);

#[pymethods]
impl PyShader {
    #[new]
    fn new(src_vert: &str, src_frag: &str) -> PyResult<Self> {
        Ok(Self(Shader::new(&context()?, src_vert, src_frag)?))
    }

    #[pyo3(name = "use")]
    fn use_program(&self) -> PyResult<()> {
        Ok(self.0.use_program()?)
    }

    /// Uploads `value` to the uniform `name`. Ints and bools upload as
    /// `int`, floats as `float`; arrays and nested sequences pick a vector
    /// or matrix call from their shape.
    fn uniform(&self, name: &str, value: &Bound<'_, PyAny>) -> PyResult<()> {
        let value = convert::uniform_value(value)?;
        Ok(self.0.set_uniform(name, value)?)
    }

    fn __int__(&self) -> u32 {
        self.0.handle().unwrap_or_default()
    }

    fn __index__(&self) -> u32 {
        self.__int__()
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// Vertex buffer object.
#[pyclass(unsendable, name = "VBO", module = "gl")]
pub struct PyVbo(pub Buffer<ArrayTarget>);

/// Element buffer object.
#[pyclass(unsendable, name = "EBO", module = "gl")]
pub struct PyEbo(pub Buffer<ElementTarget>);

macro_rules! buffer_methods {
    ($class:ident) => {
        #[pymethods]
        impl $class {
            #[new]
            #[pyo3(signature = (data = None, usage = consts::STATIC_DRAW))]
            fn new(data: Option<&Bound<'_, PyAny>>, usage: u32) -> PyResult<Self> {
                let data = data.map(convert::bytes_of).transpose()?.unwrap_or_default();
                Ok(Self(Buffer::new(&context()?, &data, usage)?))
            }

            fn bind(&self) -> PyResult<()> {
                Ok(self.0.bind()?)
            }

            fn unbind(&self) -> PyResult<()> {
                Ok(self.0.unbind()?)
            }

            /// Replaces the bytes at `offset` with `data`.
            fn write(&self, offset: usize, data: &Bound<'_, PyAny>) -> PyResult<()> {
                Ok(self.0.write(offset, &convert::bytes_of(data)?)?)
            }

            /// Reads `len` bytes from `offset`, by default up to the end.
            #[pyo3(signature = (offset = 0, len = None))]
            fn read<'py>(&self, py: Python<'py>, offset: usize, len: Option<usize>) -> PyResult<Bound<'py, PyBytes>> {
                let len = len.unwrap_or_else(|| self.0.len().saturating_sub(offset));
                Ok(PyBytes::new(py, &self.0.read(offset, len)?))
            }

            /// Size in bytes.
            #[getter]
            fn size(&self) -> usize {
                self.0.len()
            }

            fn __int__(&self) -> u32 {
                self.0.handle().unwrap_or_default()
            }

            fn __index__(&self) -> u32 {
                self.__int__()
            }

            fn __repr__(&self) -> String {
                self.0.to_string()
            }
        }
    };
}

buffer_methods!(PyVbo);
buffer_methods!(PyEbo);

/// Vertex array object.
#[pyclass(unsendable, name = "VAO", module = "gl")]
pub struct PyVao(pub VertexArray);

#[pymethods]
impl PyVao {
    #[new]
    fn new() -> PyResult<Self> {
        Ok(Self(VertexArray::new(&context()?)?))
    }

    fn bind(&self) -> PyResult<()> {
        Ok(self.0.bind()?)
    }

    fn unbind(&self) -> PyResult<()> {
        Ok(self.0.unbind()?)
    }

    /// Points attribute `index` at the bound VBO and enables it.
    #[pyo3(signature = (index, size, r#type, normalize, stride, offset = 0))]
    fn attrib(
        &self,
        index: u32,
        size: i32,
        r#type: u32,
        normalize: &Bound<'_, PyAny>,
        stride: i32,
        offset: i32,
    ) -> PyResult<()> {
        Ok(self.0.attrib(AttribPointer {
            index,
            size,
            ty: r#type,
            normalized: normalize.is_truthy()?,
            stride,
            offset,
        })?)
    }

    fn attrib_enable(&self, index: u32) -> PyResult<()> {
        Ok(self.0.attrib_enable(index)?)
    }

    fn attrib_disable(&self, index: u32) -> PyResult<()> {
        Ok(self.0.attrib_disable(index)?)
    }

    fn __int__(&self) -> u32 {
        self.0.handle().unwrap_or_default()
    }

    fn __index__(&self) -> u32 {
        self.__int__()
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}

/// A 2D texture.
#[pyclass(unsendable, name = "Texture2D", module = "gl")]
pub struct PyTexture2D(pub Texture2D);

/// Constructor arguments of `Texture2D()`.
struct PixelArgs {
    data: Vec<u8>,
    size: Option<(i32, i32)>,
    format: u32,
    ty: u32,
    internal_format: Option<i32>,
}

impl PixelArgs {
    fn new(
        data: Option<&Bound<'_, PyAny>>,
        width: Option<i32>,
        height: Option<i32>,
        format: u32,
        ty: u32,
        internal_format: Option<i32>,
    ) -> PyResult<Self> {
        let data = data.map(convert::bytes_of).transpose()?.unwrap_or_default();
        let size = match (width, height) {
            (Some(width), Some(height)) => Some((width, height)),
            (None, None) if data.is_empty() => None,
            _ => {
                return Err(Error::Argument(
                    "Texture2D needs both 'width' and 'height' with image data".to_string(),
                )
                .into());
            }
        };
        Ok(Self {
            data,
            size,
            format,
            ty,
            internal_format,
        })
    }

    fn image(&self) -> Option<TextureImage<'_>> {
        let (width, height) = self.size?;
        Some(TextureImage {
            data: &self.data,
            width,
            height,
            format: self.format,
            ty: self.ty,
            internal_format: self.internal_format,
        })
    }
}

#[pymethods]
impl PyTexture2D {
    #[new]
    #[pyo3(signature = (
        data = None,
        width = None,
        height = None,
        format = consts::RGBA,
        r#type = consts::UNSIGNED_BYTE,
        internalformat = None
    ))]
    fn new(
        data: Option<&Bound<'_, PyAny>>,
        width: Option<i32>,
        height: Option<i32>,
        format: u32,
        r#type: u32,
        internalformat: Option<i32>,
    ) -> PyResult<Self> {
        let pixels = PixelArgs::new(data, width, height, format, r#type, internalformat)?;
        Ok(Self(Texture2D::new(&context()?, pixels.image().as_ref())?))
    }

    /// Decodes an encoded image (PNG, JPEG, BMP, TGA) into a new texture.
    #[staticmethod]
    #[pyo3(signature = (data, format = None))]
    fn decode(data: &Bound<'_, PyAny>, format: Option<&str>) -> PyResult<Self> {
        let bytes = convert::bytes_of(data)?;
        Ok(Self(Texture2D::from_bytes(&context()?, &bytes, format)?))
    }

    #[pyo3(signature = (unit = 0))]
    fn bind(&self, unit: u32) -> PyResult<()> {
        Ok(self.0.bind(unit)?)
    }

    fn unbind(&self) -> PyResult<()> {
        Ok(self.0.unbind()?)
    }

    /// Replaces the whole image.
    #[pyo3(signature = (
        data,
        width,
        height,
        format = consts::RGBA,
        r#type = consts::UNSIGNED_BYTE,
        internalformat = None
    ))]
    fn write(
        &self,
        data: &Bound<'_, PyAny>,
        width: i32,
        height: i32,
        format: u32,
        r#type: u32,
        internalformat: Option<i32>,
    ) -> PyResult<()> {
        let data = convert::bytes_of(data)?;
        Ok(self.0.write(&TextureImage {
            data: &data,
            width,
            height,
            format,
            ty: r#type,
            internal_format: internalformat,
        })?)
    }

    #[getter]
    fn width(&self) -> i32 {
        self.0.size().0
    }

    #[getter]
    fn height(&self) -> i32 {
        self.0.size().1
    }

    fn __int__(&self) -> u32 {
        self.0.handle().unwrap_or_default()
    }

    fn __index__(&self) -> u32 {
        self.__int__()
    }

    fn __repr__(&self) -> String {
        self.0.to_string()
    }
}
