use std::{cell::Cell, fmt};

use image::{GenericImageView, ImageFormat};

use crate::{
    context::{Context, GlHandle},
    error::{Error, Result},
    native::{self, ObjectKind, consts},
};

/// Pixel data for a 2D texture upload.
#[derive(Clone, Copy, Debug)]
pub struct TextureImage<'a> {
    pub data: &'a [u8],
    pub width: i32,
    pub height: i32,
    /// Pixel layout of `data` (`RGBA`, `RGB`, ...).
    pub format: u32,
    /// Component type of `data` (`UNSIGNED_BYTE`, ...).
    pub ty: u32,
    /// Storage format; `None` stores the data in `format`.
    pub internal_format: Option<i32>,
}

impl<'a> TextureImage<'a> {
    /// Tightly packed 8-bit RGBA pixels.
    pub fn rgba8(data: &'a [u8], width: i32, height: i32) -> Self {
        Self {
            data,
            width,
            height,
            format: consts::RGBA,
            ty: consts::UNSIGNED_BYTE,
            internal_format: None,
        }
    }
}

/// A `TEXTURE_2D` object.
#[derive(Debug)]
pub struct Texture2D {
    handle: GlHandle,
    size: Cell<(i32, i32)>,
}

impl Texture2D {
    pub const TYPE_NAME: &'static str = "gl.Texture2D";

    /// Generates a texture with repeat wrapping and linear filtering, and
    /// uploads `image` (then mipmaps) if one is given.
    pub fn new(ctx: &Context, image: Option<&TextureImage>) -> Result<Self> {
        let texture = Self {
            handle: GlHandle::create(ctx, ObjectKind::Texture)?,
            size: Cell::new((0, 0)),
        };
        let name = texture.handle.require(Self::TYPE_NAME)?;
        let gl = ctx.gl();
        gl.bind_texture(consts::TEXTURE_2D, name);
        ctx.check()?;
        for (parameter, value) in [
            (consts::TEXTURE_WRAP_S, consts::REPEAT),
            (consts::TEXTURE_WRAP_T, consts::REPEAT),
            (consts::TEXTURE_MIN_FILTER, consts::LINEAR),
            (consts::TEXTURE_MAG_FILTER, consts::LINEAR),
        ] {
            gl.tex_parameter_i32(consts::TEXTURE_2D, parameter, value as i32);
        }
        ctx.check()?;
        if let Some(image) = image {
            texture.upload(image)?;
        }
        log::debug!("Created {} {name}", Self::TYPE_NAME);
        Ok(texture)
    }

    /// Uploads any decoded image as 8-bit RGBA.
    pub fn from_image(ctx: &Context, img: &image::DynamicImage) -> Result<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = img.dimensions();
        let width = i32::try_from(width).map_err(|_| too_large(width))?;
        let height = i32::try_from(height).map_err(|_| too_large(height))?;
        Self::new(ctx, Some(&TextureImage::rgba8(&rgba, width, height)))
    }

    /// Decodes an encoded image (PNG, JPEG, ...) and uploads it. `format`
    /// is a file extension hint; without it the format is guessed.
    pub fn from_bytes(ctx: &Context, bytes: &[u8], format: Option<&str>) -> Result<Self> {
        let decoded = match format {
            Some(extension) => {
                let format = ImageFormat::from_extension(extension).ok_or_else(|| {
                    Error::Argument(format!("Unknown image format '{extension}'"))
                })?;
                image::load_from_memory_with_format(bytes, format)
            }
            None => image::load_from_memory(bytes),
        };
        let img = decoded.map_err(|e| Error::import("<memory>", e))?;
        Self::from_image(ctx, &img)
    }

    pub fn handle(&self) -> Option<u32> {
        self.handle.name()
    }

    /// `(width, height)` of the last upload.
    pub fn size(&self) -> (i32, i32) {
        self.size.get()
    }

    /// Binds the texture on texture unit `unit`.
    pub fn bind(&self, unit: u32) -> Result<()> {
        let name = self.handle.require(Self::TYPE_NAME)?;
        let ctx = self.handle.context();
        let units = ctx.config().max_texture_units;
        if unit >= units {
            return Err(Error::Argument(format!(
                "Bad texture unit: {unit}. Only 0 through {} supported",
                units.saturating_sub(1)
            )));
        }
        ctx.gl().active_texture(consts::TEXTURE0 + unit);
        ctx.gl().bind_texture(consts::TEXTURE_2D, name);
        ctx.check()
    }

    /// Unbinds `TEXTURE_2D` on the active unit.
    pub fn unbind(&self) -> Result<()> {
        let ctx = self.handle.context();
        ctx.gl().bind_texture(consts::TEXTURE_2D, 0);
        ctx.check()
    }

    /// Replaces the image and regenerates mipmaps.
    pub fn write(&self, image: &TextureImage) -> Result<()> {
        let name = self.handle.require(Self::TYPE_NAME)?;
        let ctx = self.handle.context();
        ctx.gl().bind_texture(consts::TEXTURE_2D, name);
        ctx.check()?;
        self.upload(image)
    }

    /// Uploads to the texture bound on the active unit. Pixel data must be
    /// tightly packed and exactly fill the image.
    fn upload(&self, image: &TextureImage) -> Result<()> {
        if image.width <= 0 || image.height <= 0 {
            return Err(Error::Argument(format!(
                "Texture size must be positive, got {}x{}",
                image.width, image.height
            )));
        }
        if !image.data.is_empty() {
            if native::format_components(image.format).is_none() || native::type_size(image.ty).is_none() {
                return Err(Error::Argument(format!(
                    "Unsupported pixel layout (format {:#x}, type {:#x})",
                    image.format, image.ty
                )));
            }
            let expected = native::image_size(image.width, image.height, image.format, image.ty)
                .ok_or_else(|| {
                    Error::Size(format!("A {}x{} image is too large", image.width, image.height))
                })?;
            if image.data.len() != expected {
                return Err(Error::Size(format!(
                    "A {}x{} image needs {expected} bytes of pixel data, got {}",
                    image.width,
                    image.height,
                    image.data.len()
                )));
            }
        }
        let ctx = self.handle.context();
        let gl = ctx.gl();
        let internal_format = image.internal_format.unwrap_or(image.format as i32);
        gl.tex_image_2d(
            consts::TEXTURE_2D,
            0,
            internal_format,
            image.width,
            image.height,
            image.format,
            image.ty,
            // Empty data only allocates storage.
            (!image.data.is_empty()).then_some(image.data),
        );
        ctx.check()?;
        gl.generate_mipmap(consts::TEXTURE_2D);
        ctx.check()?;
        self.size.set((image.width, image.height));
        Ok(())
    }

    /// Deletes the texture. Later calls are no-ops.
    pub fn destroy(&self) {
        self.handle.release();
    }
}

fn too_large(dim: u32) -> Error {
    Error::Argument(format!("Image dimension {dim} is too large"))
}

impl fmt::Display for Texture2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} val={}>", Self::TYPE_NAME, self.handle.name().unwrap_or_default())
    }
}
