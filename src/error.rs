//! Error kinds raised by the bindings.
//!
//! Every wrapper operation reports failures through [`Error`]. The Python
//! layer turns each kind into its own exception type, and [`Error::kind`]
//! gives the discriminant without the payload, which is what callers and
//! tests usually match on.

use std::fmt;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Shader pipeline stage, used in compile diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Compiling '{stage}' shader failed: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("Linking shader failed: {0}")]
    Link(String),

    #[error("OpenGL error {0}")]
    Native(u32),

    #[error("Failed to import {src:?}: {message}")]
    Import { src: String, message: String },

    #[error("{0}")]
    Type(String),

    #[error("{0}")]
    Index(String),

    #[error("{0}")]
    Size(String),

    #[error("Unknown uniform '{0}'")]
    UnknownUniform(String),

    #[error("{0}")]
    Argument(String),

    #[error("{0}")]
    Window(String),
}

/// Payload-free discriminant of [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Compile,
    Link,
    Native,
    Import,
    Type,
    Index,
    Size,
    UnknownUniform,
    Argument,
    Window,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Compile { .. } => ErrorKind::Compile,
            Error::Link(_) => ErrorKind::Link,
            Error::Native(_) => ErrorKind::Native,
            Error::Import { .. } => ErrorKind::Import,
            Error::Type(_) => ErrorKind::Type,
            Error::Index(_) => ErrorKind::Index,
            Error::Size(_) => ErrorKind::Size,
            Error::UnknownUniform(_) => ErrorKind::UnknownUniform,
            Error::Argument(_) => ErrorKind::Argument,
            Error::Window(_) => ErrorKind::Window,
        }
    }

    pub(crate) fn import(src: impl Into<String>, message: impl fmt::Display) -> Self {
        let mut message = message.to_string();
        if message.is_empty() {
            message = "unknown import failure".to_string();
        }
        Error::Import {
            src: src.into(),
            message,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Compile => "CompileError",
            ErrorKind::Link => "LinkError",
            ErrorKind::Native => "NativeError",
            ErrorKind::Import => "ImportError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Size => "SizeError",
            ErrorKind::UnknownUniform => "UnknownUniformError",
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::Window => "WindowError",
        };
        f.write_str(name)
    }
}
