use std::{cell::Cell, fmt};

use crate::{
    context::Context,
    error::{Error, Result},
    window::{Glfw, Monitor, WindowId},
};

/// A window with its own OpenGL context.
pub struct Window {
    glfw: Glfw,
    id: Cell<Option<WindowId>>,
    title: String,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id.get())
            .field("title", &self.title)
            .finish()
    }
}

impl Window {
    pub const TYPE_NAME: &'static str = "gl.glfw.Window";

    /// Creates a window (full screen on `monitor` if given), makes its
    /// context current and applies the configured swap interval.
    pub fn new(glfw: &Glfw, title: &str, size: (i32, i32), monitor: Option<&Monitor>) -> Result<Self> {
        let (width, height) = match (u32::try_from(size.0), u32::try_from(size.1)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(Error::Argument(format!(
                    "Window size must be positive, got {}x{}",
                    size.0, size.1
                )));
            }
        };
        let id = {
            let mut system = glfw.system();
            let id = system
                .create_window(title, width, height, monitor.map(Monitor::info))
                .ok_or_else(|| Glfw::window_error(format!("Failed to create window {title:?}")))?;
            system.make_context_current(id);
            system.set_swap_interval(glfw.config().swap_interval);
            id
        };
        log::info!("Opened window {title:?} ({width}x{height})");
        Ok(Self {
            glfw: glfw.clone(),
            id: Cell::new(Some(id)),
            title: title.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn id(&self) -> Option<WindowId> {
        self.id.get()
    }

    fn require(&self) -> Result<WindowId> {
        self.id
            .get()
            .ok_or_else(|| Error::Argument(format!("'{}' has already been destroyed", Self::TYPE_NAME)))
    }

    /// False once a close request has been observed by `Glfw::poll`.
    pub fn is_open(&self) -> bool {
        self.id
            .get()
            .is_some_and(|id| !self.glfw.system().should_close(id))
    }

    pub fn set_should_close(&self, value: bool) -> Result<()> {
        let id = self.require()?;
        self.glfw.system().set_should_close(id, value);
        Ok(())
    }

    pub fn size(&self) -> Result<(i32, i32)> {
        let id = self.require()?;
        Ok(self.glfw.system().window_size(id))
    }

    pub fn pos(&self) -> Result<(i32, i32)> {
        let id = self.require()?;
        Ok(self.glfw.system().window_pos(id))
    }

    pub fn show(&self) -> Result<()> {
        let id = self.require()?;
        self.glfw.system().show_window(id);
        Ok(())
    }

    pub fn hide(&self) -> Result<()> {
        let id = self.require()?;
        self.glfw.system().hide_window(id);
        Ok(())
    }

    /// Presents the back buffer.
    pub fn swap(&self) -> Result<()> {
        let id = self.require()?;
        self.glfw.system().swap_buffers(id);
        Ok(())
    }

    /// Makes the window's context current and wraps it in a [`Context`].
    pub fn load_gl(&self) -> Result<Context> {
        let id = self.require()?;
        let gl = {
            let mut system = self.glfw.system();
            system.make_context_current(id);
            system.load_gl(id)
        };
        let gl = gl.ok_or_else(|| {
            Glfw::window_error(format!("No OpenGL context for window {:?}", self.title))
        })?;
        Ok(Context::from_shared(gl, self.glfw.config().clone()))
    }

    /// Destroys the window. Later calls are no-ops.
    pub fn destroy(&self) {
        if let Some(id) = self.id.take() {
            self.glfw.system().destroy_window(id);
            log::debug!("Closed window {:?}", self.title);
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} title={:?}>", Self::TYPE_NAME, self.title)
    }
}
