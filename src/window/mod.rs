//! Windowing through GLFW: system initialization, monitors and windows.
//!
//! The window system sits behind [`WindowSystem`] like GL sits behind
//! [`GlApi`](crate::native::GlApi). [`Glfw`] is the initialized system
//! shared by every monitor and window created from it.

use std::{
    cell::{RefCell, RefMut},
    fmt,
    rc::Rc,
};

use crate::{
    config::Config,
    error::Error,
    native::GlApi,
};

#[cfg(feature = "glfw")]
pub mod glfw_backend;
pub mod headless;
mod monitor;
#[allow(clippy::module_inception)]
mod window;

pub use headless::{HeadlessWindowSystem, WindowState};
pub use monitor::Monitor;
pub use window::Window;

/// Identifies a window within its [`WindowSystem`].
pub type WindowId = u32;

/// A connected monitor as reported by the window system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorInfo {
    pub index: usize,
    pub name: String,
}

/// The native window-system calls the wrappers use.
pub trait WindowSystem {
    /// Applies context hints (version, profile) for windows created later.
    fn apply_hints(&mut self, config: &Config);

    fn time(&self) -> f64;
    fn set_time(&mut self, seconds: f64);

    fn monitors(&mut self) -> Vec<MonitorInfo>;
    fn primary_monitor(&mut self) -> Option<MonitorInfo>;

    /// Creates a window, full screen on `monitor` when one is given.
    /// `None` when the native call fails.
    fn create_window(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
        monitor: Option<&MonitorInfo>,
    ) -> Option<WindowId>;
    fn destroy_window(&mut self, id: WindowId);

    fn make_context_current(&mut self, id: WindowId);
    fn set_swap_interval(&mut self, interval: u32);

    fn should_close(&self, id: WindowId) -> bool;
    fn set_should_close(&mut self, id: WindowId, value: bool);
    fn window_size(&self, id: WindowId) -> (i32, i32);
    fn window_pos(&self, id: WindowId) -> (i32, i32);
    fn show_window(&mut self, id: WindowId);
    fn hide_window(&mut self, id: WindowId);
    fn swap_buffers(&mut self, id: WindowId);

    /// Processes every pending event.
    fn poll_events(&mut self);

    /// A GL backend for the window's context, which must be current.
    fn load_gl(&mut self, id: WindowId) -> Option<Rc<dyn GlApi>>;
}

/// An initialized window system.
#[derive(Clone)]
pub struct Glfw {
    system: Rc<RefCell<dyn WindowSystem>>,
    config: Rc<Config>,
}

impl fmt::Debug for Glfw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glfw").field("config", &self.config).finish()
    }
}

impl Glfw {
    /// Requests the configured context version and profile and resets the
    /// timer.
    pub fn init(system: impl WindowSystem + 'static, config: Config) -> Self {
        Self::from_shared(Rc::new(RefCell::new(system)), config)
    }

    pub fn from_shared(system: Rc<RefCell<dyn WindowSystem>>, config: Config) -> Self {
        {
            let mut system = system.borrow_mut();
            system.apply_hints(&config);
            system.set_time(0.0);
        }
        log::debug!(
            "Window system ready for OpenGL {}.{}",
            config.gl_version.0,
            config.gl_version.1
        );
        Self {
            system,
            config: Rc::new(config),
        }
    }

    /// A system backed by [`HeadlessWindowSystem`], returned alongside it.
    pub fn headless() -> (Self, Rc<RefCell<HeadlessWindowSystem>>) {
        Self::headless_with(HeadlessWindowSystem::new(), Config::default())
    }

    pub fn headless_with(
        system: HeadlessWindowSystem,
        config: Config,
    ) -> (Self, Rc<RefCell<HeadlessWindowSystem>>) {
        let system = Rc::new(RefCell::new(system));
        (Self::from_shared(system.clone(), config), system)
    }

    /// Initializes the native GLFW library.
    #[cfg(feature = "glfw")]
    pub fn native(config: Config) -> crate::Result<Self> {
        let system = glfw_backend::GlfwSystem::init().map_err(Error::Window)?;
        Ok(Self::init(system, config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processes pending events; call once per frame.
    pub fn poll(&self) {
        self.system().poll_events();
    }

    /// Seconds since initialization.
    pub fn time(&self) -> f64 {
        self.system.borrow().time()
    }

    pub fn monitors(&self) -> Vec<MonitorInfo> {
        self.system().monitors()
    }

    pub(crate) fn system(&self) -> RefMut<'_, dyn WindowSystem> {
        self.system.borrow_mut()
    }

    pub(crate) fn window_error(message: impl Into<String>) -> Error {
        let message = message.into();
        log::error!("{message}");
        Error::Window(message)
    }
}
