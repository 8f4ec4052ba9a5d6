//! [`WindowSystem`] over the native GLFW library.

use std::{collections::HashMap, rc::Rc};

use glfw::Context as _;

use crate::{
    config::Config,
    native::GlApi,
    window::{MonitorInfo, WindowId, WindowSystem},
};

struct NativeWindow {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

pub struct GlfwSystem {
    glfw: glfw::Glfw,
    windows: HashMap<WindowId, NativeWindow>,
    next_id: WindowId,
}

impl GlfwSystem {
    pub fn init() -> Result<Self, String> {
        let glfw = glfw::init(|error, description| {
            log::error!("GLFW error {error:?}: {description}");
        })
        .map_err(|e| format!("Failed to initialize GLFW: {e:?}"))?;
        Ok(Self {
            glfw,
            windows: HashMap::new(),
            next_id: 1,
        })
    }

    fn monitor_info(index: usize, monitor: &glfw::Monitor) -> MonitorInfo {
        MonitorInfo {
            index,
            name: monitor.get_name().unwrap_or_default(),
        }
    }
}

impl WindowSystem for GlfwSystem {
    fn apply_hints(&mut self, config: &Config) {
        let (major, minor) = config.gl_version;
        self.glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        if config.core_profile {
            self.glfw
                .window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
            #[cfg(target_os = "macos")]
            self.glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        }
    }

    fn time(&self) -> f64 {
        self.glfw.get_time()
    }

    fn set_time(&mut self, seconds: f64) {
        self.glfw.set_time(seconds);
    }

    fn monitors(&mut self) -> Vec<MonitorInfo> {
        self.glfw.with_connected_monitors(|_, monitors| {
            monitors
                .iter()
                .enumerate()
                .map(|(index, monitor)| Self::monitor_info(index, monitor))
                .collect()
        })
    }

    fn primary_monitor(&mut self) -> Option<MonitorInfo> {
        // GLFW always lists the primary monitor first.
        self.glfw.with_connected_monitors(|_, monitors| {
            monitors.first().map(|monitor| Self::monitor_info(0, monitor))
        })
    }

    fn create_window(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
        monitor: Option<&MonitorInfo>,
    ) -> Option<WindowId> {
        let created = match monitor {
            None => self
                .glfw
                .create_window(width, height, title, glfw::WindowMode::Windowed),
            Some(info) => self.glfw.with_connected_monitors(|glfw, monitors| {
                let monitor: &glfw::Monitor = monitors.get(info.index)?;
                glfw.create_window(width, height, title, glfw::WindowMode::FullScreen(monitor))
            }),
        };
        let (window, events) = created?;
        let id = self.next_id;
        self.next_id += 1;
        self.windows.insert(id, NativeWindow { window, events });
        Some(id)
    }

    fn destroy_window(&mut self, id: WindowId) {
        // Dropping a PWindow destroys the native window.
        self.windows.remove(&id);
    }

    fn make_context_current(&mut self, id: WindowId) {
        if let Some(native) = self.windows.get_mut(&id) {
            native.window.make_current();
        }
    }

    fn set_swap_interval(&mut self, interval: u32) {
        let interval = match interval {
            0 => glfw::SwapInterval::None,
            n => glfw::SwapInterval::Sync(n),
        };
        self.glfw.set_swap_interval(interval);
    }

    fn should_close(&self, id: WindowId) -> bool {
        self.windows.get(&id).is_none_or(|n| n.window.should_close())
    }

    fn set_should_close(&mut self, id: WindowId, value: bool) {
        if let Some(native) = self.windows.get_mut(&id) {
            native.window.set_should_close(value);
        }
    }

    fn window_size(&self, id: WindowId) -> (i32, i32) {
        self.windows.get(&id).map_or((0, 0), |n| n.window.get_size())
    }

    fn window_pos(&self, id: WindowId) -> (i32, i32) {
        self.windows.get(&id).map_or((0, 0), |n| n.window.get_pos())
    }

    fn show_window(&mut self, id: WindowId) {
        if let Some(native) = self.windows.get_mut(&id) {
            native.window.show();
        }
    }

    fn hide_window(&mut self, id: WindowId) {
        if let Some(native) = self.windows.get_mut(&id) {
            native.window.hide();
        }
    }

    fn swap_buffers(&mut self, id: WindowId) {
        if let Some(native) = self.windows.get_mut(&id) {
            native.window.swap_buffers();
        }
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
        for native in self.windows.values() {
            for (_, event) in glfw::flush_messages(&native.events) {
                log::trace!("{event:?}");
            }
        }
    }

    fn load_gl(&mut self, id: WindowId) -> Option<Rc<dyn GlApi>> {
        let native = self.windows.get_mut(&id)?;
        native.window.make_current();
        let window = &mut native.window;
        let gl = unsafe { glow::Context::from_loader_function(|name| window.get_proc_address(name) as *const _) };
        Some(Rc::new(gl))
    }
}
