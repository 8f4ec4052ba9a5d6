//! A window system without a display.
//!
//! Windows are plain records; a close request made through
//! [`HeadlessWindowSystem::request_close`] is queued the way a click on the
//! close button would be, and only becomes visible to `should_close` after
//! the next `poll_events`.

use std::{collections::HashMap, rc::Rc, time::Instant};

use crate::{
    config::Config,
    native::{GlApi, HeadlessGl},
    window::{MonitorInfo, WindowId, WindowSystem},
};

/// Snapshot of a headless window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowState {
    pub title: String,
    pub size: (i32, i32),
    pub pos: (i32, i32),
    pub visible: bool,
    pub should_close: bool,
    pub swaps: usize,
    pub monitor: Option<usize>,
}

#[derive(Debug)]
pub struct HeadlessWindowSystem {
    monitors: Vec<String>,
    windows: HashMap<WindowId, WindowState>,
    contexts: HashMap<WindowId, Rc<HeadlessGl>>,
    next_id: WindowId,
    current: Option<WindowId>,
    swap_interval: Option<u32>,
    pending_close: Vec<WindowId>,
    fail_next_window: bool,
    hints: Option<(u32, u32, bool)>,
    polls: usize,
    epoch: Instant,
    time_offset: f64,
}

impl Default for HeadlessWindowSystem {
    fn default() -> Self {
        Self::with_monitors(&["Headless Monitor"])
    }
}

impl HeadlessWindowSystem {
    /// One connected monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The given monitors, the first being primary. An empty list means no
    /// monitor is connected.
    pub fn with_monitors(names: &[&str]) -> Self {
        Self {
            monitors: names.iter().map(|n| n.to_string()).collect(),
            windows: HashMap::new(),
            contexts: HashMap::new(),
            next_id: 1,
            current: None,
            swap_interval: None,
            pending_close: Vec::new(),
            fail_next_window: false,
            hints: None,
            polls: 0,
            epoch: Instant::now(),
            time_offset: 0.0,
        }
    }

    /// Makes the next `create_window` fail.
    pub fn fail_next_window(&mut self) {
        self.fail_next_window = true;
    }

    /// Queues a close request, observed on the next poll.
    pub fn request_close(&mut self, id: WindowId) {
        self.pending_close.push(id);
    }

    pub fn window(&self, id: WindowId) -> Option<WindowState> {
        self.windows.get(&id).cloned()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// The GL context created for a window by `load_gl`.
    pub fn gl(&self, id: WindowId) -> Option<Rc<HeadlessGl>> {
        self.contexts.get(&id).cloned()
    }

    pub fn current_context(&self) -> Option<WindowId> {
        self.current
    }

    pub fn swap_interval(&self) -> Option<u32> {
        self.swap_interval
    }

    /// `(major, minor, core profile)` from the last hints applied.
    pub fn hints(&self) -> Option<(u32, u32, bool)> {
        self.hints
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl WindowSystem for HeadlessWindowSystem {
    fn apply_hints(&mut self, config: &Config) {
        self.hints = Some((config.gl_version.0, config.gl_version.1, config.core_profile));
    }

    fn time(&self) -> f64 {
        self.time_offset + self.epoch.elapsed().as_secs_f64()
    }

    fn set_time(&mut self, seconds: f64) {
        self.epoch = Instant::now();
        self.time_offset = seconds;
    }

    fn monitors(&mut self) -> Vec<MonitorInfo> {
        self.monitors
            .iter()
            .enumerate()
            .map(|(index, name)| MonitorInfo {
                index,
                name: name.clone(),
            })
            .collect()
    }

    fn primary_monitor(&mut self) -> Option<MonitorInfo> {
        self.monitors.first().map(|name| MonitorInfo {
            index: 0,
            name: name.clone(),
        })
    }

    fn create_window(
        &mut self,
        title: &str,
        width: u32,
        height: u32,
        monitor: Option<&MonitorInfo>,
    ) -> Option<WindowId> {
        if std::mem::take(&mut self.fail_next_window) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.windows.insert(
            id,
            WindowState {
                title: title.to_string(),
                size: (width as i32, height as i32),
                pos: (0, 0),
                visible: true,
                should_close: false,
                swaps: 0,
                monitor: monitor.map(|m| m.index),
            },
        );
        Some(id)
    }

    fn destroy_window(&mut self, id: WindowId) {
        self.windows.remove(&id);
        self.contexts.remove(&id);
        self.pending_close.retain(|w| *w != id);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    fn make_context_current(&mut self, id: WindowId) {
        if self.windows.contains_key(&id) {
            self.current = Some(id);
        }
    }

    fn set_swap_interval(&mut self, interval: u32) {
        self.swap_interval = Some(interval);
    }

    fn should_close(&self, id: WindowId) -> bool {
        self.windows.get(&id).is_none_or(|w| w.should_close)
    }

    fn set_should_close(&mut self, id: WindowId, value: bool) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.should_close = value;
        }
    }

    fn window_size(&self, id: WindowId) -> (i32, i32) {
        self.windows.get(&id).map_or((0, 0), |w| w.size)
    }

    fn window_pos(&self, id: WindowId) -> (i32, i32) {
        self.windows.get(&id).map_or((0, 0), |w| w.pos)
    }

    fn show_window(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.visible = true;
        }
    }

    fn hide_window(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.visible = false;
        }
    }

    fn swap_buffers(&mut self, id: WindowId) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.swaps += 1;
        }
    }

    fn poll_events(&mut self) {
        self.polls += 1;
        for id in std::mem::take(&mut self.pending_close) {
            if let Some(window) = self.windows.get_mut(&id) {
                window.should_close = true;
            }
        }
    }

    fn load_gl(&mut self, id: WindowId) -> Option<Rc<dyn GlApi>> {
        if self.current != Some(id) {
            return None;
        }
        let gl: Rc<dyn GlApi> = self
            .contexts
            .entry(id)
            .or_insert_with(|| Rc::new(HeadlessGl::new()))
            .clone();
        Some(gl)
    }
}
