use std::fmt;

use crate::{
    error::{Error, Result},
    window::{Glfw, MonitorInfo},
};

/// A connected monitor. Monitors belong to the window system and are never
/// destroyed through this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monitor {
    info: MonitorInfo,
}

impl Monitor {
    pub const TYPE_NAME: &'static str = "gl.glfw.Monitor";

    pub fn primary(glfw: &Glfw) -> Result<Self> {
        glfw.system()
            .primary_monitor()
            .map(|info| Self { info })
            .ok_or_else(|| Error::Index("No monitor is connected".to_string()))
    }

    /// The monitor at `index` in the connected-monitor list.
    pub fn from_index(glfw: &Glfw, index: usize) -> Result<Self> {
        glfw.system()
            .monitors()
            .into_iter()
            .nth(index)
            .map(|info| Self { info })
            .ok_or_else(|| Error::Index(format!("Monitor {index} does not exist!")))
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn index(&self) -> usize {
        self.info.index
    }

    pub(crate) fn info(&self) -> &MonitorInfo {
        &self.info
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} name={:?}>", Self::TYPE_NAME, self.info.name)
    }
}
