//! Runtime configuration shared by the GL context and the window system.

/// Tunables for context creation and resource limits.
///
/// The defaults request an OpenGL 3.3 core context with vsync enabled,
/// which is what every shader shipped with the demos targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Requested context version as `(major, minor)`.
    pub gl_version: (u32, u32),
    /// Request a core profile context (no legacy fixed-function calls).
    pub core_profile: bool,
    /// Frames to wait between buffer swaps; 0 disables vsync.
    pub swap_interval: u32,
    /// Number of texture units accepted by `Texture2D::bind`.
    pub max_texture_units: u32,
    /// Upper bound on the shader/program info log length in bytes.
    pub info_log_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gl_version: (3, 3),
            core_profile: true,
            swap_interval: 1,
            max_texture_units: 16,
            info_log_max: 1024,
        }
    }
}

impl Config {
    pub const SWAP_INTERVAL_ENV: &'static str = "FLOW_GL_SWAP_INTERVAL";
    pub const VERSION_ENV: &'static str = "FLOW_GL_VERSION";

    /// Defaults, overridden by `FLOW_GL_SWAP_INTERVAL` and `FLOW_GL_VERSION`
    /// (formatted as `major.minor`) when they are set and parse.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(Self::SWAP_INTERVAL_ENV) {
            match raw.trim().parse() {
                Ok(interval) => config.swap_interval = interval,
                Err(_) => log::warn!("Ignoring {}={raw:?}: not a number", Self::SWAP_INTERVAL_ENV),
            }
        }
        if let Ok(raw) = std::env::var(Self::VERSION_ENV) {
            match parse_version(&raw) {
                Some(version) => config.gl_version = version,
                None => log::warn!("Ignoring {}={raw:?}: expected major.minor", Self::VERSION_ENV),
            }
        }
        config
    }

    pub fn with_swap_interval(mut self, interval: u32) -> Self {
        self.swap_interval = interval;
        self
    }

    pub fn with_gl_version(mut self, major: u32, minor: u32) -> Self {
        self.gl_version = (major, minor);
        self
    }
}

fn parse_version(raw: &str) -> Option<(u32, u32)> {
    let (major, minor) = raw.trim().split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_versions() {
        assert_eq!(parse_version("4.1"), Some((4, 1)));
        assert_eq!(parse_version(" 3.3 "), Some((3, 3)));
        assert_eq!(parse_version("4"), None);
        assert_eq!(parse_version("a.b"), None);
    }
}
