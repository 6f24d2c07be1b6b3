//! Pixel format selection.
//!
//! Picks the first device format whose color channels match the request
//! exactly, whose depth and stencil buffers are at least as large as
//! requested, and whose context supports the requested GL ES version.

use crate::config::{ColorBits, SurfaceConfig};
use crate::error::ConfigError;

/// One pixel/context format a device can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub color: ColorBits,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    /// Highest GL ES major version a context on this format can have.
    pub max_api_version: u8,
}

impl PixelFormat {
    pub fn satisfies(&self, config: &SurfaceConfig) -> bool {
        self.color == config.color()
            && self.depth_bits >= config.depth_bits()
            && self.stencil_bits >= config.stencil_bits()
            && self.max_api_version >= config.api_version()
    }
}

impl From<&SurfaceConfig> for PixelFormat {
    fn from(config: &SurfaceConfig) -> Self {
        Self {
            color: config.color(),
            depth_bits: config.depth_bits(),
            stencil_bits: config.stencil_bits(),
            max_api_version: config.api_version(),
        }
    }
}

/// Choose a format for `config` out of `available`, in order.
pub fn choose_format(
    config: &SurfaceConfig,
    available: &[PixelFormat],
) -> Result<PixelFormat, ConfigError> {
    config.validate()?;

    available
        .iter()
        .find(|format| format.satisfies(config))
        .copied()
        .ok_or(ConfigError::Unavailable(*config))
}
