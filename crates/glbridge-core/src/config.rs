//! Surface configuration: pixel format, context version, render mode.
//!
//! A [`SurfaceConfig`] is fixed when a bridge is constructed. The defaults
//! describe an OpenGL ES 2.0 context on an RGBA 8/8/8/8 surface with a 16-bit
//! depth buffer and no stencil buffer.

use std::time::Duration;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::ConfigError;

/// Highest GL ES major version a configuration may request.
pub const MAX_API_VERSION: u8 = 3;

/// Largest per-channel color size accepted by [`SurfaceConfig::validate`].
pub const MAX_CHANNEL_BITS: u8 = 16;

/// Bits per color channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBits {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl ColorBits {
    /// 8 bits per channel with alpha.
    pub const RGBA8888: Self = Self::new(8, 8, 8, 8);
    /// Packed 16-bit color, no alpha.
    pub const RGB565: Self = Self::new(5, 6, 5, 0);

    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Total bits per pixel across all channels.
    pub const fn total(&self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32 + self.alpha as u32
    }

    fn largest(&self) -> u8 {
        self.red.max(self.green).max(self.blue).max(self.alpha)
    }
}

/// Requested pixel and context format for a surface.
///
/// Immutable once built. Use the `with_*` methods to derive a variant from
/// [`SurfaceConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceConfig {
    color: ColorBits,
    depth_bits: u8,
    stencil_bits: u8,
    api_version: u8,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::new(ColorBits::RGBA8888, 16, 0, 2)
    }
}

impl SurfaceConfig {
    pub const fn new(color: ColorBits, depth_bits: u8, stencil_bits: u8, api_version: u8) -> Self {
        Self {
            color,
            depth_bits,
            stencil_bits,
            api_version,
        }
    }

    pub const fn with_color(self, color: ColorBits) -> Self {
        Self { color, ..self }
    }

    pub const fn with_depth_bits(self, depth_bits: u8) -> Self {
        Self { depth_bits, ..self }
    }

    pub const fn with_stencil_bits(self, stencil_bits: u8) -> Self {
        Self {
            stencil_bits,
            ..self
        }
    }

    pub const fn with_api_version(self, api_version: u8) -> Self {
        Self {
            api_version,
            ..self
        }
    }

    pub fn color(&self) -> ColorBits {
        self.color
    }

    pub fn depth_bits(&self) -> u8 {
        self.depth_bits
    }

    pub fn stencil_bits(&self) -> u8 {
        self.stencil_bits
    }

    /// GL ES major version of the context (the "client version").
    pub fn api_version(&self) -> u8 {
        self.api_version
    }

    /// Reject configurations no device could ever satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_API_VERSION).contains(&self.api_version) {
            return Err(ConfigError::ApiVersion(self.api_version));
        }
        if self.color.largest() > MAX_CHANNEL_BITS {
            return Err(ConfigError::ChannelBits(self.color.largest()));
        }
        if self.color.total() == 0 {
            return Err(ConfigError::NoColor);
        }
        Ok(())
    }
}

/// Whether frames are drawn every display refresh or only when requested.
///
/// Discriminants match the platform's raw render-mode constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum RenderMode {
    OnDemand = 0,
    Continuous = 1,
}

impl RenderMode {
    /// Decode a raw platform render-mode value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::from_u32(raw)
    }

    pub fn as_raw(self) -> u32 {
        self as u32
    }
}

/// What the bridge does with a surface resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizePolicy {
    /// Record the new size only. The host is not called.
    #[default]
    Ignore,
    /// Record the new size and call [`SurfaceHost::on_surface_resized`].
    ///
    /// [`SurfaceHost::on_surface_resized`]: crate::host::SurfaceHost::on_surface_resized
    Forward,
}

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for SurfaceSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Knobs for [`RenderThread`](crate::render_thread::RenderThread).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderThreadOptions {
    /// Time between frames in continuous mode.
    pub refresh_interval: Duration,
    /// Keep the context alive across pause/resume.
    pub preserve_context_on_pause: bool,
    /// Size reported to the host right after the surface is created.
    pub initial_size: SurfaceSize,
    pub resize_policy: ResizePolicy,
}

impl Default for RenderThreadOptions {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_micros(16_667),
            preserve_context_on_pause: false,
            initial_size: SurfaceSize::new(1280, 720),
            resize_policy: ResizePolicy::Ignore,
        }
    }
}
