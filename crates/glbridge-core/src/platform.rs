//! Construction-time contract with the windowing platform.
//!
//! The platform lists the pixel formats the device offers, binds the one the
//! bridge chose and accepts a render mode. Lifecycle events flow the other
//! way, from the platform into
//! [`RenderSurfaceBridge::dispatch`](crate::bridge::RenderSurfaceBridge::dispatch).

use crate::chooser::PixelFormat;
use crate::config::{ColorBits, RenderMode};

/// Platform surface API consumed while a bridge is constructed.
pub trait SurfacePlatform {
    /// Formats the device can provide, in preference order.
    fn available_formats(&self) -> Vec<PixelFormat>;

    /// Create the surface with the chosen format.
    ///
    /// This is also the window format request: the window buffer takes the
    /// format's color layout, so the default configuration asks for an
    /// RGBA 8888 window.
    fn bind_format(&mut self, format: &PixelFormat) -> anyhow::Result<()>;

    /// Select how often frames are scheduled.
    fn set_render_mode(&mut self, mode: RenderMode);
}

/// In-memory platform with a fixed format list. No window, no GPU.
///
/// Records what the bridge asked of it so tests can assert on it.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    formats: Vec<PixelFormat>,
    bound: Option<PixelFormat>,
    modes: Vec<RenderMode>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// A platform offering a typical phone GPU's formats.
    pub fn new() -> Self {
        Self::with_formats(vec![
            PixelFormat {
                color: ColorBits::RGB565,
                depth_bits: 16,
                stencil_bits: 0,
                max_api_version: 3,
            },
            PixelFormat {
                color: ColorBits::RGBA8888,
                depth_bits: 24,
                stencil_bits: 8,
                max_api_version: 3,
            },
            PixelFormat {
                color: ColorBits::RGBA8888,
                depth_bits: 16,
                stencil_bits: 0,
                max_api_version: 2,
            },
        ])
    }

    pub fn with_formats(formats: Vec<PixelFormat>) -> Self {
        Self {
            formats,
            bound: None,
            modes: Vec::new(),
        }
    }

    /// The format most recently bound by a bridge.
    pub fn bound_format(&self) -> Option<PixelFormat> {
        self.bound
    }

    /// Color layout of the window buffer, once a format is bound.
    pub fn window_format(&self) -> Option<ColorBits> {
        self.bound.map(|format| format.color)
    }

    /// Every render mode requested, in order.
    pub fn render_modes(&self) -> &[RenderMode] {
        &self.modes
    }
}

impl SurfacePlatform for HeadlessPlatform {
    fn available_formats(&self) -> Vec<PixelFormat> {
        self.formats.clone()
    }

    fn bind_format(&mut self, format: &PixelFormat) -> anyhow::Result<()> {
        tracing::debug!(?format, "headless surface bound");
        self.bound = Some(*format);
        Ok(())
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        self.modes.push(mode);
    }
}
