//! Render-surface lifecycle bridge.
//!
//! A platform owns a GPU-backed drawing surface and reports its lifecycle:
//! the context became valid, a frame is due, the surface changed size, the
//! context was lost. This crate turns those events into calls on a
//! [`SurfaceHost`], the object that does the actual rendering.
//!
//! # Overview
//!
//! - [`SurfaceConfig`] is the requested pixel/context format (defaults to
//!   GL ES 2.0, RGBA 8/8/8/8, 16-bit depth, no stencil).
//! - [`choose_format`] picks a device [`PixelFormat`] for a config.
//! - [`SurfacePlatform`] is what the bridge needs from the platform at
//!   construction; [`HeadlessPlatform`] is an in-memory implementation.
//! - [`RenderSurfaceBridge`] forwards lifecycle events to one host.
//! - [`RenderThread`] owns a bridge on a dedicated thread and drives it at
//!   the refresh cadence.
//! - [`logging::init`] installs a `tracing` subscriber.
//!
//! ```text
//!   platform ──events──► RenderSurfaceBridge ──hooks──► SurfaceHost
//!      ▲                        │
//!      └──── format / mode ─────┘  (construction only)
//! ```

pub mod bridge;
pub mod chooser;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod platform;
pub mod render_thread;

pub use bridge::{BridgeState, PlatformEvent, RenderSurfaceBridge};
pub use chooser::{choose_format, PixelFormat};
pub use config::{
    ColorBits, RenderMode, RenderThreadOptions, ResizePolicy, SurfaceConfig, SurfaceSize,
};
pub use error::{ConfigError, LifecycleError};
pub use host::SurfaceHost;
pub use platform::{HeadlessPlatform, SurfacePlatform};
pub use render_thread::{QueuedEvent, RenderStats, RenderThread};
