//! [`RenderSurfaceBridge`] adapts platform surface lifecycle events into
//! calls on a [`SurfaceHost`].
//!
//! ```text
//!   construct ──► ContextPending ──created──► Ready ◄──┐
//!                       ▲                      │  │     │ frame / resized
//!                       └──── context lost ────┘  └─────┘
//!
//!   release (from any state) ──► Released   (terminal, no more host calls)
//! ```
//!
//! The bridge borrows its host for its whole lifetime. It never owns or
//! drops the host, and the borrow checker keeps the host alive for as long
//! as the bridge exists.

use std::fmt::{Debug, Formatter};

use tracing::{debug, trace};

use crate::chooser::{choose_format, PixelFormat};
use crate::config::{RenderMode, ResizePolicy, SurfaceConfig, SurfaceSize};
use crate::error::LifecycleError;
use crate::host::SurfaceHost;
use crate::platform::SurfacePlatform;

/// Where the bridge is in the surface lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeState {
    /// Constructed, or the context was lost; waiting for a valid context.
    ContextPending,
    /// A context is valid and the host has been told about it.
    Ready,
    /// Torn down by the platform.
    Released,
}

/// A lifecycle event delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformEvent {
    SurfaceCreated,
    Frame,
    Resized(SurfaceSize),
    ContextLost,
    Released,
}

/// Forwards surface lifecycle events to exactly one host.
pub struct RenderSurfaceBridge<'h, H: SurfaceHost + ?Sized> {
    host: &'h mut H,
    config: SurfaceConfig,
    format: PixelFormat,
    mode: RenderMode,
    resize_policy: ResizePolicy,
    state: BridgeState,
    size: Option<SurfaceSize>,
    frame_index: u64,
    surfaces_created: u64,
}

impl<H: SurfaceHost + ?Sized> Debug for RenderSurfaceBridge<'_, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurfaceBridge")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("mode", &self.mode)
            .field("resize_policy", &self.resize_policy)
            .field("state", &self.state)
            .field("size", &self.size)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl<'h, H: SurfaceHost + ?Sized> RenderSurfaceBridge<'h, H> {
    /// Create a bridge that draws continuously.
    ///
    /// Chooses a pixel format matching `config` from the platform's list,
    /// binds it, and selects [`RenderMode::Continuous`]. Fails with
    /// [`ConfigError`](crate::error::ConfigError) when no format fits.
    pub fn new<P: SurfacePlatform + ?Sized>(
        host: &'h mut H,
        config: SurfaceConfig,
        platform: &mut P,
    ) -> anyhow::Result<Self> {
        Self::with_render_mode(host, config, platform, RenderMode::Continuous)
    }

    /// Like [`RenderSurfaceBridge::new`], with an explicit render mode.
    pub fn with_render_mode<P: SurfacePlatform + ?Sized>(
        host: &'h mut H,
        config: SurfaceConfig,
        platform: &mut P,
        mode: RenderMode,
    ) -> anyhow::Result<Self> {
        let format = choose_format(&config, &platform.available_formats())?;
        platform.bind_format(&format)?;
        platform.set_render_mode(mode);

        debug!(?config, ?format, ?mode, "surface bridge constructed");

        Ok(Self {
            host,
            config,
            format,
            mode,
            resize_policy: ResizePolicy::default(),
            state: BridgeState::ContextPending,
            size: None,
            frame_index: 0,
            surfaces_created: 0,
        })
    }

    /// Choose whether resizes reach the host.
    pub fn with_resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize_policy = policy;
        self
    }

    /// The GPU context became valid (first time or after loss).
    pub fn on_surface_created(&mut self) -> anyhow::Result<()> {
        self.ensure_live()?;
        debug!(previous = ?self.state, "surface created");

        // Stay pending until the host has accepted the new context.
        self.state = BridgeState::ContextPending;
        self.host.on_surface_ready()?;
        self.state = BridgeState::Ready;
        self.surfaces_created += 1;
        Ok(())
    }

    /// One display refresh.
    pub fn on_frame(&mut self) -> anyhow::Result<()> {
        match self.state {
            BridgeState::Ready => {}
            BridgeState::Released => return Err(LifecycleError::Released.into()),
            pending => return Err(LifecycleError::SurfaceNotReady(pending).into()),
        }

        trace!(frame = self.frame_index, "frame");
        self.host.on_render_frame()?;
        self.frame_index += 1;
        Ok(())
    }

    /// The drawable area changed.
    pub fn on_surface_resized(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        self.ensure_live()?;
        let size = SurfaceSize::new(width, height);
        debug!(?size, policy = ?self.resize_policy, "surface resized");
        self.size = Some(size);

        if self.resize_policy == ResizePolicy::Forward && self.state == BridgeState::Ready {
            self.host.on_surface_resized(size)?;
        }
        Ok(())
    }

    /// The GPU context was destroyed. The host is told again once a new
    /// context is created.
    pub fn on_context_lost(&mut self) -> anyhow::Result<()> {
        self.ensure_live()?;
        if self.state == BridgeState::Ready {
            debug!("context lost");
            self.state = BridgeState::ContextPending;
        }
        Ok(())
    }

    /// The platform tore the surface down. Idempotent.
    pub fn release(&mut self) {
        if self.state != BridgeState::Released {
            debug!(frames = self.frame_index, "surface released");
            self.state = BridgeState::Released;
        }
    }

    /// Route a platform event to the matching hook.
    pub fn dispatch(&mut self, event: PlatformEvent) -> anyhow::Result<()> {
        match event {
            PlatformEvent::SurfaceCreated => self.on_surface_created(),
            PlatformEvent::Frame => self.on_frame(),
            PlatformEvent::Resized(size) => self.on_surface_resized(size.width, size.height),
            PlatformEvent::ContextLost => self.on_context_lost(),
            PlatformEvent::Released => {
                self.release();
                Ok(())
            }
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    pub fn resize_policy(&self) -> ResizePolicy {
        self.resize_policy
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The pixel format the platform bound for this surface.
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Last size reported by the platform, if any.
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    /// Number of frames the host has completed.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Number of times the host accepted a new context.
    pub fn surfaces_created(&self) -> u64 {
        self.surfaces_created
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    /// Mutable access to the host, for work queued onto the rendering thread.
    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }

    fn ensure_live(&self) -> Result<(), LifecycleError> {
        if self.state == BridgeState::Released {
            return Err(LifecycleError::Released);
        }
        Ok(())
    }
}
