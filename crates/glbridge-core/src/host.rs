//! The [`SurfaceHost`] trait: the interface render code implements to be
//! driven by a [`RenderSurfaceBridge`](crate::bridge::RenderSurfaceBridge).
//!
//! The bridge calls [`SurfaceHost::on_surface_ready`] whenever a GPU context
//! becomes valid, then [`SurfaceHost::on_render_frame`] once per frame.

use crate::config::SurfaceSize;

/// Render callbacks invoked by the bridge on the rendering thread.
///
/// All hooks run sequentially on one thread. Errors are not handled by the
/// bridge; they are returned to whatever drives it.
///
/// # Example
///
/// ```rust,ignore
/// struct Scene {
///     programs_built: bool,
/// }
///
/// impl SurfaceHost for Scene {
///     fn on_surface_ready(&mut self) -> anyhow::Result<()> {
///         // The previous context (if any) is gone; rebuild GPU resources.
///         self.programs_built = true;
///         Ok(())
///     }
///
///     fn on_render_frame(&mut self) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait SurfaceHost {
    /// Called when the GPU context becomes valid, including after the
    /// context was lost and recreated. Allocate GPU resources here.
    fn on_surface_ready(&mut self) -> anyhow::Result<()>;

    /// Called once per frame after the surface is ready. The platform
    /// presents the result when this returns.
    fn on_render_frame(&mut self) -> anyhow::Result<()>;

    /// Called when the drawable area changes, only if the bridge was built
    /// with [`ResizePolicy::Forward`](crate::config::ResizePolicy::Forward).
    fn on_surface_resized(&mut self, _size: SurfaceSize) -> anyhow::Result<()> {
        Ok(())
    }
}
