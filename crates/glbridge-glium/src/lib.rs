//! Render into a bridged surface with glium.
//!
//! [`GliumHost`] implements [`SurfaceHost`]: when the platform reports a new
//! GL context it wraps that context in a glium [`Context`], checks it against
//! the [`SurfaceConfig`], and initialises your [`GliumRenderer`]. Each frame
//! it hands the renderer a [`Frame`] targeting the surface.
//!
//! ### Warning
//!
//! The hooks assume the platform has made the surface's context current on
//! the calling thread, as a rendering thread does. Using the host anywhere
//! else is undefined behavior at the GL level.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use anyhow::{anyhow, Context as _};
use glbridge_core::{SurfaceConfig, SurfaceHost, SurfaceSize};
use glium::{backend::Context, CapabilitiesSource, Frame};
use tracing::{debug, trace};

mod gl_backend;
pub mod glsl;
pub mod validate_gl;

pub use glsl::GlslVersion;

/// Rendering code driven by a [`GliumHost`].
pub trait GliumRenderer {
    /// Build programs and buffers on a fresh context.
    ///
    /// Called again after the context is lost. Objects built on the previous
    /// context must be passed to [`std::mem::forget`], not dropped: dropping a
    /// glium object issues `glDelete*` with its old name, and that name may
    /// already belong to something in the new context.
    fn init(&mut self, ctx: &Rc<Context>, glsl: Option<GlslVersion>) -> anyhow::Result<()>;

    /// Draw one frame.
    fn draw(&mut self, frame: &mut Frame) -> anyhow::Result<()>;

    /// The surface changed size. The viewport has already been updated.
    fn resized(&mut self, _size: SurfaceSize) {}
}

struct LiveContext {
    ctx: Rc<Context>,
    backend: Rc<gl_backend::SurfaceBackend>,
}

/// Leak whatever `slot` holds from a context that no longer exists. Running
/// its destructors would delete GL names in whichever context is current now.
fn abandon_stale<T>(slot: &mut Option<T>) -> bool {
    match slot.take() {
        Some(stale) => {
            std::mem::forget(stale);
            true
        }
        None => false,
    }
}

/// A [`SurfaceHost`] that drives a [`GliumRenderer`].
///
/// Build the bridge with
/// [`ResizePolicy::Forward`](glbridge_core::ResizePolicy::Forward) so the
/// frame size follows the surface.
pub struct GliumHost<R> {
    renderer: R,
    config: SurfaceConfig,
    size: SurfaceSize,
    live: Option<LiveContext>,
    frame_counter: u64,
}

impl<R> Debug for GliumHost<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GliumHost")
            .field("config", &self.config)
            .field("size", &self.size)
            .field("live", &self.live.is_some())
            .field("frame_counter", &self.frame_counter)
            .finish()
    }
}

impl<R: GliumRenderer> GliumHost<R> {
    /// `config` must be the one the bridge was built with. `size` is used
    /// until the first resize arrives.
    pub fn new(renderer: R, config: SurfaceConfig, size: SurfaceSize) -> Self {
        Self {
            renderer,
            config,
            size,
            live: None,
            frame_counter: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The glium context for the current GL context, if one is live.
    pub fn context(&self) -> Option<&Rc<Context>> {
        self.live.as_ref().map(|live| &live.ctx)
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}

impl<R: GliumRenderer> SurfaceHost for GliumHost<R> {
    fn on_surface_ready(&mut self) -> anyhow::Result<()> {
        if abandon_stale(&mut self.live) {
            debug!("abandoned glium state of the lost context");
        }

        gl_backend::load_gl_functions();
        let backend = Rc::new(gl_backend::SurfaceBackend::new(self.size));
        debug!("BACKEND: {backend:?}");

        let ctx = unsafe {
            Context::new(
                backend.clone(),
                false,
                glium::debug::DebugCallbackBehavior::Ignore,
            )
        }
        .map_err(|e| anyhow!("GL context is not usable by glium: {e:?}"))?;

        debug!("OPENGL_VERSION {}", ctx.get_opengl_version_string());

        let caps = ctx.get_capabilities();
        validate_gl::check_context(
            &self.config,
            ctx.get_opengl_version(),
            caps.depth_bits,
            caps.stencil_bits,
        )?;

        let glsl = glsl::best_shading_language(&caps.supported_glsl_versions);
        debug!(?glsl, "VALID VERSIONS: {:?}", caps.supported_glsl_versions);

        unsafe {
            validate_gl::clear_gl_errors();
            validate_gl::set_viewport(self.size);
        }

        self.renderer
            .init(&ctx, glsl)
            .context("renderer init failed")?;
        self.live = Some(LiveContext { ctx, backend });
        Ok(())
    }

    fn on_render_frame(&mut self) -> anyhow::Result<()> {
        let live = self
            .live
            .as_ref()
            .ok_or_else(|| anyhow!("frame requested without a live GL context"))?;

        let size = live.backend.size();
        let mut frame = Frame::new(live.ctx.clone(), (size.width, size.height));
        let drawn = self.renderer.draw(&mut frame);
        // A glium frame must be finished even when drawing failed.
        let finished = frame.finish();

        drawn?;
        finished.map_err(|e| anyhow!("frame finish failed: {e:?}"))?;

        trace!(frame = self.frame_counter, ?size, "RENDERED");
        self.frame_counter += 1;
        Ok(())
    }

    fn on_surface_resized(&mut self, size: SurfaceSize) -> anyhow::Result<()> {
        self.size = size;
        if let Some(live) = &self.live {
            live.backend.set_size(size);
            unsafe { validate_gl::set_viewport(size) };
        }
        self.renderer.resized(size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sizes: Vec<SurfaceSize>,
    }

    impl GliumRenderer for Recorder {
        fn init(&mut self, _ctx: &Rc<Context>, _glsl: Option<GlslVersion>) -> anyhow::Result<()> {
            Ok(())
        }

        fn draw(&mut self, _frame: &mut Frame) -> anyhow::Result<()> {
            Ok(())
        }

        fn resized(&mut self, size: SurfaceSize) {
            self.sizes.push(size);
        }
    }

    #[test]
    fn frame_without_context_is_an_error() {
        let mut host = GliumHost::new(
            Recorder::default(),
            SurfaceConfig::default(),
            SurfaceSize::new(64, 64),
        );
        let err = host.on_render_frame().unwrap_err();
        assert!(err.to_string().contains("without a live GL context"));
        assert_eq!(host.frame_counter(), 0);
        assert!(host.context().is_none());
    }

    #[test]
    fn stale_context_state_is_leaked_not_dropped() {
        let marker = Rc::new(());
        let mut slot = Some(Rc::clone(&marker));

        assert!(abandon_stale(&mut slot));
        assert!(slot.is_none());
        assert_eq!(Rc::strong_count(&marker), 2);

        assert!(!abandon_stale(&mut slot));
    }

    #[test]
    fn resize_before_context_reaches_renderer() {
        let mut host = GliumHost::new(
            Recorder::default(),
            SurfaceConfig::default(),
            SurfaceSize::new(64, 64),
        );
        host.on_surface_resized(SurfaceSize::new(800, 480)).unwrap();
        assert_eq!(host.renderer().sizes, vec![SurfaceSize::new(800, 480)]);
    }
}
