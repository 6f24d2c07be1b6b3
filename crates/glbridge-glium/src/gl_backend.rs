//! glium [`Backend`] over whatever GL context the platform made current on
//! the rendering thread. The backend owns no context; it only reports the
//! surface size and resolves GL symbols.

use std::cell::Cell;
use std::os::raw::c_void;
use std::sync::Once;

use glbridge_core::SurfaceSize;
use glium::backend::Backend;
use glium::SwapBuffersError;

static LOAD_GL: Once = Once::new();

/// Resolve the `gl` crate's function pointers. Runs at most once per process.
pub(crate) fn load_gl_functions() {
    LOAD_GL.call_once(|| {
        gl_loader::init_gl();
        gl::load_with(|symbol| gl_loader::get_proc_address(symbol).cast());
        tracing::debug!("GL functions loaded");
    });
}

#[derive(Debug)]
pub(crate) struct SurfaceBackend {
    size: Cell<SurfaceSize>,
}

impl SurfaceBackend {
    pub(crate) fn new(size: SurfaceSize) -> Self {
        Self {
            size: Cell::new(size),
        }
    }

    pub(crate) fn set_size(&self, size: SurfaceSize) {
        self.size.set(size);
    }

    pub(crate) fn size(&self) -> SurfaceSize {
        self.size.get()
    }
}

/// # Safety
///
/// Only valid inside surface hooks on the rendering thread, where the
/// platform keeps the surface's context current for the whole call.
unsafe impl Backend for SurfaceBackend {
    fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        // Presenting is the platform's job once the frame hook returns.
        Ok(())
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        gl_loader::get_proc_address(symbol).cast()
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        let size = self.size.get();
        (size.width, size.height)
    }

    fn is_current(&self) -> bool {
        true
    }

    unsafe fn make_current(&self) {}

    fn resize(&self, (width, height): (u32, u32)) {
        self.set_size(SurfaceSize::new(width, height));
    }
}
