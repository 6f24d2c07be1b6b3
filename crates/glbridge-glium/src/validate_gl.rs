//! Check the live GL context against the requested surface configuration.

use glbridge_core::{ConfigError, SurfaceConfig, SurfaceSize};
use glium::{Api, Version};

/// GL ES major version a context version provides the features of.
///
/// Desktop GL 4.3 covers GL ES 3.0; GL 2.0 covers GL ES 2.0.
pub fn es_equivalent(version: &Version) -> u8 {
    match version {
        Version(Api::GlEs, major, _) => *major,
        Version(Api::Gl, major, minor) if (*major, *minor) >= (4, 3) => 3,
        Version(Api::Gl, major, _) if *major >= 2 => 2,
        Version(Api::Gl, _, _) => 1,
    }
}

/// Fail with [`ConfigError::Unavailable`] when the context the platform
/// created is weaker than `config` asked for.
///
/// Depth and stencil sizes the driver does not report are accepted.
pub fn check_context(
    config: &SurfaceConfig,
    version: &Version,
    depth_bits: Option<u16>,
    stencil_bits: Option<u16>,
) -> Result<(), ConfigError> {
    let too_small = |reported: Option<u16>, wanted: u8| {
        reported.is_some_and(|bits| bits < u16::from(wanted))
    };

    if es_equivalent(version) < config.api_version()
        || too_small(depth_bits, config.depth_bits())
        || too_small(stencil_bits, config.stencil_bits())
    {
        tracing::warn!(
            ?version,
            ?depth_bits,
            ?stencil_bits,
            ?config,
            "context does not satisfy surface configuration"
        );
        return Err(ConfigError::Unavailable(*config));
    }
    Ok(())
}

/// Drain the GL error queue so later checks only see new errors.
///
/// # Safety
///
/// Must be called with a valid OpenGL context current.
pub unsafe fn clear_gl_errors() {
    while gl::GetError() != gl::NO_ERROR {}
}

/// A surface dimension as a `GLsizei`, saturating at `GLsizei::MAX`.
pub fn viewport_extent(pixels: u32) -> gl::types::GLsizei {
    gl::types::GLsizei::try_from(pixels).unwrap_or(gl::types::GLsizei::MAX)
}

/// Point the viewport at the whole surface.
///
/// # Safety
///
/// Must be called with a valid OpenGL context current.
pub unsafe fn set_viewport(size: SurfaceSize) {
    gl::Viewport(
        0,
        0,
        viewport_extent(size.width),
        viewport_extent(size.height),
    );
}
