//! Shading language detection.

use glium::{Api, Version};

/// Shading languages a renderer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// GLSL ES 3.00 (`#version 300 es`).
    Es300,
    /// GLSL ES 1.00 (`#version 100`), the GL ES 2.0 language.
    Es100,
    Glsl140,
    Glsl120,
}

impl GlslVersion {
    /// The `#version` line for shader sources.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es",
            Self::Es100 => "#version 100",
            Self::Glsl140 => "#version 140",
            Self::Glsl120 => "#version 120",
        }
    }
}

/// Pick the best shading language out of the versions a context supports.
///
/// ES languages are preferred over desktop GLSL; newer over older.
pub fn best_shading_language(supported: &[Version]) -> Option<GlslVersion> {
    let has = |api: Api, major: u8, minor: u8| {
        supported
            .iter()
            .any(|v| v.0 == api && v.1 == major && v.2 == minor)
    };

    [
        (Api::GlEs, 3, 0, GlslVersion::Es300),
        (Api::GlEs, 1, 0, GlslVersion::Es100),
        (Api::Gl, 1, 4, GlslVersion::Glsl140),
        (Api::Gl, 1, 2, GlslVersion::Glsl120),
    ]
    .into_iter()
    .find(|&(api, major, minor, _)| has(api, major, minor))
    .map(|(_, _, _, glsl)| glsl)
}
