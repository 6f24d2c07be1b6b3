//! Drive a counting host on a rendering thread against the headless
//! platform, exercising resize, context loss and pause/resume.
//!
//! ```text
//! GLBRIDGE_LOG=debug cargo run -p headless
//! ```

use std::thread;
use std::time::{Duration, Instant};

use glbridge_core::{
    logging, HeadlessPlatform, RenderMode, RenderThread, RenderThreadOptions, ResizePolicy,
    SurfaceConfig, SurfaceHost, SurfaceSize,
};
use tracing::info;

#[derive(Debug, Default)]
struct SpinningHost {
    contexts: u32,
    frames: u64,
    angle: f32,
    size: Option<SurfaceSize>,
    last_frame: Option<Instant>,
}

impl SurfaceHost for SpinningHost {
    fn on_surface_ready(&mut self) -> anyhow::Result<()> {
        self.contexts += 1;
        info!(contexts = self.contexts, "context ready");
        Ok(())
    }

    fn on_render_frame(&mut self) -> anyhow::Result<()> {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| (now - last).as_secs_f32());
        self.last_frame = Some(now);
        self.angle = (self.angle + dt * 90.0) % 360.0;
        self.frames += 1;
        Ok(())
    }

    fn on_surface_resized(&mut self, size: SurfaceSize) -> anyhow::Result<()> {
        info!(?size, "resized");
        self.size = Some(size);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut host = SpinningHost::default();
    let mut platform = HeadlessPlatform::new();
    let options = RenderThreadOptions {
        resize_policy: ResizePolicy::Forward,
        ..RenderThreadOptions::default()
    };

    let stats = thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::Continuous,
            options,
        )?;

        thread::sleep(Duration::from_millis(200));
        render.resize(720, 1280)?;
        thread::sleep(Duration::from_millis(100));
        render.lose_context()?;
        thread::sleep(Duration::from_millis(100));
        render.pause()?;
        thread::sleep(Duration::from_millis(100));
        render.resume()?;
        thread::sleep(Duration::from_millis(100));
        render.shutdown()
    })?;

    info!(
        ?stats,
        host_frames = host.frames,
        angle = host.angle,
        size = ?host.size,
        "done"
    );
    println!(
        "{} frames across {} contexts, bound format {:?}",
        stats.frames,
        stats.surfaces_created,
        platform.bound_format()
    );
    Ok(())
}
