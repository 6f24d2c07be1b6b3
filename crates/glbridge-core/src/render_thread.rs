//! Dedicated rendering thread that owns a [`RenderSurfaceBridge`] and drives
//! it at the display refresh cadence.
//!
//! The thread is scoped ([`std::thread::Scope`]) so the host only needs to
//! outlive the scope, not be `'static`. All hooks run on this one thread;
//! the handle talks to it through a channel.
//!
//! Frame policy:
//! - [`RenderMode::Continuous`]: one frame every `refresh_interval`.
//! - [`RenderMode::OnDemand`]: one frame as soon as possible after each
//!   render request (requests that arrive before the frame is drawn are
//!   coalesced). Creating the surface, resizing it and resuming all count as
//!   requests.
//!
//! A pending frame is drawn before the next message is taken off the
//! channel. After every frame at least one waiting message is handled, so a
//! zero or overrun `refresh_interval` cannot starve commands.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Instant;

use anyhow::{anyhow, Context as _};
use tracing::{debug, error};

use crate::bridge::RenderSurfaceBridge;
use crate::config::{RenderMode, RenderThreadOptions, SurfaceConfig};
use crate::host::SurfaceHost;
use crate::platform::SurfacePlatform;

/// Work queued onto the rendering thread with access to the host.
pub type QueuedEvent<'env, H> = Box<dyn FnOnce(&mut H) + Send + 'env>;

enum Message<'env, H> {
    Resize(u32, u32),
    RequestRender,
    Pause,
    Resume,
    LoseContext,
    Queue(QueuedEvent<'env, H>),
    Shutdown,
}

/// What the thread did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Frames the host completed.
    pub frames: u64,
    /// Contexts the host accepted (1 + number of recreations).
    pub surfaces_created: u64,
}

/// Handle to a running rendering thread.
pub struct RenderThread<'scope, 'env, H> {
    tx: Sender<Message<'env, H>>,
    handle: ScopedJoinHandle<'scope, anyhow::Result<RenderStats>>,
}

impl<H> std::fmt::Debug for RenderThread<'_, '_, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderThread")
            .field("finished", &self.handle.is_finished())
            .finish_non_exhaustive()
    }
}

impl<'scope, 'env, H> RenderThread<'scope, 'env, H>
where
    H: SurfaceHost + Send + 'env,
{
    /// Construct a bridge for `host` and start driving it on a new thread.
    ///
    /// Construction happens on the calling thread, so an unavailable
    /// configuration is reported here rather than from [`shutdown`].
    ///
    /// [`shutdown`]: RenderThread::shutdown
    pub fn spawn<P: SurfacePlatform + ?Sized>(
        scope: &'scope Scope<'scope, 'env>,
        host: &'env mut H,
        config: SurfaceConfig,
        platform: &mut P,
        mode: RenderMode,
        options: RenderThreadOptions,
    ) -> anyhow::Result<Self> {
        let bridge = RenderSurfaceBridge::with_render_mode(host, config, platform, mode)?
            .with_resize_policy(options.resize_policy);

        let (tx, rx) = mpsc::channel();
        let driver = Driver {
            bridge,
            rx,
            options,
            paused: false,
            context_live: false,
            render_requested: false,
            next_frame: Instant::now(),
        };

        let handle = thread::Builder::new()
            .name("glbridge-render".into())
            .spawn_scoped(scope, move || driver.run())
            .context("failed to spawn render thread")?;

        Ok(Self { tx, handle })
    }

    pub fn resize(&self, width: u32, height: u32) -> anyhow::Result<()> {
        self.send(Message::Resize(width, height))
    }

    /// Ask for a frame. Only meaningful in [`RenderMode::OnDemand`].
    pub fn request_render(&self) -> anyhow::Result<()> {
        self.send(Message::RequestRender)
    }

    /// Stop drawing. Drops the context unless
    /// `preserve_context_on_pause` is set.
    pub fn pause(&self) -> anyhow::Result<()> {
        self.send(Message::Pause)
    }

    pub fn resume(&self) -> anyhow::Result<()> {
        self.send(Message::Resume)
    }

    /// Simulate the platform destroying the GPU context. A new one is created
    /// straight away unless the thread is paused.
    pub fn lose_context(&self) -> anyhow::Result<()> {
        self.send(Message::LoseContext)
    }

    /// Run `event` on the rendering thread with the host, in order with the
    /// other commands.
    pub fn queue_event(&self, event: impl FnOnce(&mut H) + Send + 'env) -> anyhow::Result<()> {
        self.send(Message::Queue(Box::new(event)))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Release the surface and wait for the thread.
    ///
    /// Returns the host's error if a hook failed. A panic inside a hook is
    /// resumed on the calling thread.
    pub fn shutdown(self) -> anyhow::Result<RenderStats> {
        // The thread may already have stopped on an error.
        let _ = self.tx.send(Message::Shutdown);
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }

    fn send(&self, message: Message<'env, H>) -> anyhow::Result<()> {
        self.tx
            .send(message)
            .map_err(|_| anyhow!("render thread has exited"))
    }
}

struct Driver<'env, H: SurfaceHost> {
    bridge: RenderSurfaceBridge<'env, H>,
    rx: Receiver<Message<'env, H>>,
    options: RenderThreadOptions,
    paused: bool,
    context_live: bool,
    render_requested: bool,
    next_frame: Instant,
}

impl<H: SurfaceHost> Driver<'_, H> {
    fn run(mut self) -> anyhow::Result<RenderStats> {
        let result = self.run_loop();
        self.bridge.release();

        let stats = RenderStats {
            frames: self.bridge.frame_index(),
            surfaces_created: self.bridge.surfaces_created(),
        };
        match result {
            Ok(()) => {
                debug!(?stats, "render thread finished");
                Ok(stats)
            }
            Err(err) => {
                error!(?stats, "render thread stopped: {err:#}");
                Err(err)
            }
        }
    }

    fn run_loop(&mut self) -> anyhow::Result<()> {
        self.create_surface()?;

        loop {
            if self.frame_due() {
                self.draw()?;
                if !self.drain_pending()? {
                    return Ok(());
                }
                continue;
            }

            let message = if self.wants_frame() {
                let wait = self.next_frame.saturating_duration_since(Instant::now());
                match self.rx.recv_timeout(wait) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => return Ok(()),
                }
            } else {
                match self.rx.recv() {
                    Ok(message) => message,
                    Err(_) => return Ok(()),
                }
            };

            match message {
                Message::Shutdown => return Ok(()),
                message => self.handle(message)?,
            }
        }
    }

    /// Handle waiting messages without blocking until the channel is empty
    /// or another frame is due. Takes at least one message if there is one.
    /// Returns `false` when the thread should stop.
    fn drain_pending(&mut self) -> anyhow::Result<bool> {
        loop {
            match self.rx.try_recv() {
                Ok(Message::Shutdown) | Err(TryRecvError::Disconnected) => return Ok(false),
                Ok(message) => self.handle(message)?,
                Err(TryRecvError::Empty) => return Ok(true),
            }
            if self.frame_due() {
                return Ok(true);
            }
        }
    }

    fn wants_frame(&self) -> bool {
        !self.paused
            && self.context_live
            && (self.bridge.render_mode() == RenderMode::Continuous || self.render_requested)
    }

    fn frame_due(&self) -> bool {
        self.wants_frame()
            && (self.bridge.render_mode() == RenderMode::OnDemand
                || Instant::now() >= self.next_frame)
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        self.render_requested = false;
        self.bridge.on_frame()?;

        let now = Instant::now();
        self.next_frame += self.options.refresh_interval;
        if self.next_frame < now {
            // Fell behind; don't try to catch up with a burst.
            self.next_frame = now + self.options.refresh_interval;
        }
        Ok(())
    }

    fn handle(&mut self, message: Message<'_, H>) -> anyhow::Result<()> {
        match message {
            Message::Resize(width, height) => {
                self.bridge.on_surface_resized(width, height)?;
                self.render_requested = true;
            }
            Message::RequestRender => self.render_requested = true,
            Message::Pause => {
                if !self.paused {
                    debug!(
                        preserve = self.options.preserve_context_on_pause,
                        "render thread paused"
                    );
                    self.paused = true;
                    if !self.options.preserve_context_on_pause {
                        self.lose_context()?;
                    }
                }
            }
            Message::Resume => {
                if self.paused {
                    debug!("render thread resumed");
                    self.paused = false;
                    if !self.context_live {
                        self.create_surface()?;
                    }
                    self.render_requested = true;
                    self.next_frame = Instant::now();
                }
            }
            Message::LoseContext => {
                self.lose_context()?;
                if !self.paused {
                    self.create_surface()?;
                }
            }
            Message::Queue(event) => event(self.bridge.host_mut()),
            Message::Shutdown => {}
        }
        Ok(())
    }

    fn create_surface(&mut self) -> anyhow::Result<()> {
        self.bridge.on_surface_created()?;
        self.context_live = true;

        let size = self.bridge.size().unwrap_or(self.options.initial_size);
        self.bridge.on_surface_resized(size.width, size.height)?;
        self.render_requested = true;
        self.next_frame = Instant::now();
        Ok(())
    }

    fn lose_context(&mut self) -> anyhow::Result<()> {
        if self.context_live {
            self.bridge.on_context_lost()?;
            self.context_live = false;
        }
        Ok(())
    }
}
