//! Shared test hosts.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use glbridge_core::{SurfaceHost, SurfaceSize};

/// One host callback, as observed by [`RecordingHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Ready,
    Frame,
    Resized(SurfaceSize),
}

/// Records every hook call and checks frames never overlap.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<Call>,
    in_frame: AtomicBool,
    /// Fail the Nth frame (1-based).
    pub fail_on_frame: Option<usize>,
}

impl RecordingHost {
    pub fn failing_on_frame(frame: usize) -> Self {
        Self {
            fail_on_frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn frames(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Frame).count()
    }

    pub fn readies(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Ready).count()
    }

    /// Every frame comes after at least one `Ready`.
    pub fn assert_ready_before_frames(&self) {
        let first_ready = self.calls.iter().position(|c| *c == Call::Ready);
        let first_frame = self.calls.iter().position(|c| *c == Call::Frame);
        if let Some(frame) = first_frame {
            let ready = first_ready.expect("frame without any ready call");
            assert!(ready < frame, "first frame before ready: {:?}", self.calls);
        }
    }
}

impl SurfaceHost for RecordingHost {
    fn on_surface_ready(&mut self) -> anyhow::Result<()> {
        self.calls.push(Call::Ready);
        Ok(())
    }

    fn on_render_frame(&mut self) -> anyhow::Result<()> {
        let reentered = self.in_frame.swap(true, Ordering::SeqCst);
        assert!(!reentered, "on_render_frame re-entered");

        self.calls.push(Call::Frame);
        let result = match self.fail_on_frame {
            Some(n) if self.frames() == n => Err(anyhow::anyhow!("frame {n} failed")),
            _ => Ok(()),
        };

        self.in_frame.store(false, Ordering::SeqCst);
        result
    }

    fn on_surface_resized(&mut self, size: SurfaceSize) -> anyhow::Result<()> {
        self.calls.push(Call::Resized(size));
        Ok(())
    }
}
