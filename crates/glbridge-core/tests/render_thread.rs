//! Rendering thread tests.
//!
//! On-demand mode draws a pending frame before taking the next command off
//! the channel, so the sequences below are deterministic. Continuous-mode
//! tests only assert lower bounds.

mod common;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use common::{Call, RecordingHost};
use glbridge_core::{
    ConfigError, HeadlessPlatform, RenderMode, RenderThread, RenderThreadOptions, ResizePolicy,
    SurfaceConfig, SurfaceSize,
};

fn fast_options() -> RenderThreadOptions {
    RenderThreadOptions {
        refresh_interval: Duration::from_millis(1),
        initial_size: SurfaceSize::new(320, 240),
        ..RenderThreadOptions::default()
    }
}

#[test]
fn continuous_mode_draws_after_ready() {
    let mut host = RecordingHost::default();
    let mut platform = HeadlessPlatform::new();

    let stats = thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::Continuous,
            fast_options(),
        )
        .unwrap();
        thread::sleep(Duration::from_millis(30));
        render.shutdown()
    })
    .unwrap();

    assert!(stats.frames >= 1, "no frames drawn: {stats:?}");
    assert_eq!(stats.surfaces_created, 1);
    assert_eq!(host.frames() as u64, stats.frames);
    assert_eq!(host.calls[0], Call::Ready);
    host.assert_ready_before_frames();
}

#[test]
fn uncapped_continuous_mode_still_takes_commands() {
    let mut host = RecordingHost::default();
    let mut platform = HeadlessPlatform::new();
    let options = RenderThreadOptions {
        refresh_interval: Duration::ZERO,
        resize_policy: ResizePolicy::Forward,
        ..fast_options()
    };
    let (tx, rx) = mpsc::channel();

    let stats = thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::Continuous,
            options,
        )
        .unwrap();
        thread::sleep(Duration::from_millis(5));
        render.resize(800, 600).unwrap();
        render
            .queue_event(move |host: &mut RecordingHost| {
                tx.send(host.calls.last().cloned()).unwrap();
            })
            .unwrap();
        thread::sleep(Duration::from_millis(5));
        render.shutdown()
    })
    .unwrap();

    assert!(rx.try_recv().is_ok(), "queued event never ran");
    let resized_at = host
        .calls
        .iter()
        .position(|call| *call == Call::Resized(SurfaceSize::new(800, 600)))
        .expect("resize was not handled");
    assert!(host.calls[resized_at + 1..].contains(&Call::Frame));
    assert_eq!(host.frames() as u64, stats.frames);
    host.assert_ready_before_frames();
}

#[test]
fn on_demand_draws_once_per_request() {
    let mut host = RecordingHost::default();
    let mut platform = HeadlessPlatform::new();
    let (tx, rx) = mpsc::channel();

    let stats = thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::OnDemand,
            fast_options(),
        )
        .unwrap();

        let probe = |tx: mpsc::Sender<usize>| move |host: &mut RecordingHost| {
            tx.send(host.frames()).unwrap();
        };

        // Surface creation counts as a request.
        render.queue_event(probe(tx.clone())).unwrap();
        render.request_render().unwrap();
        render.queue_event(probe(tx.clone())).unwrap();
        render.request_render().unwrap();
        render.queue_event(probe(tx.clone())).unwrap();
        render.shutdown()
    })
    .unwrap();

    let seen: Vec<usize> = rx.try_iter().collect();
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(stats.frames, 3);
}

#[test]
fn initial_size_is_forwarded_after_ready() {
    let mut host = RecordingHost::default();
    let mut platform = HeadlessPlatform::new();
    let options = RenderThreadOptions {
        resize_policy: ResizePolicy::Forward,
        ..fast_options()
    };

    thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::OnDemand,
            options,
        )
        .unwrap();
        render.resize(800, 600).unwrap();
        render.shutdown()
    })
    .unwrap();

    assert_eq!(
        host.calls,
        vec![
            Call::Ready,
            Call::Resized(SurfaceSize::new(320, 240)),
            Call::Frame,
            Call::Resized(SurfaceSize::new(800, 600)),
            Call::Frame,
        ]
    );
}

#[test]
fn lost_context_is_recreated_before_the_next_frame() {
    let mut host = RecordingHost::default();
    let mut platform = HeadlessPlatform::new();

    let stats = thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::OnDemand,
            fast_options(),
        )
        .unwrap();
        render.lose_context().unwrap();
        render.shutdown()
    })
    .unwrap();

    assert_eq!(stats.surfaces_created, 2);
    assert_eq!(
        host.calls,
        vec![Call::Ready, Call::Frame, Call::Ready, Call::Frame]
    );
}

#[test]
fn pause_drops_context_unless_preserved() {
    for (preserve, expected_readies) in [(false, 2), (true, 1)] {
        let mut host = RecordingHost::default();
        let mut platform = HeadlessPlatform::new();
        let options = RenderThreadOptions {
            preserve_context_on_pause: preserve,
            ..fast_options()
        };

        thread::scope(|scope| {
            let render = RenderThread::spawn(
                scope,
                &mut host,
                SurfaceConfig::default(),
                &mut platform,
                RenderMode::OnDemand,
                options,
            )
            .unwrap();
            render.pause().unwrap();
            // Ignored while paused.
            render.request_render().unwrap();
            render.resume().unwrap();
            render.shutdown()
        })
        .unwrap();

        assert_eq!(host.readies(), expected_readies, "preserve = {preserve}");
        assert_eq!(host.frames(), 2, "preserve = {preserve}");
        host.assert_ready_before_frames();
    }
}

#[test]
fn host_error_stops_the_thread() {
    let mut host = RecordingHost::failing_on_frame(1);
    let mut platform = HeadlessPlatform::new();

    let err = thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::OnDemand,
            fast_options(),
        )
        .unwrap();
        render.shutdown()
    })
    .unwrap_err();

    assert_eq!(err.to_string(), "frame 1 failed");
    assert_eq!(host.calls, vec![Call::Ready, Call::Frame]);
}

#[test]
fn commands_fail_once_the_thread_has_exited() {
    let mut host = RecordingHost::failing_on_frame(1);
    let mut platform = HeadlessPlatform::new();

    thread::scope(|scope| {
        let render = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::OnDemand,
            fast_options(),
        )
        .unwrap();

        while !render.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(render.request_render().is_err());
        assert!(render.shutdown().is_err());
    });
}

#[test]
fn unavailable_config_fails_spawn() {
    let mut host = RecordingHost::default();
    let mut platform = HeadlessPlatform::with_formats(Vec::new());

    thread::scope(|scope| {
        let err = RenderThread::spawn(
            scope,
            &mut host,
            SurfaceConfig::default(),
            &mut platform,
            RenderMode::Continuous,
            fast_options(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Unavailable(_))
        ));
    });
    assert!(host.calls.is_empty());
}
