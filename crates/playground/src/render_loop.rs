use std::time::Duration;

use crate::bridge::ShaderBackend;
use crate::uniforms::UniformStore;

/// Scale applied to elapsed host milliseconds to produce `u_time`.
pub const DEFAULT_TIME_SCALE: f32 = 0.01;

/// Host hook that schedules the next frame callback.
pub trait TickScheduler {
    fn request_next_tick(&mut self);
}

/// Counts tick requests; used by headless drivers and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Consumes one pending request.
    pub fn take(&mut self) -> bool {
        if self.requested > 0 {
            self.requested -= 1;
            true
        } else {
            false
        }
    }
}

impl TickScheduler for ManualScheduler {
    fn request_next_tick(&mut self) {
        self.requested += 1;
    }
}

/// Per-frame driver: advances `u_time`, draws, asks for the next frame.
///
/// Time is derived from the host-supplied elapsed time and only ever moves
/// forward; there is no pause or reset.
#[derive(Debug)]
pub struct RenderLoop {
    time_scale: f32,
    time: f32,
    frames: u64,
}

impl RenderLoop {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale,
            time: 0.0,
            frames: 0,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Runs one frame. `elapsed` is the host's time since the loop started.
    pub fn tick<B, S>(
        &mut self,
        elapsed: Duration,
        store: &mut UniformStore,
        backend: &mut B,
        scheduler: &mut S,
    ) where
        B: ShaderBackend + ?Sized,
        S: TickScheduler + ?Sized,
    {
        let millis = elapsed.as_secs_f64() * 1000.0;
        let scaled = (millis * f64::from(self.time_scale)) as f32;
        self.time = self.time.max(scaled);
        store.set_time(self.time);

        if let Err(err) = backend.draw(&store.snapshot()) {
            tracing::warn!(frame = self.frames, "frame draw failed: {err:#}");
        }
        self.frames = self.frames.saturating_add(1);

        scheduler.request_next_tick();
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}
