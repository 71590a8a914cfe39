//! Render loop state machine.
//!
//! ```text
//!   Running ──(quit / escape)──▶ Stopping ──(loop exits)──▶ Stopped
//!     │  ▲
//!     └──┘ tick: drain events → uniforms → draw/present → pace → frame += 1
//! ```
//!
//! Shader time is quantised to the frame counter (`frame / target_fps`) so a
//! slow frame never makes the animation jump. Everything here is independent
//! of winit and wgpu: events arrive as [`InputEvent`]s from an
//! [`EventSource`], pixels go out through a [`FrameTarget`], and pacing runs
//! on a [`FrameClock`].

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::runtime::FrameClock;
use crate::types::FramePacing;

/// Window and input events the loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The drawable area changed size (physical pixels).
    Resized { width: u32, height: u32 },
    /// The window was closed or the event loop is going away.
    Quit,
    /// The escape key went down.
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Running,
    Stopping,
    Stopped,
}

/// Area of the surface the quad is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Values pushed into `glx_Resolution` and `glx_Time` for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
}

/// Everything a [`FrameTarget`] needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub frame: u64,
    pub viewport: Viewport,
    pub uniforms: FrameUniforms,
}

/// Mutable loop state: tracked viewport, frame counter and run phase.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    width: u32,
    height: u32,
    frame: u64,
    phase: DriverPhase,
}

impl FrameState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame: 0,
            phase: DriverPhase::Running,
        }
    }

    /// Applies one event. Resizes overwrite the tracked size immediately.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Resized { width, height } => {
                debug!(width, height, "viewport resized");
                self.width = width;
                self.height = height;
            }
            InputEvent::Quit | InputEvent::Escape => {
                if self.phase == DriverPhase::Running {
                    info!(?event, frame = self.frame, "stopping render loop");
                    self.phase = DriverPhase::Stopping;
                }
            }
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == DriverPhase::Running
    }

    /// Seconds of shader time at the current frame.
    pub fn time(&self, target_fps: u32) -> f32 {
        (self.frame as f64 / f64::from(target_fps.max(1))) as f32
    }

    pub fn uniforms(&self, target_fps: u32) -> FrameUniforms {
        FrameUniforms {
            resolution: [self.width as f32, self.height as f32],
            time: self.time(target_fps),
        }
    }

    fn advance(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }
}

#[derive(Debug, Error)]
pub enum DrawError {
    /// The frame was not shown but the next one may be.
    #[error("frame dropped: {0}")]
    Dropped(String),

    /// The render target cannot be drawn to again.
    #[error("render target lost: {0}")]
    Fatal(String),
}

/// Something that can clear, draw the quad into and present a frame.
pub trait FrameTarget {
    fn draw(&mut self, inputs: &FrameInputs) -> Result<(), DrawError>;
}

/// Source of pending window/input events, drained once per tick.
pub trait EventSource {
    fn drain_events(&mut self) -> Vec<InputEvent>;
}

/// Runs ticks against a [`FrameTarget`] until a quit is seen.
pub struct FrameDriver<C: FrameClock> {
    state: FrameState,
    pacing: FramePacing,
    clock: C,
}

impl<C: FrameClock> FrameDriver<C> {
    pub fn new(state: FrameState, pacing: FramePacing, clock: C) -> Self {
        Self {
            state,
            pacing,
            clock,
        }
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    pub fn pacing(&self) -> FramePacing {
        self.pacing
    }

    /// Performs one tick and returns the phase afterwards.
    ///
    /// A tick that sees a quit event ends before drawing.
    pub fn tick<I, T>(&mut self, events: I, target: &mut T) -> DriverPhase
    where
        I: IntoIterator<Item = InputEvent>,
        T: FrameTarget + ?Sized,
    {
        let started = self.clock.now();
        self.tick_since(started, events, target)
    }

    /// Finishes a tick that began at `started`; pacing counts from there.
    fn tick_since<I, T>(&mut self, started: Duration, events: I, target: &mut T) -> DriverPhase
    where
        I: IntoIterator<Item = InputEvent>,
        T: FrameTarget + ?Sized,
    {
        for event in events {
            self.state.apply(event);
        }
        if !self.state.is_running() {
            return self.state.phase;
        }

        let inputs = FrameInputs {
            frame: self.state.frame,
            viewport: self.state.viewport(),
            uniforms: self.state.uniforms(self.pacing.target_fps),
        };
        match target.draw(&inputs) {
            Ok(()) => {}
            Err(err @ DrawError::Dropped(_)) => {
                warn!(frame = inputs.frame, "{err}");
            }
            Err(err @ DrawError::Fatal(_)) => {
                warn!(frame = inputs.frame, "{err}; stopping render loop");
                self.state.phase = DriverPhase::Stopping;
                return self.state.phase;
            }
        }

        let elapsed = self.clock.now().saturating_sub(started);
        self.log_frame_rate(elapsed);
        if let Some(pause) = self.pacing.pause_after(elapsed) {
            self.clock.sleep(pause);
        }

        self.state.advance();
        self.state.phase
    }

    /// Ticks until the loop leaves [`DriverPhase::Running`], then marks it stopped.
    pub fn run<E, T>(&mut self, events: &mut E, target: &mut T) -> &FrameState
    where
        E: EventSource + ?Sized,
        T: FrameTarget + ?Sized,
    {
        while self.state.is_running() {
            let started = self.clock.now();
            let pending = events.drain_events();
            self.tick_since(started, pending, target);
        }
        self.state.phase = DriverPhase::Stopped;
        info!(frames = self.state.frame, "render loop stopped");
        &self.state
    }

    fn log_frame_rate(&self, elapsed: Duration) {
        if self.state.frame % u64::from(self.pacing.target_fps.max(1)) != 0 {
            return;
        }
        let busy = elapsed.as_secs_f64();
        if busy > 0.0 {
            debug!(
                frame = self.state.frame,
                busy_ms = busy * 1000.0,
                unpaced_fps = (1.0 / busy).round(),
                "frame stats"
            );
        }
    }
}
