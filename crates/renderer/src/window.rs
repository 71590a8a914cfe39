use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{WindowBuilder, WindowId};

use crate::error::RendererError;
use crate::frame::{EventSource, FrameDriver, FrameState, InputEvent, Viewport};
use crate::gpu::GpuState;
use crate::program::LinkedProgram;
use crate::runtime::SystemClock;
use crate::types::RendererConfig;

/// Drains winit's queue without blocking, once per tick.
struct PumpedEvents<'a> {
    event_loop: &'a mut EventLoop<()>,
    window_id: WindowId,
}

impl EventSource for PumpedEvents<'_> {
    fn drain_events(&mut self) -> Vec<InputEvent> {
        let window_id = self.window_id;
        let mut pending = Vec::new();
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _| {
                if let Event::WindowEvent { window_id: id, event } = event {
                    if id == window_id {
                        if let Some(input) = translate(event) {
                            pending.push(input);
                        }
                    }
                }
            });
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop requested exit");
            pending.push(InputEvent::Quit);
        }
        pending
    }
}

fn translate(event: WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(InputEvent::Quit),
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key: Key::Named(NamedKey::Escape),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } => Some(InputEvent::Escape),
        _ => None,
    }
}

/// Opens the preview window and runs the frame driver until the user quits.
///
/// Teardown runs in reverse order of acquisition: GPU objects, then the
/// window, then the event loop.
pub(crate) fn run(config: &RendererConfig, program: LinkedProgram) -> Result<(), RendererError> {
    let mut event_loop = EventLoop::new()
        .map_err(|err| RendererError::SubsystemInit(format!("failed to create event loop: {err}")))?;

    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)
        .map_err(|err| RendererError::Context(format!("failed to create window: {err}")))?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let drawable = Viewport {
        width: size.width,
        height: size.height,
    };
    debug!(
        requested_width = width,
        requested_height = height,
        width = drawable.width,
        height = drawable.height,
        scale_factor = window.scale_factor(),
        "window created"
    );

    let mut gpu = GpuState::new(window.clone(), drawable, program)?;

    let mut events = PumpedEvents {
        event_loop: &mut event_loop,
        window_id: window.id(),
    };
    let mut driver = FrameDriver::new(
        FrameState::new(drawable.width, drawable.height),
        config.pacing,
        SystemClock::new(),
    );
    info!(
        target_fps = config.pacing.target_fps,
        capped = config.pacing.capped,
        "entering render loop"
    );
    driver.run(&mut events, &mut gpu);

    drop(gpu);
    drop(window);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_translates_to_physical_dimensions() {
        let event = WindowEvent::Resized(PhysicalSize::new(1024, 768));
        assert_eq!(
            translate(event),
            Some(InputEvent::Resized {
                width: 1024,
                height: 768
            })
        );
    }

    #[test]
    fn close_request_is_quit() {
        assert_eq!(translate(WindowEvent::CloseRequested), Some(InputEvent::Quit));
        assert_eq!(translate(WindowEvent::Destroyed), Some(InputEvent::Quit));
    }

    #[test]
    fn unrelated_events_are_ignored() {
        assert_eq!(translate(WindowEvent::Focused(true)), None);
    }
}
