use crate::{
    compositor::FrameCompositor,
    control::SharedControlValue,
    surface::{Display, SurfaceEvent},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Requests that a loop stop at its next opportunity. Cloned handles refer
/// to the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives the compositor once per display refresh. The control value is
/// read once at the start of each frame, after pending surface events have
/// been handled.
pub struct RenderLoop {
    compositor: FrameCompositor,
    control_value: SharedControlValue,
    stop: StopHandle,
    events: Vec<SurfaceEvent>,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new(
        compositor: FrameCompositor,
        control_value: SharedControlValue,
    ) -> Self {
        Self {
            compositor,
            control_value,
            stop: StopHandle::new(),
            events: Vec::new(),
            frame_count: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Handles pending events then renders and presents a single frame.
    /// Returns `false` without rendering once the loop has been asked to
    /// stop.
    pub fn tick<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
    ) -> anyhow::Result<bool> {
        display.poll_events(&mut self.events);
        for event in self.events.drain(..) {
            match event {
                SurfaceEvent::Resized { width, height } => {
                    self.compositor.resize(width, height)
                }
                SurfaceEvent::Quit => self.stop.stop(),
            }
        }
        if self.stop.is_stopped() {
            return Ok(false);
        }
        let control_value = self.control_value.get();
        self.compositor.render_frame(control_value, display);
        display.present()?;
        self.frame_count += 1;
        Ok(true)
    }

    /// Sizes the compositor for the display then renders frames until
    /// stopped.
    pub fn run<D: Display + ?Sized>(
        &mut self,
        display: &mut D,
    ) -> anyhow::Result<()> {
        self.compositor.resize(display.width(), display.height());
        log::info!("Starting render loop");
        while self.tick(display)? {}
        log::info!("Render loop stopped after {} frames", self.frame_count);
        Ok(())
    }
}
