use crate::{
    amplitude,
    config::EngineConfig,
    control::ControlValue,
    preset::{self, INITIAL_TIME},
    sample::sample,
    surface::Surface,
    wave_line::WaveLine,
};
use rand::Rng;

/// Owns the wave lines and the global animation state. Each call to
/// `advance` computes one frame of samples for every line, smoothed against
/// the previous frame.
pub struct FrameCompositor {
    config: EngineConfig,
    lines: Vec<WaveLine>,
    time: f64,
    surface_width: u32,
    surface_height: u32,
    sample_count: usize,
    // Reused between lines and frames to avoid allocating every frame.
    scratch: Vec<f64>,
}

impl FrameCompositor {
    pub fn new(
        config: EngineConfig,
        lines: Vec<WaveLine>,
        initial_time: f64,
    ) -> Self {
        Self {
            config,
            lines,
            time: initial_time,
            surface_width: 0,
            surface_height: 0,
            sample_count: 0,
            scratch: Vec::new(),
        }
    }

    /// The default three lines with randomized parameters and a randomized
    /// starting time.
    pub fn with_default_lines<R: Rng + ?Sized>(
        config: EngineConfig,
        rng: &mut R,
    ) -> Self {
        let lines = preset::default_lines(rng);
        let initial_time = INITIAL_TIME.sample(rng);
        Self::new(config, lines, initial_time)
    }

    pub fn lines(&self) -> &[WaveLine] {
        &self.lines
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }

    /// Must be called with the initial surface size before the first frame,
    /// and again whenever the surface changes size. Smoothing history is
    /// discarded rather than resampled.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_width = width;
        self.surface_height = height;
        self.sample_count = self.config.sample_count(width);
        for line in &mut self.lines {
            line.reset_for_surface(height, self.sample_count);
        }
        log::info!(
            "Surface resized to {}x{} ({} samples per line)",
            width,
            height,
            self.sample_count
        );
    }

    /// Computes the next frame for every line.
    pub fn advance(&mut self, control_value: ControlValue) {
        self.time += self.config.time_step;
        let time = self.time;
        let retain = self.config.blend_retain;
        let blend_new = self.config.blend_new();
        amplitude::apply_all(control_value, &mut self.lines);
        for line in &mut self.lines {
            line.advance_horizontal_offset();
            let vertical_shift = line.vertical_shift(time);
            let vertical_center = line.vertical_center();
            self.scratch.clear();
            for i in 0..self.sample_count {
                let raw = vertical_center
                    + sample(i as f64, time, line)
                    + vertical_shift;
                let value = match line.previous_frame().get(i) {
                    Some(&previous) => previous * retain + raw * blend_new,
                    None => raw,
                };
                self.scratch.push(value);
            }
            // The old history ends up in `scratch` to be overwritten by the
            // next line.
            line.replace_previous_frame(&mut self.scratch);
        }
    }

    /// Draws the most recently computed frame. The first sample sits left
    /// of the visible area by the extension factor.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        let start_x = self.config.start_x(self.surface_width);
        for line in &self.lines {
            let points = line.previous_frame();
            if points.len() < 2 {
                continue;
            }
            surface.begin_path();
            surface.move_to(start_x, points[0]);
            for (i, &y) in points.iter().enumerate().skip(1) {
                surface.line_to(start_x + i as f64, y);
            }
            let params = line.params();
            surface.stroke(params.color, params.stroke_width);
        }
    }

    pub fn render_frame<S: Surface + ?Sized>(
        &mut self,
        control_value: ControlValue,
        surface: &mut S,
    ) {
        self.advance(control_value);
        self.draw(surface);
    }

    #[cfg(test)]
    pub(crate) fn lines_mut(&mut self) -> &mut [WaveLine] {
        &mut self.lines
    }
}
