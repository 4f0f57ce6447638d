use crate::{
    oscillator::{NUM_SUB_OSCILLATORS, SubOscillator},
    surface::Rgba,
};

/// Parameters of a wave line which are fixed once the line is created.
#[derive(Clone, Debug)]
pub struct WaveLineParams {
    pub color: Rgba,
    pub stroke_width: f32,
    /// Position of the baseline as a fraction of the surface height.
    pub vertical_fraction: f64,
    /// Amplitude of the fundamental at creation time. This is the reference
    /// that the control value scales.
    pub base_amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    pub speed: f64,
    pub horizontal_speed: f64,
    pub initial_horizontal_offset: f64,
    pub float_speed: f64,
    pub float_amplitude: f64,
    pub sub_oscillators: [SubOscillator; NUM_SUB_OSCILLATORS],
}

/// One animated waveform track: a fundamental plus a fixed set of
/// sub-oscillators, and the previous frame's samples used for smoothing.
#[derive(Clone, Debug)]
pub struct WaveLine {
    params: WaveLineParams,
    base_amplitude: f64,
    horizontal_offset: f64,
    vertical_center: f64,
    sub_oscillators: [SubOscillator; NUM_SUB_OSCILLATORS],
    previous_frame: Vec<f64>,
}

impl WaveLine {
    pub fn new(params: WaveLineParams) -> Self {
        Self {
            base_amplitude: params.base_amplitude,
            horizontal_offset: params.initial_horizontal_offset,
            vertical_center: 0.0,
            sub_oscillators: params.sub_oscillators,
            previous_frame: Vec::new(),
            params,
        }
    }

    pub fn params(&self) -> &WaveLineParams {
        &self.params
    }

    pub fn original_base_amplitude(&self) -> f64 {
        self.params.base_amplitude
    }

    /// The current effective amplitude of the fundamental.
    pub fn base_amplitude(&self) -> f64 {
        self.base_amplitude
    }

    pub fn horizontal_offset(&self) -> f64 {
        self.horizontal_offset
    }

    pub fn vertical_center(&self) -> f64 {
        self.vertical_center
    }

    pub fn sub_oscillators(&self) -> &[SubOscillator; NUM_SUB_OSCILLATORS] {
        &self.sub_oscillators
    }

    pub fn previous_frame(&self) -> &[f64] {
        &self.previous_frame
    }

    /// The fundamental term expressed as an oscillator with the current
    /// effective amplitude.
    pub fn fundamental(&self) -> SubOscillator {
        SubOscillator {
            frequency: self.params.frequency,
            amplitude: self.base_amplitude,
            speed: self.params.speed,
            phase: self.params.phase,
        }
    }

    /// Replaces the effective amplitudes. The caller derives them from the
    /// original base amplitude.
    pub(crate) fn set_amplitudes(
        &mut self,
        base_amplitude: f64,
        sub_amplitudes: [f64; NUM_SUB_OSCILLATORS],
    ) {
        self.base_amplitude = base_amplitude;
        for (osc, amplitude) in
            self.sub_oscillators.iter_mut().zip(sub_amplitudes)
        {
            osc.amplitude = amplitude;
        }
    }

    pub(crate) fn advance_horizontal_offset(&mut self) {
        self.horizontal_offset += self.params.horizontal_speed;
    }

    /// Slow vertical drift of the whole line, independent of the wave. Two
    /// terms so the bobbing isn't perfectly periodic.
    pub fn vertical_shift(&self, time: f64) -> f64 {
        let WaveLineParams {
            float_speed,
            float_amplitude,
            ..
        } = self.params;
        (time * float_speed).sin() * float_amplitude
            + (time * float_speed * 1.5).cos() * (float_amplitude * 0.4)
    }

    /// Moves the baseline for a new surface height and discards smoothing
    /// history, filling it with the new baseline.
    pub(crate) fn reset_for_surface(
        &mut self,
        surface_height: u32,
        sample_count: usize,
    ) {
        self.vertical_center =
            surface_height as f64 * self.params.vertical_fraction;
        self.previous_frame.clear();
        self.previous_frame.resize(sample_count, self.vertical_center);
    }

    pub(crate) fn replace_previous_frame(&mut self, frame: &mut Vec<f64>) {
        std::mem::swap(&mut self.previous_frame, frame);
    }

    #[cfg(test)]
    pub(crate) fn previous_frame_mut(&mut self) -> &mut Vec<f64> {
        &mut self.previous_frame
    }
}
