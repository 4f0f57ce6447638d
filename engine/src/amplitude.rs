use crate::{
    control::ControlValue, oscillator::HARMONICS, wave_line::WaveLine,
};

pub const MIN_SCALE: f64 = 0.05;
pub const MAX_SCALE: f64 = 5.0;

/// Amplitude multiplier for a control value. Linear from 0.05 at a control
/// value of 0 up to 5.0 at 100.
pub fn scale(control_value: ControlValue) -> f64 {
    MIN_SCALE + control_value.ratio_01() * (MAX_SCALE - MIN_SCALE)
}

/// Derives the effective amplitudes of `line` from its original base
/// amplitude. Nothing accumulates, so applying the same control value twice
/// yields the same result.
pub fn apply(control_value: ControlValue, line: &mut WaveLine) {
    let base_amplitude = line.original_base_amplitude() * scale(control_value);
    let sub_amplitudes =
        HARMONICS.map(|harmonic| base_amplitude * harmonic.amplitude_fraction);
    line.set_amplitudes(base_amplitude, sub_amplitudes);
}

pub fn apply_all<'a>(
    control_value: ControlValue,
    lines: impl IntoIterator<Item = &'a mut WaveLine>,
) {
    for line in lines {
        apply(control_value, line);
    }
}
