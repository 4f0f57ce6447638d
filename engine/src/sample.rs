use crate::wave_line::WaveLine;

/// Vertical displacement of `line` at horizontal sample `position` and
/// global `time`. The fundamental and every sub-oscillator are evaluated at
/// the position shifted by the line's horizontal offset.
pub fn sample(position: f64, time: f64, line: &WaveLine) -> f64 {
    let shifted_position = position + line.horizontal_offset();
    line.sub_oscillators().iter().fold(
        line.fundamental().sample(shifted_position, time),
        |acc, osc| acc + osc.sample(shifted_position, time),
    )
}
