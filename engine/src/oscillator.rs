use crate::preset::Spread;

pub const NUM_SUB_OSCILLATORS: usize = 3;

/// A single sine term of a wave line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubOscillator {
    pub frequency: f64,
    pub amplitude: f64,
    pub speed: f64,
    pub phase: f64,
}

impl SubOscillator {
    /// Value of this term at an already offset horizontal position.
    pub fn sample(&self, shifted_position: f64, time: f64) -> f64 {
        (shifted_position * self.frequency + time * self.speed + self.phase)
            .sin()
            * self.amplitude
    }
}

/// How a sub-oscillator relates to the fundamental of its line.
#[derive(Clone, Copy, Debug)]
pub struct Harmonic {
    pub frequency_ratio: Spread,
    pub speed_ratio: f64,
    /// Fraction of the line's current base amplitude.
    pub amplitude_fraction: f64,
}

pub const HARMONICS: [Harmonic; NUM_SUB_OSCILLATORS] = [
    Harmonic {
        frequency_ratio: Spread::new(0.4, 0.2),
        speed_ratio: 0.7,
        amplitude_fraction: 0.2,
    },
    Harmonic {
        frequency_ratio: Spread::new(0.8, 0.3),
        speed_ratio: 1.3,
        amplitude_fraction: 0.1,
    },
    Harmonic {
        frequency_ratio: Spread::new(1.5, 0.4),
        speed_ratio: 1.7,
        amplitude_fraction: 0.05,
    },
];

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn zero_amplitude_is_silent() {
        let osc = SubOscillator {
            frequency: 0.3,
            amplitude: 0.0,
            speed: 2.0,
            phase: 1.0,
        };
        assert_eq!(osc.sample(123.0, 4.5), 0.0);
    }

    #[test]
    fn peak_at_quarter_phase() {
        let osc = SubOscillator {
            frequency: 0.0,
            amplitude: 7.0,
            speed: 0.0,
            phase: FRAC_PI_2,
        };
        assert_abs_diff_eq!(osc.sample(1e9, -1e9), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn harmonic_balance_decreases() {
        for pair in HARMONICS.windows(2) {
            assert!(pair[0].amplitude_fraction > pair[1].amplitude_fraction);
        }
    }
}
