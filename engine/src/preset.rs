use crate::{
    oscillator::{HARMONICS, SubOscillator},
    surface::Rgba,
    wave_line::{WaveLine, WaveLineParams},
};
use rand::Rng;
use std::f64::consts::TAU;

/// A value drawn uniformly from `[base, base + spread)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spread {
    pub base: f64,
    pub spread: f64,
}

impl Spread {
    pub const fn new(base: f64, spread: f64) -> Self {
        Self { base, spread }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.base + rng.random::<f64>() * self.spread
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.base && value <= self.base + self.spread
    }
}

const PHASE: Spread = Spread::new(0.0, TAU);
const INITIAL_HORIZONTAL_OFFSET: Spread = Spread::new(0.0, 1000.0);

/// Ranges from which the parameters of a wave line are drawn.
#[derive(Clone, Copy, Debug)]
pub struct LinePreset {
    pub color: Rgba,
    pub stroke_width: f32,
    pub vertical_fraction: f64,
    pub base_amplitude: Spread,
    pub frequency: Spread,
    pub speed: Spread,
    pub horizontal_speed: Spread,
    pub float_speed: Spread,
    pub float_amplitude: Spread,
}

impl LinePreset {
    pub fn params<R: Rng + ?Sized>(&self, rng: &mut R) -> WaveLineParams {
        let base_amplitude = self.base_amplitude.sample(rng);
        let frequency = self.frequency.sample(rng);
        let speed = self.speed.sample(rng);
        let sub_oscillators = HARMONICS.map(|harmonic| SubOscillator {
            frequency: frequency * harmonic.frequency_ratio.sample(rng),
            amplitude: base_amplitude * harmonic.amplitude_fraction,
            speed: speed * harmonic.speed_ratio,
            phase: PHASE.sample(rng),
        });
        WaveLineParams {
            color: self.color,
            stroke_width: self.stroke_width,
            vertical_fraction: self.vertical_fraction,
            base_amplitude,
            frequency,
            phase: PHASE.sample(rng),
            speed,
            horizontal_speed: self.horizontal_speed.sample(rng),
            initial_horizontal_offset: INITIAL_HORIZONTAL_OFFSET.sample(rng),
            float_speed: self.float_speed.sample(rng),
            float_amplitude: self.float_amplitude.sample(rng),
            sub_oscillators,
        }
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> WaveLine {
        WaveLine::new(self.params(rng))
    }
}

pub const DEFAULT_PRESETS: [LinePreset; 3] = [
    // red, upper third
    LinePreset {
        color: Rgba::with_alpha_01(255, 89, 94, 0.8),
        stroke_width: 3.0,
        vertical_fraction: 0.3,
        base_amplitude: Spread::new(120.0, 50.0),
        frequency: Spread::new(0.0025, 0.0018),
        speed: Spread::new(0.025, 0.015),
        horizontal_speed: Spread::new(1.8, 0.5),
        float_speed: Spread::new(0.0015, 0.0005),
        float_amplitude: Spread::new(40.0, 25.0),
    },
    // blue, middle
    LinePreset {
        color: Rgba::with_alpha_01(76, 201, 240, 0.8),
        stroke_width: 3.5,
        vertical_fraction: 0.5,
        base_amplitude: Spread::new(150.0, 60.0),
        frequency: Spread::new(0.002, 0.0015),
        speed: Spread::new(0.02, 0.015),
        horizontal_speed: Spread::new(1.3, 0.4),
        float_speed: Spread::new(0.0012, 0.0005),
        float_amplitude: Spread::new(50.0, 30.0),
    },
    // violet, lower third
    LinePreset {
        color: Rgba::with_alpha_01(189, 178, 255, 0.8),
        stroke_width: 2.8,
        vertical_fraction: 0.7,
        base_amplitude: Spread::new(100.0, 45.0),
        frequency: Spread::new(0.0028, 0.002),
        speed: Spread::new(0.028, 0.018),
        horizontal_speed: Spread::new(2.0, 0.6),
        float_speed: Spread::new(0.0018, 0.0006),
        float_amplitude: Spread::new(45.0, 25.0),
    },
];

/// Randomized starting point of the global animation time.
pub const INITIAL_TIME: Spread = Spread::new(0.0, 100.0);

pub fn default_lines<R: Rng + ?Sized>(rng: &mut R) -> Vec<WaveLine> {
    DEFAULT_PRESETS
        .iter()
        .map(|preset| preset.build(rng))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn parameters_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            for preset in &DEFAULT_PRESETS {
                let params = preset.params(&mut rng);
                assert!(preset.base_amplitude.contains(params.base_amplitude));
                assert!(preset.frequency.contains(params.frequency));
                assert!(preset.speed.contains(params.speed));
                assert!(
                    preset.horizontal_speed.contains(params.horizontal_speed)
                );
                assert!(preset.float_speed.contains(params.float_speed));
                assert!(preset.float_amplitude.contains(params.float_amplitude));
                assert!(PHASE.contains(params.phase));
                assert!(
                    INITIAL_HORIZONTAL_OFFSET
                        .contains(params.initial_horizontal_offset)
                );
                for (osc, harmonic) in
                    params.sub_oscillators.iter().zip(HARMONICS.iter())
                {
                    let ratio = osc.frequency / params.frequency;
                    assert!(ratio >= harmonic.frequency_ratio.base - 1e-9);
                    assert!(
                        ratio
                            <= harmonic.frequency_ratio.base
                                + harmonic.frequency_ratio.spread
                                + 1e-9
                    );
                    assert!(PHASE.contains(osc.phase));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_lines() {
        let a = default_lines(&mut StdRng::seed_from_u64(42));
        let b = default_lines(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.len(), 3);
        for (a, b) in a.iter().zip(b.iter()) {
            assert_eq!(a.params().frequency, b.params().frequency);
            assert_eq!(a.params().sub_oscillators, b.params().sub_oscillators);
        }
    }

    #[test]
    fn lines_are_not_uniform() {
        let lines = default_lines(&mut StdRng::seed_from_u64(3));
        assert_ne!(lines[0].params().phase, lines[1].params().phase);
        assert_ne!(
            lines[0].horizontal_offset(),
            lines[2].horizontal_offset()
        );
    }

    #[test]
    fn baselines_are_spread_vertically() {
        let fractions = DEFAULT_PRESETS.map(|p| p.vertical_fraction);
        assert_eq!(fractions, [0.3, 0.5, 0.7]);
    }
}
