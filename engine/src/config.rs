use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Tunable constants of the frame compositor.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Amount added to the global animation time on every frame. Animation
    /// speed is tied to the frame count rather than to wall-clock time.
    pub time_step: f64,
    /// Weight given to the previous frame's sample when blending. The newly
    /// computed sample receives `1 - blend_retain`.
    pub blend_retain: f64,
    /// Fraction of the surface width by which the sample buffer extends
    /// beyond each visible edge.
    pub extension_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_step: 0.013,
            blend_retain: 0.85,
            extension_factor: 0.3,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let json_string = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(json_string.as_str())?;
        Ok(config.clamped())
    }

    /// Like `load` but logs a warning and falls back to the defaults on
    /// failure.
    pub fn load_(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Failed to load engine config from {}: {}",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Restricts each setting to the range where the animation stays
    /// stable. Values that aren't finite are replaced with the default.
    pub fn clamped(self) -> Self {
        let default = Self::default();
        let finite_or = |value: f64, default: f64| {
            if value.is_finite() { value } else { default }
        };
        let clamped = Self {
            time_step: finite_or(self.time_step, default.time_step),
            blend_retain: finite_or(self.blend_retain, default.blend_retain)
                .clamp(0.0, 1.0),
            extension_factor: finite_or(
                self.extension_factor,
                default.extension_factor,
            )
            .max(0.0),
        };
        if clamped != self {
            log::warn!("Engine config {:?} adjusted to {:?}", self, clamped);
        }
        clamped
    }

    pub fn blend_new(&self) -> f64 {
        1.0 - self.blend_retain
    }

    /// Number of horizontal sample positions needed to cover a surface of
    /// the given width plus the extension on both sides.
    pub fn sample_count(&self, surface_width: u32) -> usize {
        (surface_width as f64 * (1.0 + 2.0 * self.extension_factor)).ceil()
            as usize
    }

    /// Horizontal coordinate of the first sample.
    pub fn start_x(&self, surface_width: u32) -> f64 {
        -(surface_width as f64) * self.extension_factor
    }
}
