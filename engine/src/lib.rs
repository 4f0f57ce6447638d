//! Synthesis and smoothing engine for a set of animated wave lines whose
//! amplitude follows an externally supplied control value.
//!
//! Each frame the `FrameCompositor` advances a global time, scales every
//! line's amplitude from the current `ControlValue`, samples the sum of each
//! line's oscillators across the (extended) surface width and blends the
//! result with the previous frame. `RenderLoop` drives the compositor once
//! per display refresh.

pub mod amplitude;
pub mod compositor;
pub mod config;
pub mod control;
pub mod oscillator;
pub mod preset;
pub mod render_loop;
pub mod sample;
pub mod surface;
pub mod wave_line;

pub use compositor::FrameCompositor;
pub use config::EngineConfig;
pub use control::{ControlValue, SharedControlValue};
pub use oscillator::SubOscillator;
pub use preset::{DEFAULT_PRESETS, LinePreset, Spread};
pub use render_loop::{RenderLoop, StopHandle};
pub use sample::sample;
pub use surface::{Display, Rgba, Surface, SurfaceEvent};
pub use wave_line::{WaveLine, WaveLineParams};
