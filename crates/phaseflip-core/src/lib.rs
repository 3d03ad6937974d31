//! Core types for the phaseflip render callback.
//!
//! This crate has no FFI and no platform code. It holds the two pieces of the
//! audio path that do not depend on the audio subsystem:
//!
//! - [`GainControl`]: the gain factor, shared lock-free between a control thread
//!   and the real-time render thread
//! - [`invert_and_scale`]: the per-sample transform, `sample = -sample * gain`
//!
//! Plus [`GainConfig`] for describing the starting gain and its ceiling.

pub mod config;
pub mod error;
pub mod gain;
pub mod transform;

pub use config::GainConfig;
pub use error::{ConfigError, Result};
pub use gain::{GainControl, MAX_GAIN, MIN_GAIN};
pub use transform::invert_and_scale;
