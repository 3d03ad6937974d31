//! Core Audio render callback that returns microphone input phase-inverted.
//!
//! ## Architecture
//!
//! ```text
//! Host I/O unit (render thread)
//!        ↓ AURenderCallback
//! render_callback::<U>  (render.rs)
//!        ↓ RenderUnit::render_input, bus 1
//! AudioUnitRender      (unit.rs)
//!        ↓ input written into the host's output buffers
//! invert_and_scale     (phaseflip-core)
//! ```
//!
//! Device enumeration, stream format negotiation and unit setup/teardown live in
//! the host application. This crate only provides what that code installs: a
//! [`RenderContext`] and the [`AURenderCallbackStruct`] pointing at it.
//!
//! ## Buffer Layout
//!
//! The callback expects 32-bit float samples. Each buffer is processed for
//! `frame_count * number_channels` samples, bounded by its `data_byte_size`,
//! so both non-interleaved and interleaved lists are handled without reading or
//! writing past the host's memory. The sample format itself is not checked.

pub mod buffers;
pub mod error;
pub mod render;
pub mod unit;

pub use buffers::{AudioBuffer, AudioBufferList, OwnedBufferList};
pub use error::{os_status, OSStatus, RenderError};
pub use render::{
    render_callback, AURenderCallback, AURenderCallbackStruct, AudioTimeStamp, RenderContext,
    SMPTETime,
};
#[cfg(target_os = "macos")]
pub use unit::AudioUnitHandle;
pub use unit::{RenderUnit, INPUT_BUS, OUTPUT_BUS};
