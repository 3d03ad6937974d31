//! # phaseflip
//!
//! Real-time microphone passthrough with polarity inversion.
//!
//! On every hardware buffer period the render callback pulls microphone input,
//! replaces each sample with `-sample * gain`, and hands the buffer back to the
//! output device. The gain can be changed from any thread while audio runs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use phaseflip::prelude::*;
//!
//! // Device setup (not part of phaseflip) produces an initialized I/O unit.
//! let unit = unsafe { AudioUnitHandle::from_raw(raw_unit) }.expect("null AudioUnit");
//!
//! let gain = GainConfig::new().with_initial_gain(0.5).build()?;
//! let context = Box::new(RenderContext::new(unit, &gain));
//!
//! // Hand this to kAudioUnitProperty_SetRenderCallback and keep `context` alive.
//! let callback = context.callback_struct();
//!
//! // Later, from the UI thread:
//! gain.set(0.8);
//! ```

// Re-export sub-crates
pub use phaseflip_au as au;
pub use phaseflip_core as core;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use phaseflip::prelude::*;
/// ```
pub mod prelude {
    pub use phaseflip_core::{
        // Gain state
        GainControl, MAX_GAIN, MIN_GAIN,
        // Transform
        invert_and_scale,
        // Configuration
        ConfigError, GainConfig,
    };

    pub use phaseflip_au::{
        // Callback
        render_callback, AURenderCallbackStruct, RenderContext, RenderUnit,
        // Buffers and timing
        AudioBuffer, AudioBufferList, AudioTimeStamp, OwnedBufferList,
        // Status codes
        os_status, OSStatus, RenderError,
        // Buses
        INPUT_BUS, OUTPUT_BUS,
    };

    #[cfg(target_os = "macos")]
    pub use phaseflip_au::AudioUnitHandle;
}
