//! The real-time render callback.
//!
//! The host's I/O unit calls [`render_callback`] once per hardware buffer
//! period. Each call:
//!
//! 1. Pulls `frame_count` frames of microphone input (input bus 1) into the
//!    host's buffer list
//! 2. Replaces every sample with `-sample * gain`, reading the gain once
//! 3. Returns `noErr` so the host forwards the buffer to the output device
//!
//! If the pull fails its status is returned unchanged and the buffers are left
//! alone. Retrying, muting or tearing down the stream is up to the host.
//!
//! # Real-Time Safety
//!
//! Nothing on this path allocates, locks, logs or makes a syscall of its own.
//! The only shared state is the [`GainControl`], read with one atomic load.
//!
//! # Installing the Callback
//!
//! Device setup is not part of this crate. The setup code creates a
//! [`RenderContext`], keeps it alive (and at a fixed address) for as long as
//! the callback is installed, and passes [`RenderContext::callback_struct`] to
//! `kAudioUnitProperty_SetRenderCallback`.

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};

use phaseflip_core::{invert_and_scale, GainControl};

use crate::buffers::AudioBufferList;
use crate::error::{os_status, OSStatus};
use crate::unit::{RenderUnit, INPUT_BUS};

// =============================================================================
// Timing Types
// =============================================================================

/// SMPTE time structure.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SMPTETime {
    pub subframes: i16,
    pub subframe_divisor: i16,
    pub counter: u32,
    pub smpte_type: u32,
    pub flags: u32,
    pub hours: i16,
    pub minutes: i16,
    pub seconds: i16,
    pub frames: i16,
}

/// Audio timestamp structure from Core Audio.
///
/// The callback never reads it; the pointer is handed to the pull unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioTimeStamp {
    /// Sample time
    pub sample_time: f64,
    /// Host time (Mach absolute time)
    pub host_time: u64,
    /// Rate scalar
    pub rate_scalar: f64,
    /// Word clock time
    pub word_clock_time: u64,
    /// SMPTE time
    pub smpte_time: SMPTETime,
    /// Flags indicating which fields are valid
    pub flags: u32,
    /// Reserved
    pub reserved: u32,
}

// =============================================================================
// Callback ABI
// =============================================================================

/// C signature of `AURenderCallback`.
pub type AURenderCallback = unsafe extern "C" fn(
    in_ref_con: *mut c_void,
    io_action_flags: *mut u32,
    in_time_stamp: *const AudioTimeStamp,
    in_bus_number: u32,
    in_number_frames: u32,
    io_data: *mut AudioBufferList,
) -> OSStatus;

/// `AURenderCallbackStruct`, the value of `kAudioUnitProperty_SetRenderCallback`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AURenderCallbackStruct {
    pub input_proc: Option<AURenderCallback>,
    pub input_proc_ref_con: *mut c_void,
}

// =============================================================================
// Render Context
// =============================================================================

/// Everything the callback needs, passed to it as `inRefCon`.
///
/// Holds the render unit handle and a borrow of the gain. Neither is owned in
/// any meaningful sense: the unit belongs to the device-setup code and the gain
/// belongs to whoever created it (often [`GainControl::global`]).
pub struct RenderContext<'g, U: RenderUnit> {
    unit: U,
    gain: &'g GainControl,
    input_bus: u32,
}

impl<'g, U: RenderUnit> RenderContext<'g, U> {
    /// Create a context that pulls from [`INPUT_BUS`].
    pub fn new(unit: U, gain: &'g GainControl) -> Self {
        Self {
            unit,
            gain,
            input_bus: INPUT_BUS,
        }
    }

    /// Pull from a different bus of the unit.
    pub fn with_input_bus(mut self, bus: u32) -> Self {
        self.input_bus = bus;
        self
    }

    /// The render unit.
    pub fn unit(&self) -> &U {
        &self.unit
    }

    /// The gain read on every render call.
    pub fn gain(&self) -> &'g GainControl {
        self.gain
    }

    /// Package [`render_callback`] and a pointer to this context for installation.
    ///
    /// The context must not move or drop while the callback is installed.
    pub fn callback_struct(&self) -> AURenderCallbackStruct {
        log::debug!(
            "Render callback context at {:p}, pulling input bus {}",
            self,
            self.input_bus
        );
        AURenderCallbackStruct {
            input_proc: Some(render_callback::<U>),
            input_proc_ref_con: self as *const Self as *mut c_void,
        }
    }

    /// Pull input into `io_data` and phase-invert it in place.
    ///
    /// `io_data` is both the pull target and the output: the unit writes
    /// microphone samples into the host's output buffers and they are
    /// transformed where they lie. Null and zero-length buffers are skipped.
    ///
    /// Returns the pull status unchanged on failure, without touching the buffers.
    ///
    /// # Safety
    ///
    /// - `io_data` must be null or a valid host buffer list whose non-null
    ///   buffers hold `data_byte_size` bytes of `f32` samples
    /// - `action_flags` and `timestamp` must be valid for the unit's pull
    /// - Must only be called from the render thread
    pub unsafe fn render(
        &self,
        action_flags: *mut u32,
        timestamp: *const AudioTimeStamp,
        frame_count: u32,
        io_data: *mut AudioBufferList,
    ) -> OSStatus {
        if io_data.is_null() {
            return os_status::K_AUDIO_UNIT_ERR_INVALID_PARAMETER;
        }

        // SAFETY: io_data is non-null and the pointers are the host's for this call.
        let status = unsafe {
            self.unit
                .render_input(action_flags, timestamp, self.input_bus, frame_count, io_data)
        };
        if status != os_status::NO_ERR {
            return status;
        }

        // Read once so every sample of this period uses the same gain
        let gain = self.gain.get();

        // SAFETY: io_data is a valid buffer list per the caller contract.
        let buffers = unsafe { AudioBufferList::buffers_mut(io_data) };
        for buffer in buffers.iter() {
            // SAFETY: the host owns the sample memory for this call and nothing
            // else references it while we transform.
            if let Some(samples) = unsafe { buffer.samples_mut(frame_count) } {
                invert_and_scale(samples, gain);
            }
        }

        os_status::NO_ERR
    }
}

/// The `AURenderCallback` entry point.
///
/// `in_ref_con` must be the pointer from [`RenderContext::callback_struct`]
/// with the same `U`. A null context or buffer list returns
/// `kAudioUnitErr_InvalidParameter`. A panic is contained and returned as
/// `kAudioUnitErr_CannotDoInCurrentContext` instead of unwinding into the host.
///
/// `in_bus_number` is the output bus the host is rendering; input is always
/// pulled from the context's input bus.
///
/// # Safety
///
/// - `in_ref_con` must be null or point to a live `RenderContext<U>`
/// - The remaining pointers must satisfy [`RenderContext::render`]
pub unsafe extern "C" fn render_callback<U: RenderUnit>(
    in_ref_con: *mut c_void,
    io_action_flags: *mut u32,
    in_time_stamp: *const AudioTimeStamp,
    _in_bus_number: u32,
    in_number_frames: u32,
    io_data: *mut AudioBufferList,
) -> OSStatus {
    if in_ref_con.is_null() {
        return os_status::K_AUDIO_UNIT_ERR_INVALID_PARAMETER;
    }

    // SAFETY: non-null, and the installer guarantees it points to a live
    // RenderContext<U> that does not move while installed.
    let context = unsafe { &*(in_ref_con as *const RenderContext<'_, U>) };

    catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: pointers come straight from the host for this render call.
        unsafe { context.render(io_action_flags, in_time_stamp, in_number_frames, io_data) }
    }))
    .unwrap_or(os_status::K_AUDIO_UNIT_ERR_CANNOT_DO_IN_CURRENT_CONTEXT)
}
