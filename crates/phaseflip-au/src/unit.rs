//! The pull-input seam between the render callback and the audio unit.
//!
//! [`RenderUnit`] is the one operation the callback needs from the audio unit:
//! render `frame_count` frames of one bus into a buffer list. On macOS,
//! [`AudioUnitHandle`] implements it with `AudioUnitRender`. Tests substitute
//! their own implementation.

#[cfg(target_os = "macos")]
use std::ffi::c_void;

use crate::buffers::AudioBufferList;
use crate::error::OSStatus;
use crate::render::AudioTimeStamp;

/// Output element of an I/O unit (speaker side).
pub const OUTPUT_BUS: u32 = 0;

/// Input element of an I/O unit (microphone side).
pub const INPUT_BUS: u32 = 1;

/// Source of input audio for the render callback.
///
/// # Aliasing Contract
///
/// The callback passes the host's own output buffer list as `io_data`. The
/// implementation writes input samples straight into it, and the callback then
/// transforms them in place. No intermediate buffer exists, so nothing is
/// allocated or copied on the render thread.
pub trait RenderUnit: Send + Sync {
    /// Render `frame_count` frames of `bus_number` into `io_data`.
    ///
    /// Returns [`NO_ERR`](crate::error::os_status::NO_ERR) on success. Any other
    /// status means `io_data` holds undefined samples.
    ///
    /// # Safety
    ///
    /// - `io_data` must point to a valid buffer list for the duration of the call
    /// - `action_flags` and `timestamp` must be the host's pointers for this render call
    /// - Must only be called from the render thread
    unsafe fn render_input(
        &self,
        action_flags: *mut u32,
        timestamp: *const AudioTimeStamp,
        bus_number: u32,
        frame_count: u32,
        io_data: *mut AudioBufferList,
    ) -> OSStatus;
}

/// Non-owning handle to a Core Audio `AudioUnit`.
///
/// The unit is created, configured and disposed by the device-setup code. This
/// handle only borrows it for as long as the render callback is installed.
#[cfg(target_os = "macos")]
#[derive(Debug, Clone, Copy)]
pub struct AudioUnitHandle(std::ptr::NonNull<c_void>);

#[cfg(target_os = "macos")]
impl AudioUnitHandle {
    /// Wrap a raw `AudioUnit`. Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `unit` must be an initialized `AudioUnit` that outlives every render
    /// call made through this handle.
    pub unsafe fn from_raw(unit: *mut c_void) -> Option<Self> {
        std::ptr::NonNull::new(unit).map(Self)
    }

    /// The raw `AudioUnit` pointer.
    pub fn as_raw(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

// SAFETY: the handle is an opaque token for the host's unit and is never
// dereferenced in Rust. AudioUnitRender is documented as callable from the
// render thread, which is the only place the handle is used.
#[cfg(target_os = "macos")]
unsafe impl Send for AudioUnitHandle {}
// SAFETY: see Send above.
#[cfg(target_os = "macos")]
unsafe impl Sync for AudioUnitHandle {}

#[cfg(target_os = "macos")]
extern "C" {
    fn AudioUnitRender(
        in_unit: *mut c_void,
        io_action_flags: *mut u32,
        in_time_stamp: *const AudioTimeStamp,
        in_output_bus_number: u32,
        in_number_frames: u32,
        io_data: *mut AudioBufferList,
    ) -> OSStatus;
}

#[cfg(target_os = "macos")]
impl RenderUnit for AudioUnitHandle {
    #[inline]
    unsafe fn render_input(
        &self,
        action_flags: *mut u32,
        timestamp: *const AudioTimeStamp,
        bus_number: u32,
        frame_count: u32,
        io_data: *mut AudioBufferList,
    ) -> OSStatus {
        // SAFETY: the unit is valid per from_raw's contract and the remaining
        // pointers are the host's, valid for this render call.
        unsafe {
            AudioUnitRender(
                self.as_raw(),
                action_flags,
                timestamp,
                bus_number,
                frame_count,
                io_data,
            )
        }
    }
}

#[cfg(all(test, target_os = "macos"))]
mod tests {
    use super::*;

    #[test]
    fn test_handle_rejects_null() {
        // SAFETY: a null pointer is never used as a unit.
        assert!(unsafe { AudioUnitHandle::from_raw(std::ptr::null_mut()) }.is_none());
    }
}
