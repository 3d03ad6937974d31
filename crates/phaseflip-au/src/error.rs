//! Core Audio status codes and the render error type.

/// Core Audio status code. `0` is success.
pub type OSStatus = i32;

/// Status codes returned by the render callback.
///
/// Values match `AudioUnit/AUComponent.h`.
pub mod os_status {
    use super::OSStatus;

    /// Success.
    pub const NO_ERR: OSStatus = 0;
    /// `kAudioUnitErr_InvalidParameter`: null context or buffer list at the callback boundary.
    pub const K_AUDIO_UNIT_ERR_INVALID_PARAMETER: OSStatus = -10878;
    /// `kAudioUnitErr_CannotDoInCurrentContext`: the callback caught a panic.
    pub const K_AUDIO_UNIT_ERR_CANNOT_DO_IN_CURRENT_CONTEXT: OSStatus = -10863;
}

/// Typed view of a failed render call.
///
/// The render callback itself only ever returns raw statuses. Control-side code
/// that drives or monitors the callback can use [`RenderError::check`] to turn
/// a status into a `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The render unit could not deliver input. Carries the unit's status unchanged.
    PullFailed(OSStatus),
    /// The callback was invoked with a null context or buffer list.
    InvalidParameter,
    /// The callback panicked and the panic was contained.
    Panicked,
}

impl RenderError {
    /// Classify a status returned by the render callback.
    ///
    /// A pull that itself fails with one of the boundary codes is reported as
    /// that boundary error; the status value is the same either way.
    pub fn check(status: OSStatus) -> Result<(), RenderError> {
        match status {
            os_status::NO_ERR => Ok(()),
            os_status::K_AUDIO_UNIT_ERR_INVALID_PARAMETER => Err(Self::InvalidParameter),
            os_status::K_AUDIO_UNIT_ERR_CANNOT_DO_IN_CURRENT_CONTEXT => Err(Self::Panicked),
            other => Err(Self::PullFailed(other)),
        }
    }

    /// The status code the callback returned for this error.
    pub fn status(&self) -> OSStatus {
        match self {
            Self::PullFailed(status) => *status,
            Self::InvalidParameter => os_status::K_AUDIO_UNIT_ERR_INVALID_PARAMETER,
            Self::Panicked => os_status::K_AUDIO_UNIT_ERR_CANNOT_DO_IN_CURRENT_CONTEXT,
        }
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PullFailed(status) => write!(f, "input pull failed with OSStatus {status}"),
            Self::InvalidParameter => write!(f, "render callback received a null pointer"),
            Self::Panicked => write!(f, "render callback panicked"),
        }
    }
}

impl std::error::Error for RenderError {}
