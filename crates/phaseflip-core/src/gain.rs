//! Lock-free gain state shared between the control thread and the render thread.
//!
//! [`GainControl`] stores a single `f32` as its bit pattern in an [`AtomicU32`].
//! A store or load of one word is indivisible, so the render thread always sees
//! either the value before a write or the value after it, never a mix of the two.
//!
//! # Memory Ordering
//!
//! - Writers use `Release` stores
//! - The render callback uses `Acquire` loads, once per invocation
//!
//! Neither side ever blocks: there are no locks, no allocation and no retry loops.
//!
//! # Example
//!
//! ```
//! use phaseflip_core::GainControl;
//!
//! let gain = GainControl::new(0.5);
//! assert_eq!(gain.get(), 0.5);
//!
//! // Out-of-range writes are clamped to the safe range
//! assert_eq!(gain.set(4.0), 1.0);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Lower bound of the safe gain range.
pub const MIN_GAIN: f32 = 0.0;

/// Upper bound of the safe gain range. Gains above unity are never applied.
pub const MAX_GAIN: f32 = 1.0;

/// Bit pattern of `1.0f32`.
const UNITY_BITS: u32 = 0x3F80_0000;

/// Process-wide gain, alive for the whole process.
static GLOBAL_GAIN: GainControl = GainControl::unity();

/// Gain factor applied to every output sample.
///
/// Writes come from a non-real-time actor (UI, control messages) and reads come
/// from the render callback. Both sides are wait-free.
pub struct GainControl {
    /// `f32` bits of the current gain
    bits: AtomicU32,
    /// Upper clamp bound, fixed at construction
    ceiling: f32,
}

impl GainControl {
    /// Create a gain control at unity (1.0) with the full `[0.0, 1.0]` range.
    pub const fn unity() -> Self {
        Self {
            bits: AtomicU32::new(UNITY_BITS),
            ceiling: MAX_GAIN,
        }
    }

    /// Create a gain control with an initial value.
    ///
    /// The value is clamped to `[0.0, 1.0]`. A non-finite value leaves the gain at unity.
    pub fn new(initial: f32) -> Self {
        let gain = Self::unity();
        gain.set(initial);
        gain
    }

    /// Lower the upper clamp bound below unity.
    ///
    /// The ceiling itself is clamped to `[0.0, 1.0]`. If the current value is
    /// above the new ceiling it is pulled down to it.
    pub fn with_ceiling(mut self, ceiling: f32) -> Self {
        self.ceiling = if ceiling.is_finite() {
            ceiling.clamp(MIN_GAIN, MAX_GAIN)
        } else {
            log::warn!("Ignoring non-finite gain ceiling {ceiling}");
            MAX_GAIN
        };
        if self.get() > self.ceiling {
            self.bits.store(self.ceiling.to_bits(), Ordering::Release);
        }
        self
    }

    /// The process-wide gain instance.
    ///
    /// Starts at unity. Hosts that only run one callback can share this instead
    /// of threading an `Arc<GainControl>` through their setup code.
    pub fn global() -> &'static GainControl {
        &GLOBAL_GAIN
    }

    /// Current upper clamp bound.
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Read the current gain.
    ///
    /// Real-time safe: a single atomic load.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Write a new gain and return the value actually stored.
    ///
    /// Values outside `[0.0, ceiling]` are clamped. NaN and infinities are
    /// rejected: the previous value is kept and returned.
    ///
    /// Intended for the control thread. Never blocks, but may log.
    pub fn set(&self, value: f32) -> f32 {
        if !value.is_finite() {
            log::warn!("Rejected non-finite gain {value}, keeping {}", self.get());
            return self.get();
        }

        let mut clamped = value.clamp(MIN_GAIN, self.ceiling);
        if clamped != value {
            log::warn!(
                "Gain {value} outside [{MIN_GAIN}, {}], clamped to {clamped}",
                self.ceiling
            );
        }
        // -0.0 passes the clamp unchanged
        if clamped == 0.0 {
            clamped = 0.0;
        }

        self.bits.store(clamped.to_bits(), Ordering::Release);
        clamped
    }

    /// Write a gain in decibels.
    ///
    /// `f32::NEG_INFINITY` mutes. Positive values saturate at the ceiling.
    pub fn set_db(&self, db: f32) -> f32 {
        let linear = if db == f32::NEG_INFINITY {
            0.0
        } else {
            10.0_f32.powf(db / 20.0)
        };
        self.set(linear)
    }

    /// Silence the output without stopping the stream.
    pub fn mute(&self) {
        self.set(MIN_GAIN);
    }
}

impl Default for GainControl {
    fn default() -> Self {
        Self::unity()
    }
}

impl fmt::Debug for GainControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GainControl")
            .field("gain", &self.get())
            .field("ceiling", &self.ceiling)
            .finish()
    }
}
