//! Core Audio buffer list types.
//!
//! [`AudioBufferList`] and [`AudioBuffer`] mirror the C structs from
//! `CoreAudioTypes.h` field for field. The host owns every list the render
//! callback sees; the callback only borrows it for one invocation.
//!
//! [`OwnedBufferList`] allocates a list together with its sample storage. It is
//! meant for setup code and tests, never for the render path.

use std::alloc::{self, Layout};
use std::ffi::c_void;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

/// One buffer of an [`AudioBufferList`].
///
/// For non-interleaved formats there is one buffer per channel and
/// `number_channels` is 1. For interleaved formats a single buffer carries all
/// channels.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct AudioBuffer {
    /// Number of interleaved channels in this buffer
    pub number_channels: u32,
    /// Size of `data` in bytes
    pub data_byte_size: u32,
    /// Sample data (may be null)
    pub data: *mut c_void,
}

impl AudioBuffer {
    /// View this buffer's samples for a render call of `frame_count` frames.
    ///
    /// Covers `frame_count * number_channels` samples, bounded by
    /// `data_byte_size`. Returns `None` for a null or zero-length buffer.
    ///
    /// # Safety
    ///
    /// - If non-null, `data` must point to `data_byte_size` bytes of
    ///   properly aligned `f32` samples, valid for writes for `'a`
    /// - No other reference to that memory may exist during `'a`
    #[inline]
    pub unsafe fn samples_mut<'a>(&self, frame_count: u32) -> Option<&'a mut [f32]> {
        if self.data.is_null() {
            return None;
        }

        let requested = frame_count as usize * self.number_channels.max(1) as usize;
        let available = self.data_byte_size as usize / mem::size_of::<f32>();
        let len = requested.min(available);
        if len == 0 {
            return None;
        }

        // SAFETY: data is non-null and, per the caller contract, valid for
        // data_byte_size bytes. len never exceeds that.
        Some(unsafe { slice::from_raw_parts_mut(self.data as *mut f32, len) })
    }
}

/// Core Audio buffer list with a variable-length trailing array.
///
/// The declared `[AudioBuffer; 1]` is only the first element; the real length
/// is `number_buffers`. Access the buffers through [`AudioBufferList::buffers_mut`],
/// which works from the raw pointer so the whole trailing array stays reachable.
#[repr(C)]
#[derive(Debug)]
pub struct AudioBufferList {
    /// Number of buffers that follow
    pub number_buffers: u32,
    /// First buffer (more follow in memory)
    pub buffers: [AudioBuffer; 1],
}

impl AudioBufferList {
    /// Borrow all buffers of a list as a slice.
    ///
    /// # Safety
    ///
    /// - `list` must be non-null and point to a list whose allocation holds
    ///   `number_buffers` buffers
    /// - The list must stay valid and unaliased for `'a`
    #[inline]
    pub unsafe fn buffers_mut<'a>(list: *mut AudioBufferList) -> &'a mut [AudioBuffer] {
        // SAFETY: list is valid per the caller contract. addr_of_mut avoids
        // creating a reference that would only cover the first element.
        unsafe {
            let count = (*list).number_buffers as usize;
            let first = ptr::addr_of_mut!((*list).buffers) as *mut AudioBuffer;
            slice::from_raw_parts_mut(first, count)
        }
    }
}

/// Heap-allocated [`AudioBufferList`] that owns its sample storage.
///
/// Allocate once outside the render path, then hand [`as_mut_ptr`](Self::as_mut_ptr)
/// to code that expects a host buffer list.
pub struct OwnedBufferList {
    list: NonNull<AudioBufferList>,
    layout: Layout,
    /// One boxed slice per buffer, kept as raw pointers so every access goes
    /// through the same pointer the buffer list holds.
    storage: Vec<*mut [f32]>,
}

impl OwnedBufferList {
    /// Allocate `channels` non-interleaved buffers of `frames` zeroed samples.
    pub fn non_interleaved(channels: usize, frames: usize) -> Self {
        Self::from_channels((0..channels).map(|_| vec![0.0; frames]).collect())
    }

    /// Allocate one interleaved buffer holding `channels * frames` zeroed samples.
    pub fn interleaved(channels: usize, frames: usize) -> Self {
        let mut owned = Self::from_channels(vec![vec![0.0; channels * frames]]);
        // SAFETY: from_channels allocated exactly one buffer.
        unsafe {
            AudioBufferList::buffers_mut(owned.as_mut_ptr())[0].number_channels =
                channels as u32;
        }
        owned
    }

    /// Build a non-interleaved list, one buffer per `Vec`.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Self {
        let count = channels.len();
        let trailing = count.saturating_sub(1);
        let size = mem::size_of::<AudioBufferList>() + mem::size_of::<AudioBuffer>() * trailing;
        let layout = Layout::from_size_align(size, mem::align_of::<AudioBufferList>())
            .expect("Failed to create layout for AudioBufferList");

        // SAFETY: layout has non-zero size (at least one AudioBufferList).
        let raw = unsafe { alloc::alloc(layout) } as *mut AudioBufferList;
        let Some(list) = NonNull::new(raw) else {
            alloc::handle_alloc_error(layout);
        };

        let storage: Vec<*mut [f32]> = channels
            .into_iter()
            .map(|samples| Box::into_raw(samples.into_boxed_slice()))
            .collect();

        // SAFETY: the allocation holds the header plus max(count, 1) buffers.
        // Every field is written before the list is used.
        unsafe {
            let list_ptr = list.as_ptr();
            ptr::addr_of_mut!((*list_ptr).number_buffers).write(count as u32);
            let first = ptr::addr_of_mut!((*list_ptr).buffers) as *mut AudioBuffer;
            if count == 0 {
                first.write(AudioBuffer {
                    number_channels: 0,
                    data_byte_size: 0,
                    data: ptr::null_mut(),
                });
            }
            for (i, &samples) in storage.iter().enumerate() {
                first.add(i).write(AudioBuffer {
                    number_channels: 1,
                    data_byte_size: (samples.len() * mem::size_of::<f32>()) as u32,
                    data: samples as *mut f32 as *mut c_void,
                });
            }
        }

        Self {
            list,
            layout,
            storage,
        }
    }

    /// Pointer to hand to code expecting a host-provided list.
    pub fn as_mut_ptr(&mut self) -> *mut AudioBufferList {
        self.list.as_ptr()
    }

    /// Number of buffers in the list.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the list has no buffers.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Borrow the buffer headers.
    pub fn buffers_mut(&mut self) -> &mut [AudioBuffer] {
        // SAFETY: the list was allocated with storage.len() buffers.
        unsafe { AudioBufferList::buffers_mut(self.list.as_ptr()) }
    }

    /// Samples backing buffer `index`, regardless of what its header says.
    pub fn samples(&self, index: usize) -> &[f32] {
        // SAFETY: storage entries come from Box::into_raw and live until drop.
        unsafe { &*self.storage[index] }
    }

    /// Mutable samples backing buffer `index`.
    pub fn samples_mut(&mut self, index: usize) -> &mut [f32] {
        // SAFETY: storage entries come from Box::into_raw and live until drop.
        unsafe { &mut *self.storage[index] }
    }

    /// Detach buffer `index` from its storage, as a host does for an unused channel.
    ///
    /// The header gets a null `data` pointer and a zero byte size.
    pub fn detach(&mut self, index: usize) {
        let buffer = &mut self.buffers_mut()[index];
        buffer.data = ptr::null_mut();
        buffer.data_byte_size = 0;
    }
}

impl Drop for OwnedBufferList {
    fn drop(&mut self) {
        for &samples in &self.storage {
            // SAFETY: each pointer came from Box::into_raw and is freed once.
            drop(unsafe { Box::from_raw(samples) });
        }
        // SAFETY: list was allocated with this layout in from_channels.
        unsafe { alloc::dealloc(self.list.as_ptr() as *mut u8, self.layout) };
    }
}
