//! Memory types that cross the host/engine boundary.
//!
//! Two kinds of data cross the boundary:
//!
//! - **Views** (`ByteSliceView`, `U8SliceView`) — borrowed, call-scoped
//!   windows into a buffer owned by the caller. A view is input-only, never
//!   owns its memory, and has no destructor.
//! - **`UnmanagedVector`** — the only type that carries owned bytes across
//!   the boundary. Exactly one side owns it at any time.
//!
//! Both view types and the vector carry an explicit presence flag so that a
//! host-side `nil` stays distinguishable from a present, zero-length buffer.

use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::{ptr, slice};

/// A view into an externally owned byte slice (host `[]byte`).
///
/// Use this for the current call only. A view cannot be copied; if the data
/// has to outlive the call, convert it with [`ByteSliceView::to_owned`].
///
/// The host's nil value is fully supported, so nil and an empty slice
/// stay distinct.
#[repr(C)]
#[derive(Debug)]
pub struct ByteSliceView<'a> {
    /// True if and only if the byte slice is nil on the host side.
    /// If this is true, the other fields must be ignored.
    is_nil: bool,
    ptr: *const u8,
    len: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> ByteSliceView<'a> {
    /// Create a present view over `source`.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            is_nil: false,
            ptr: source.as_ptr(),
            len: source.len(),
            _marker: PhantomData,
        }
    }

    /// Create a nil view.
    pub fn nil() -> Self {
        Self {
            is_nil: true,
            ptr: ptr::null(),
            len: 0,
            _marker: PhantomData,
        }
    }

    pub fn from_option(source: Option<&'a [u8]>) -> Self {
        match source {
            Some(data) => Self::new(data),
            None => Self::nil(),
        }
    }

    /// Returns true if the host passed nil.
    pub fn is_nil(&self) -> bool {
        self.is_nil
    }

    /// Provides a reference to the viewed data.
    ///
    /// Returns `None` for a nil view. A present view with `len == 0`
    /// returns an empty slice without reading `ptr`, which the host may
    /// leave dangling or null for empty slices.
    pub fn read(&self) -> Option<&'a [u8]> {
        if self.is_nil {
            return None;
        }
        if self.len == 0 {
            return Some(&[]);
        }
        // SAFETY: a present view with non-zero length was created from a
        // live slice that the caller keeps alive for the duration of the call.
        Some(unsafe { slice::from_raw_parts(self.ptr, self.len) })
    }

    /// Copies the viewed data into an owned `Vec<u8>`.
    pub fn to_owned(&self) -> Option<Vec<u8>> {
        self.read().map(|slice| slice.to_vec())
    }
}

/// A view into an `Option<&[u8]>`, created by the engine and read by the host.
///
/// The host must copy the data if it needs it after the callback returns.
#[repr(C)]
#[derive(Debug)]
pub struct U8SliceView<'a> {
    /// True if and only if this is `None`. If this is true, the other fields
    /// must be ignored.
    is_none: bool,
    ptr: *const u8,
    len: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> U8SliceView<'a> {
    pub fn new(source: Option<&'a [u8]>) -> Self {
        match source {
            Some(data) => Self {
                is_none: false,
                ptr: data.as_ptr(),
                len: data.len(),
                _marker: PhantomData,
            },
            None => Self {
                is_none: true,
                ptr: ptr::null(),
                len: 0,
                _marker: PhantomData,
            },
        }
    }

    pub fn is_none(&self) -> bool {
        self.is_none
    }

    pub fn read(&self) -> Option<&'a [u8]> {
        if self.is_none {
            return None;
        }
        if self.len == 0 {
            return Some(&[]);
        }
        // SAFETY: created from a live slice in `new`, bounded by `'a`.
        Some(unsafe { slice::from_raw_parts(self.ptr, self.len) })
    }
}

/// An optional byte vector with explicit, transferable ownership.
///
/// It is created from `Option<Vec<u8>>` and converted back into
/// `Option<Vec<u8>>` exactly once.
///
/// ## Ownership
///
/// Ownership is the right and the obligation to destroy an
/// `UnmanagedVector` exactly once. Allocation and deallocation always happen
/// on the engine side:
///
/// - **Engine to host**: the engine returns a vector from an entry point.
///   The host copies the bytes into its own managed memory and hands the
///   vector back through `destroy_unmanaged_vector`.
/// - **Host to engine**: the host never allocates one itself. It calls
///   `new_unmanaged_vector`, which copies its bytes into a vector owned by
///   the engine, and writes it to an output pointer supplied by the
///   engine. The engine then takes it back with [`take`](Self::take) or
///   [`consume`](Self::consume).
///
/// The type is move-only: it is neither `Clone` nor `Copy`, consumption
/// takes `self`, and dropping a vector that still owns its payload frees
/// it. A consumed or absent vector drops as a no-op, so a double free
/// cannot be expressed from safe Rust.
///
/// An `UnmanagedVector` is immutable. To mutate the bytes, consume it and
/// build a new one.
#[repr(C)]
#[derive(Debug)]
pub struct UnmanagedVector {
    /// True if and only if this is `None`. If this is true, the other fields
    /// must be ignored.
    is_none: bool,
    ptr: *mut u8,
    len: usize,
    cap: usize,
}

impl UnmanagedVector {
    /// Takes ownership of `source` (if any) without copying.
    pub fn new(source: Option<Vec<u8>>) -> Self {
        match source {
            Some(data) => {
                let mut data = ManuallyDrop::new(data);
                Self {
                    is_none: false,
                    ptr: data.as_mut_ptr(),
                    len: data.len(),
                    cap: data.capacity(),
                }
            }
            None => Self::absent(),
        }
    }

    /// Copies `source` into a newly allocated vector.
    pub fn from_slice(source: Option<&[u8]>) -> Self {
        Self::new(source.map(<[u8]>::to_vec))
    }

    fn absent() -> Self {
        Self {
            is_none: true,
            ptr: ptr::null_mut(),
            len: 0,
            cap: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.is_none
    }

    pub fn is_some(&self) -> bool {
        !self.is_none
    }

    /// Length of the payload, or `0` when absent.
    pub fn len(&self) -> usize {
        if self.is_none {
            0
        } else {
            self.len
        }
    }

    /// True when absent or present with zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extracts the payload and leaves `self` absent.
    ///
    /// Calling `take` again, or dropping `self` afterwards, is a no-op.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        if self.is_none {
            return None;
        }
        // SAFETY: a present vector was built in `new` from the parts of a
        // `Vec<u8>` allocated by this side, and has not been taken since
        // (taking flips `is_none`).
        let data = unsafe { Vec::from_raw_parts(self.ptr, self.len, self.cap) };
        // Fields are reset in place; assigning a new value would run `Drop`
        // on the old one.
        self.is_none = true;
        self.ptr = ptr::null_mut();
        self.len = 0;
        self.cap = 0;
        Some(data)
    }

    /// Consumes this vector and returns its payload.
    pub fn consume(mut self) -> Option<Vec<u8>> {
        self.take()
    }
}

impl Default for UnmanagedVector {
    /// An absent vector. Used to reserve output slots the host writes into.
    fn default() -> Self {
        Self::absent()
    }
}

impl Drop for UnmanagedVector {
    fn drop(&mut self) {
        let _ = self.take();
    }
}

// The vector uniquely owns its allocation.
unsafe impl Send for UnmanagedVector {}
