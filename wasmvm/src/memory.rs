//! Vector factory and destructor exported to the host.
//!
//! The host never allocates an `UnmanagedVector` itself. It asks this
//! library to copy its bytes into one (`new_unmanaged_vector`) and hands
//! every vector it received back for release (`destroy_unmanaged_vector`),
//! so allocation and deallocation stay on the same side.

use std::slice;

use conduit_hostapi::guard;
use conduit_primitives::UnmanagedVector;
use tracing::error;

/// Copy `length` bytes from `ptr` into a new vector owned by this library.
///
/// `nil` produces an absent vector and `length == 0` a present empty one;
/// in both cases `ptr` is not read.
#[no_mangle]
pub extern "C" fn new_unmanaged_vector(
    nil: bool,
    ptr: *const u8,
    length: usize,
) -> UnmanagedVector {
    guard("new_unmanaged_vector", || copy_in(nil, ptr, length)).unwrap_or_default()
}

fn copy_in(nil: bool, ptr: *const u8, length: usize) -> UnmanagedVector {
    if nil {
        return UnmanagedVector::new(None);
    }
    if length == 0 {
        return UnmanagedVector::new(Some(Vec::new()));
    }
    if ptr.is_null() {
        error!(length, "new_unmanaged_vector called with null pointer");
        return UnmanagedVector::new(None);
    }
    // SAFETY: the caller guarantees `ptr` points at `length` readable bytes
    // for the duration of this call.
    let external = unsafe { slice::from_raw_parts(ptr, length) };
    UnmanagedVector::new(Some(external.to_vec()))
}

/// Release a vector previously returned by this library.
///
/// Destroying an absent vector is a no-op.
#[no_mangle]
pub extern "C" fn destroy_unmanaged_vector(v: UnmanagedVector) {
    let _ = guard("destroy_unmanaged_vector", move || drop(v.consume()));
}
