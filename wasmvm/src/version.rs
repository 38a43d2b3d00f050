use std::ffi::c_char;

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Returns a version number of this library as a C string.
///
/// The string is owned by this library and must not be mutated or destroyed by
/// the caller.
#[no_mangle]
pub extern "C" fn version_str() -> *const c_char {
    VERSION.as_ptr() as *const _
}

/// The same version as a Rust string, without the terminator.
pub fn version() -> &'static str {
    &VERSION[..VERSION.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn version_works() {
        // SAFETY: `version_str` points at a static NUL-terminated string.
        let ptr = version_str();
        let as_str = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
        assert_eq!(as_str, env!("CARGO_PKG_VERSION"));
        assert_eq!(as_str, version());
        assert!(as_str.starts_with("0."));
    }

    #[test]
    fn version_pointer_is_stable() {
        assert_eq!(version_str(), version_str());
    }
}
