//! Status codes and error types for the Conduit boundary.
//!
//! Two closed code sets cross the boundary:
//!
//! - [`GoError`] — returned by the host for every callback invocation.
//! - [`ErrnoValue`] — set by the engine's own exported entry points in the
//!   thread's `errno`, next to a message written into an output buffer.
//!
//! [`RustError`] is the engine-internal error that gets flattened into those
//! two channels by [`set_error`].

use std::fmt;

use errno::{errno, set_errno, Errno};
use thiserror::Error;

use crate::memory::UnmanagedVector;

/// Status codes returned from host callbacks to the engine.
///
/// `0` means no error, all the other cases are some sort of error.
/// The repr values are part of the C ABI and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum GoError {
    None = 0,
    /// The host panicked for an unexpected reason.
    Panic = 1,
    /// The host received a bad argument from the engine.
    BadArgument = 2,
    /// Ran out of gas while using the host's state.
    OutOfGas = 3,
    /// Error while trying to serialize data on the host side.
    CannotSerialize = 4,
    /// An error happened during normal operation of a callback, which should
    /// be fed back to the running program.
    User = 5,
    /// An error happened while the querier applied changes or answered a
    /// query.
    QuerierError = 6,
    /// Never created on purpose. Only serves as the fallback for the
    /// `i32` to `GoError` conversion.
    Other = -1,
}

impl GoError {
    /// Return the i32 representation of this code.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns true if this is the `None` (success) variant.
    pub fn is_ok(self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<i32> for GoError {
    fn from(n: i32) -> Self {
        // The host is not trusted to return a known value.
        match n {
            0 => Self::None,
            1 => Self::Panic,
            2 => Self::BadArgument,
            3 => Self::OutOfGas,
            4 => Self::CannotSerialize,
            5 => Self::User,
            6 => Self::QuerierError,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "GO_ERROR_NONE"),
            Self::Panic => write!(f, "GO_ERROR_PANIC"),
            Self::BadArgument => write!(f, "GO_ERROR_BAD_ARGUMENT"),
            Self::OutOfGas => write!(f, "GO_ERROR_OUT_OF_GAS"),
            Self::CannotSerialize => write!(f, "GO_ERROR_CANNOT_SERIALIZE"),
            Self::User => write!(f, "GO_ERROR_USER"),
            Self::QuerierError => write!(f, "GO_ERROR_QUERIER"),
            Self::Other => write!(f, "GO_ERROR_OTHER"),
        }
    }
}

/// Coarse outcome of an engine entry point, reported through `errno`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrnoValue {
    Success = 0,
    Other = 1,
    OutOfGas = 2,
}

impl ErrnoValue {
    /// Read the value the last entry point left in this thread's `errno`.
    ///
    /// Values outside the known set read as `Other`.
    pub fn current() -> Self {
        match errno().0 {
            0 => Self::Success,
            2 => Self::OutOfGas,
            _ => Self::Other,
        }
    }
}

#[derive(Error, Debug)]
pub enum RustError {
    #[error("Null/Empty argument: {name}")]
    EmptyArg { name: String },
    /// Whenever UTF-8 bytes cannot be decoded into a unicode string.
    #[error("Cannot decode UTF8 bytes into string: {msg}")]
    InvalidUtf8 { msg: String },
    #[error("Ran out of gas")]
    OutOfGas,
    #[error("Caught panic")]
    Panic,
    #[error("Error calling the VM: {msg}")]
    VmErr { msg: String },
    #[error("Error querying the host: {msg}")]
    Query { msg: String },
}

impl RustError {
    pub fn empty_arg<T: Into<String>>(name: T) -> Self {
        RustError::EmptyArg { name: name.into() }
    }

    pub fn invalid_utf8<S: ToString>(msg: S) -> Self {
        RustError::InvalidUtf8 {
            msg: msg.to_string(),
        }
    }

    pub fn panic() -> Self {
        RustError::Panic
    }

    pub fn vm_err<S: ToString>(msg: S) -> Self {
        RustError::VmErr {
            msg: msg.to_string(),
        }
    }

    pub fn query_err<S: ToString>(msg: S) -> Self {
        RustError::Query {
            msg: msg.to_string(),
        }
    }

    pub fn out_of_gas() -> Self {
        RustError::OutOfGas
    }

    /// The `errno` value this error is reported with.
    pub fn errno_value(&self) -> ErrnoValue {
        match self {
            RustError::OutOfGas => ErrnoValue::OutOfGas,
            _ => ErrnoValue::Other,
        }
    }
}

impl From<std::str::Utf8Error> for RustError {
    fn from(source: std::str::Utf8Error) -> Self {
        RustError::invalid_utf8(source)
    }
}

impl From<std::string::FromUtf8Error> for RustError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        RustError::invalid_utf8(source)
    }
}

pub fn clear_error() {
    set_errno(Errno(ErrnoValue::Success as i32));
}

/// Report `err` through both channels: its message goes into `errout`
/// (replacing and freeing whatever was there) and its class into `errno`.
pub fn set_error(err: RustError, errout: Option<&mut UnmanagedVector>) {
    let errno_value = err.errno_value();
    if let Some(mb) = errout {
        *mb = UnmanagedVector::new(Some(err.to_string().into_bytes()));
    }
    set_errno(Errno(errno_value as i32));
}

/// If `result` is Ok, this returns the binary representation of the Ok value
/// and clears `errno`. Otherwise it returns an empty vector, writes the error
/// message to `errout` and sets `errno`.
pub fn handle_c_error_binary<T>(
    result: Result<T, RustError>,
    errout: Option<&mut UnmanagedVector>,
) -> Vec<u8>
where
    T: Into<Vec<u8>>,
{
    match result {
        Ok(value) => {
            clear_error();
            value.into()
        }
        Err(error) => {
            set_error(error, errout);
            Vec::new()
        }
    }
}
