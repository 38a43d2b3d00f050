//! Query error type for the Conduit querier.
//!
//! `QueryError` is the Rust-side view of a failed callback. Every variant
//! maps onto exactly one [`GoError`] code, so the error survives a trip
//! across the boundary as a `(code, message)` pair and comes back as the
//! same variant.

use conduit_primitives::{GoError, RustError};

/// Failure of one query through the callback table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The host side panicked while handling the query.
    #[error("panic in querier: {msg}")]
    Panic { msg: String },

    /// The engine passed an argument the host could not accept.
    #[error("bad argument: {msg}")]
    BadArgument { msg: String },

    /// The host's gas meter was exhausted.
    #[error("ran out of gas during query")]
    OutOfGas,

    /// The host failed to encode or decode a payload.
    #[error("cannot serialize: {msg}")]
    CannotSerialize { msg: String },

    /// An error meant for the running program.
    #[error("user error: {msg}")]
    User { msg: String },

    /// The querier failed to answer or to apply a change.
    #[error("querier error: {msg}")]
    Querier { msg: String },

    /// The host returned a code outside the known set.
    #[error("unknown error: {msg}")]
    Unknown { msg: String },
}

impl QueryError {
    pub fn panic<S: ToString>(msg: S) -> Self {
        Self::Panic {
            msg: msg.to_string(),
        }
    }

    pub fn bad_argument<S: ToString>(msg: S) -> Self {
        Self::BadArgument {
            msg: msg.to_string(),
        }
    }

    pub fn out_of_gas() -> Self {
        Self::OutOfGas
    }

    pub fn cannot_serialize<S: ToString>(msg: S) -> Self {
        Self::CannotSerialize {
            msg: msg.to_string(),
        }
    }

    pub fn user<S: ToString>(msg: S) -> Self {
        Self::User {
            msg: msg.to_string(),
        }
    }

    pub fn querier<S: ToString>(msg: S) -> Self {
        Self::Querier {
            msg: msg.to_string(),
        }
    }

    /// Rebuild an error from a non-success code and its message.
    ///
    /// Returns `None` for `GoError::None`.
    pub fn from_code(code: GoError, msg: String) -> Option<Self> {
        let err = match code {
            GoError::None => return None,
            GoError::Panic => Self::Panic { msg },
            GoError::BadArgument => Self::BadArgument { msg },
            GoError::OutOfGas => Self::OutOfGas,
            GoError::CannotSerialize => Self::CannotSerialize { msg },
            GoError::User => Self::User { msg },
            GoError::QuerierError => Self::Querier { msg },
            GoError::Other => Self::Unknown { msg },
        };
        Some(err)
    }

    /// The status code this error travels as.
    pub fn code(&self) -> GoError {
        match self {
            Self::Panic { .. } => GoError::Panic,
            Self::BadArgument { .. } => GoError::BadArgument,
            Self::OutOfGas => GoError::OutOfGas,
            Self::CannotSerialize { .. } => GoError::CannotSerialize,
            Self::User { .. } => GoError::User,
            Self::Querier { .. } => GoError::QuerierError,
            Self::Unknown { .. } => GoError::Other,
        }
    }

    /// The message written into the error output buffer.
    pub fn message(&self) -> String {
        match self {
            Self::Panic { msg }
            | Self::BadArgument { msg }
            | Self::CannotSerialize { msg }
            | Self::User { msg }
            | Self::Querier { msg }
            | Self::Unknown { msg } => msg.clone(),
            Self::OutOfGas => self.to_string(),
        }
    }
}

impl From<QueryError> for RustError {
    fn from(source: QueryError) -> Self {
        match source {
            QueryError::OutOfGas => RustError::out_of_gas(),
            other => RustError::query_err(other),
        }
    }
}
