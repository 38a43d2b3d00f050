//! Enclave error types.

use conduit_hostapi::QueryError;
use conduit_primitives::GoError;

/// Why an operation could not produce a response message.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The input buffer was absent.
    #[error("request buffer is absent")]
    Absent,

    /// The input buffer exceeded the configured request limit.
    #[error("request of {len} bytes exceeds limit of {limit}")]
    TooLarge { len: usize, limit: usize },

    /// The input (or a response) was not a valid message.
    #[error("cannot decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    /// A fixed-width field had the wrong length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    BadLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The storage backend (or the session around it) failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl EnvelopeError {
    /// The status code written into the error envelope.
    pub fn code(&self) -> GoError {
        match self {
            Self::Absent | Self::TooLarge { .. } | Self::BadLength { .. } => GoError::BadArgument,
            Self::Decode { .. } => GoError::CannotSerialize,
            Self::Query(err) => err.code(),
        }
    }

    /// The message written into the error envelope.
    pub fn message(&self) -> String {
        match self {
            Self::Query(err) => err.message(),
            other => other.to_string(),
        }
    }
}

impl From<EnvelopeError> for QueryError {
    fn from(source: EnvelopeError) -> Self {
        match source {
            EnvelopeError::Query(err) => err,
            other => {
                // `from_code` is only `None` for success, which no variant maps to.
                QueryError::from_code(other.code(), other.message())
                    .unwrap_or_else(|| QueryError::querier(other.message()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(EnvelopeError::Absent.code(), GoError::BadArgument);
        let err = EnvelopeError::BadLength {
            field: "address",
            expected: 20,
            actual: 3,
        };
        assert_eq!(err.code(), GoError::BadArgument);
        assert_eq!(
            EnvelopeError::from(QueryError::out_of_gas()).code(),
            GoError::OutOfGas
        );
    }

    #[test]
    fn test_into_query_error() {
        let err: QueryError = EnvelopeError::TooLarge { len: 10, limit: 4 }.into();
        assert_eq!(
            err,
            QueryError::bad_argument("request of 10 bytes exceeds limit of 4")
        );

        let err: QueryError = EnvelopeError::Query(QueryError::user("gone")).into();
        assert_eq!(err, QueryError::user("gone"));
    }
}
