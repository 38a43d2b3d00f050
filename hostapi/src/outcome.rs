//! Decoding of a callback's two-channel result.
//!
//! A callback reports its result through the returned status code *and*
//! through two output vectors (data, error message). The code is checked
//! first: on anything but success the data vector is discarded whatever its
//! fields say, and the message vector is surfaced.

use conduit_primitives::{GoError, UnmanagedVector};
use tracing::error;

use crate::error::QueryError;

/// Turn a raw callback status plus its output vectors into a `Result`.
///
/// Both vectors are consumed on every path, so nothing the host handed over
/// is leaked. `default_msg` is only evaluated when the host reported an
/// error without a message.
pub fn decode_outcome<F>(
    code: i32,
    output: UnmanagedVector,
    error_msg: UnmanagedVector,
    default_msg: F,
) -> Result<Option<Vec<u8>>, QueryError>
where
    F: FnOnce() -> String,
{
    let code = GoError::from(code);
    // We destruct both vectors here, no matter if we need the data.
    let output = output.consume();
    let error_msg = error_msg.consume();

    if code.is_ok() {
        return Ok(output);
    }

    let msg = match error_msg {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => default_msg(),
    };
    if code == GoError::Other {
        error!(%msg, "callback returned a status code outside the known set");
    }
    // `from_code` only returns `None` for success, handled above.
    Err(QueryError::from_code(code, msg).unwrap_or(QueryError::Unknown {
        msg: String::new(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_msg() -> String {
        "callback failed".to_string()
    }

    #[test]
    fn test_success_returns_output() {
        let out = UnmanagedVector::new(Some(b"result".to_vec()));
        let res = decode_outcome(0, out, UnmanagedVector::default(), default_msg);
        assert_eq!(res.unwrap(), Some(b"result".to_vec()));
    }

    #[test]
    fn test_success_keeps_absent_output_absent() {
        let res = decode_outcome(
            0,
            UnmanagedVector::default(),
            UnmanagedVector::default(),
            default_msg,
        );
        assert_eq!(res.unwrap(), None);

        let res = decode_outcome(
            0,
            UnmanagedVector::new(Some(vec![])),
            UnmanagedVector::default(),
            default_msg,
        );
        assert_eq!(res.unwrap(), Some(vec![]));
    }

    #[test]
    fn test_error_discards_populated_output() {
        let out = UnmanagedVector::new(Some(b"should be ignored".to_vec()));
        let msg = UnmanagedVector::new(Some(b"account not found".to_vec()));
        let err = decode_outcome(GoError::User as i32, out, msg, default_msg).unwrap_err();
        assert_eq!(err, QueryError::user("account not found"));
    }

    #[test]
    fn test_error_without_message_uses_default() {
        let err = decode_outcome(
            GoError::QuerierError as i32,
            UnmanagedVector::default(),
            UnmanagedVector::default(),
            default_msg,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::querier("callback failed"));
    }

    #[test]
    fn test_out_of_gas_is_distinguishable() {
        let err = decode_outcome(
            GoError::OutOfGas as i32,
            UnmanagedVector::default(),
            UnmanagedVector::new(Some(b"gas".to_vec())),
            default_msg,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::OutOfGas);
    }

    #[test]
    fn test_unknown_code_is_recoverable() {
        let err = decode_outcome(
            99,
            UnmanagedVector::default(),
            UnmanagedVector::new(Some(b"weird".to_vec())),
            default_msg,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QueryError::Unknown {
                msg: "weird".into()
            }
        );
    }

    #[test]
    fn test_invalid_utf8_message_is_lossy() {
        let err = decode_outcome(
            GoError::CannotSerialize as i32,
            UnmanagedVector::default(),
            UnmanagedVector::new(Some(vec![0x66, 0x6F, 0x80])),
            default_msg,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::cannot_serialize("fo\u{FFFD}"));
    }
}
