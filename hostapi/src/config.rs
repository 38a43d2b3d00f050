//! Boundary limits.
//!
//! `BoundaryConfig` bounds the size of everything the querier moves across
//! the boundary. There is no file or environment configuration; hosts build
//! the struct directly.

/// Size limits applied at the querier boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// Maximum length of one query request in bytes.
    pub max_query_len: usize,
    /// Maximum length of one query response in bytes.
    pub max_response_len: usize,
    /// Maximum length of an error message written to an output buffer.
    pub max_error_len: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            max_query_len: 64 * 1024,          // 64 KiB
            max_response_len: 16 * 1024 * 1024, // 16 MiB
            max_error_len: 4 * 1024,           // 4 KiB
        }
    }
}

impl BoundaryConfig {
    /// Cut `msg` down to `max_error_len` bytes on a char boundary.
    pub fn clip_message(&self, mut msg: String) -> String {
        if msg.len() <= self.max_error_len {
            return msg;
        }
        let mut end = self.max_error_len;
        while !msg.is_char_boundary(end) {
            end -= 1;
        }
        msg.truncate(end);
        msg
    }
}
