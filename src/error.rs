//! Error types for the few fallible SGF operations.
//!
//! Tokenizing, parsing, and stringifying to a `String` never fail: SGF is a
//! permissive format and malformed input is recovered from silently. Errors
//! only surface at the edges of the crate:
//!
//! - **I/O Errors**: reading input through [`from_reader`](crate::from_reader)
//!   or writing output through [`to_writer`](crate::to_writer)
//! - **Date Errors**: converting a date entry into a calendar date with
//!   [`to_naive_date`](crate::to_naive_date)
//!
//! ## Examples
//!
//! ```rust
//! use sgf_format::{to_naive_date, Error};
//!
//! let result = to_naive_date(&[1996, 13, 1]);
//! assert!(matches!(result, Err(Error::InvalidDate { .. })));
//! ```

use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A date entry that does not name a calendar day
    #[error("Invalid date {parts:?}: {msg}")]
    InvalidDate { parts: Vec<u32>, msg: String },
}

impl Error {
    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an invalid date error for the given date components.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sgf_format::Error;
    ///
    /// let err = Error::invalid_date(&[1996, 2, 30], "no such day");
    /// assert!(err.to_string().contains("no such day"));
    /// ```
    pub fn invalid_date(parts: &[u32], msg: &str) -> Self {
        Error::InvalidDate {
            parts: parts.to_vec(),
            msg: msg.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
