//! Error types for recency

use std::fmt;
use std::io;

/// Result type alias for recency operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction and trace handling
#[derive(Debug)]
pub enum Error {
    /// Capacity must be at least 1
    InvalidCapacity(usize),

    /// Malformed trace line (1-based line number)
    Parse {
        /// Line the error was found on
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// I/O error
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(cap) => {
                write!(f, "Invalid capacity: {} (must be greater than 0)", cap)
            }
            Error::Parse { line, message } => write!(f, "Parse error on line {}: {}", line, message),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_capacity() {
        let err = Error::InvalidCapacity(0);
        assert_eq!(err.to_string(), "Invalid capacity: 0 (must be greater than 0)");
    }

    #[test]
    fn test_display_parse() {
        let err = Error::Parse {
            line: 7,
            message: "unknown command 'set'".to_string(),
        };
        assert_eq!(err.to_string(), "Parse error on line 7: unknown command 'set'");
    }

    #[test]
    fn test_io_source() {
        use std::error::Error as _;

        let err = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(Error::InvalidCapacity(0).source().is_none());
    }
}
