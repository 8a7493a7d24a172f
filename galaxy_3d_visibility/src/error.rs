//! Error types for the Galaxy3D visibility crate
//!
//! This module defines the error types used by the spatial indexes,
//! the partitioners, and their configuration.

use std::fmt;

/// Result type for Galaxy3D visibility operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D visibility errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Bounding volume lies outside the fixed world bounds of an index
    OutOfRange(String),

    /// Configuration rejected by `validate()` (zero levels, non-finite bounds, ...)
    InvalidConfig(String),

    /// Malformed input geometry (triangle index out of range, ...)
    InvalidGeometry(String),

    /// Operation on an object that is not known to the index
    UnknownObject(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            Error::UnknownObject(msg) => write!(f, "Unknown object: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error at ERROR severity (with file:line) and build it.
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!("galaxy3d::LooseOctree", OutOfRange,
///     "centre {:?} is outside the octree", centre));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
}

/// Log an error and return it from the enclosing function.
///
/// # Example
///
/// ```ignore
/// engine_bail!("galaxy3d::OctreeCuller", InvalidGeometry,
///     "index count {} is not a multiple of 3", indices.len());
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $variant, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
