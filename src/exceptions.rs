//! ## Custom errors for strtree
//!
//! This module defines the errors that surface from the builder and the query engine. Every
//! variant is a programming error discovered before any node is allocated, never a
//! mid-traversal panic.

use std::error::Error;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents errors specific to invalid operations or parameters in strtree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq)]
pub enum StrtreeError {
    /// Occurs when the builder is given no entries at all.
    EmptyInput,
    /// Occurs when an entry's coordinate or MBR dimension disagrees with the dimension
    /// established by the first entry.
    DimensionMismatch {
        /// The dimension established by the first entry.
        expected: usize,
        /// The dimension actually found.
        actual: usize,
    },
    /// Occurs when the fanout `M` is less than 2.
    InvalidFanout {
        /// The fanout value that was provided.
        m: usize,
    },
}

impl fmt::Display for StrtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrtreeError::EmptyInput => {
                write!(f, "cannot build a tree from an empty entry list")
            }
            StrtreeError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {expected}, found {actual}"
                )
            }
            StrtreeError::InvalidFanout { m } => {
                write!(f, "invalid fanout {m}: M must be at least 2")
            }
        }
    }
}

impl Error for StrtreeError {}
