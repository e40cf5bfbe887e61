// SPDX-License-Identifier: MIT
//
// Console error taxonomy.
//
// Every backend failure collapses into one of four cases so callers can
// degrade sensibly: a feature the platform simply lacks, an I/O failure,
// a terminal that never answered, or an answer we could not read.

use std::time::Duration;

use thiserror::Error;

/// Why a console operation could not produce an answer.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The platform has no way to perform this operation. Permanent for
    /// the life of the process; retrying cannot help.
    #[error("console feature unavailable: {0}")]
    Unsupported(&'static str),

    /// The underlying read or write failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The terminal did not reply before the caller's deadline.
    #[error("terminal did not reply within {waited:?}")]
    Timeout {
        /// How long we waited before giving up.
        waited: Duration,
    },

    /// The terminal replied, but not in a format we recognize.
    #[error("unparseable terminal reply: {0:?}")]
    MalformedReply(String),
}

impl ConsoleError {
    /// True for failures that no amount of retrying will fix.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}
