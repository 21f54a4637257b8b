// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `avalon_lib` library.
//!
//! Decoding never fails: malformed responses degrade into empty records,
//! `None` readings or fallback variants. The types here cover what is left:
//! value validation, transport failures and commands the miner rejected.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the miner.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The miner answered but reported a failure.
    #[error("command rejected: {0}")]
    CommandRejected(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// An unknown work mode name or level.
    #[error("invalid work mode: {0}")]
    InvalidWorkMode(String),

    /// An unknown LED effect name.
    #[error("invalid LED effect: {0}")]
    InvalidLedEffect(String),

    /// A malformed hex color string.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A required setting is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Errors related to the TCP transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Socket level failure (connect, write or read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The attempt did not finish within the configured timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or port.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Every attempt failed.
    #[error("no response after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made (retries + 1).
        attempts: u32,
        /// The error of the final attempt.
        #[source]
        last: Box<ProtocolError>,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
