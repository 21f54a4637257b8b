// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome of a single command.

use serde::Serialize;

use super::{Record, decode};
use crate::command::Command;
use crate::error::Error;

/// Message used when the miner never answered.
pub const NO_RESPONSE_MESSAGE: &str = "No response from miner";

/// Message used when the `STATUS` section carries no `Msg` field.
pub const NO_MESSAGE: &str = "No message";

/// Outcome of a command sent to the miner.
///
/// `success` reflects the `STATUS` code of the reply (`"S"`), unless the
/// command has its own success policy (see
/// [`Command::accepts_as_success`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    /// Whether the miner accepted the command.
    pub success: bool,
    /// The miner's `Msg`, or a placeholder.
    pub message: String,
    /// The reply text; `None` if nothing was received.
    pub raw: Option<String>,
    /// The decoded reply; `None` if nothing was received.
    pub parsed: Option<Record>,
}

impl CommandResult {
    /// Result for a command that got no reply.
    #[must_use]
    pub fn no_response() -> Self {
        Self {
            success: false,
            message: NO_RESPONSE_MESSAGE.to_string(),
            raw: None,
            parsed: None,
        }
    }

    /// Decodes a reply to `command`.
    #[must_use]
    pub fn from_reply<C: Command + ?Sized>(command: &C, raw: String) -> Self {
        let parsed = decode(&raw);
        let message = parsed.message().unwrap_or(NO_MESSAGE).to_string();
        let success =
            parsed.status_code() == Some("S") || command.accepts_as_success(&message);

        Self {
            success,
            message,
            raw: Some(raw),
            parsed: Some(parsed),
        }
    }

    /// Returns true if the miner answered at all.
    #[must_use]
    pub fn has_response(&self) -> bool {
        self.raw.is_some()
    }

    /// Converts an unsuccessful result into an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandRejected`] with the result message if
    /// `success` is false.
    pub fn into_result(self) -> Result<Self, Error> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::CommandRejected(self.message))
        }
    }
}
