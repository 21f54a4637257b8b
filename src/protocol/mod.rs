// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the miner's CGMiner API.
//!
//! The API is line-oriented and connectionless from the client's point of
//! view: every command opens a TCP connection, writes the command line and
//! reads until the miner closes the socket.
//!
//! # Protocols
//!
//! - [`TcpClient`]: the TCP transport with bounded retries, configured by an
//!   [`Endpoint`]
//!
//! Other transports (or test doubles) implement [`Protocol`].

mod tcp;

pub use tcp::{Endpoint, MAX_RESPONSE_BYTES, RETRY_DELAY, TcpClient};

use crate::command::Command;
use crate::error::ProtocolError;

/// Trait for transports that can deliver a command line to a miner.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Sends a raw command line and returns the reply text.
    ///
    /// An empty reply is a valid answer and is returned as `Ok("")`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if no reply could be obtained.
    async fn send_raw(&self, line: &str) -> Result<String, ProtocolError>;

    /// Sends a typed command.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if no reply could be obtained.
    async fn send_command<C: Command + ?Sized>(
        &self,
        command: &C,
    ) -> Result<String, ProtocolError> {
        self.send_raw(&command.to_wire()).await
    }
}
