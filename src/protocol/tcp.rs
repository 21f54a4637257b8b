// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP transport for the CGMiner API.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::ProtocolError;
use crate::protocol::Protocol;

/// Pause between two attempts of the same command.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on a reply; reading stops once this many bytes arrived.
pub const MAX_RESPONSE_BYTES: usize = 256 * 1024;

const READ_CHUNK: usize = 4096;

// ============================================================================
// Endpoint - Connection settings
// ============================================================================

/// Connection settings for one miner.
///
/// # Examples
///
/// ```
/// use avalon_lib::protocol::Endpoint;
/// use std::time::Duration;
///
/// let endpoint = Endpoint::new("192.168.1.50")
///     .with_port(4029)
///     .with_timeout(Duration::from_secs(2))
///     .with_retries(0);
///
/// assert_eq!(endpoint.port(), 4029);
/// assert_eq!(endpoint.attempts(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    timeout: Duration,
    retries: u32,
}

impl Endpoint {
    /// Default CGMiner API port.
    pub const DEFAULT_PORT: u16 = 4028;
    /// Default per-attempt timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Default number of extra attempts.
    pub const DEFAULT_RETRIES: u32 = 2;

    /// Creates settings for `host` with the default port, timeout and retries.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
            retries: Self::DEFAULT_RETRIES,
        }
    }

    /// Sets the API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the timeout of one attempt (connect, write and read).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a failed attempt is repeated.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the number of retries.
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Total attempts per command: retries + 1.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Creates a [`TcpClient`] for these settings.
    #[must_use]
    pub fn into_client(self) -> TcpClient {
        TcpClient::new(self)
    }
}

// ============================================================================
// TcpClient - One connection per command
// ============================================================================

/// TCP client for the CGMiner API.
///
/// Each command opens a fresh connection; the client holds no socket and can
/// be shared freely. A failed attempt (connect error, I/O error, timeout) is
/// repeated after [`RETRY_DELAY`], up to [`Endpoint::retries`] times.
///
/// # Examples
///
/// ```no_run
/// use avalon_lib::protocol::{Endpoint, TcpClient};
///
/// # async fn example() {
/// let client = TcpClient::new(Endpoint::new("192.168.1.50"));
/// if let Some(reply) = client.send("version").await {
///     println!("{reply}");
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TcpClient {
    endpoint: Endpoint,
}

impl TcpClient {
    /// Creates a client for `endpoint`.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// Returns the connection settings.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Sends a command line, returning `None` if every attempt failed.
    ///
    /// A failed send is logged once at `warn` level: after the last retry,
    /// or right away for an empty host, which is never attempted.
    pub async fn send(&self, line: &str) -> Option<String> {
        self.send_raw(line).await.ok()
    }

    async fn attempt(&self, line: &str) -> Result<String, ProtocolError> {
        let timeout = self.endpoint.timeout;

        // Safe: configured timeouts are far below u64::MAX milliseconds
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = timeout.as_millis() as u64;

        tokio::time::timeout(timeout, self.exchange(line))
            .await
            .map_err(|_| ProtocolError::Timeout(timeout_ms))?
    }

    async fn exchange(&self, line: &str) -> Result<String, ProtocolError> {
        let mut stream =
            TcpStream::connect((self.endpoint.host.as_str(), self.endpoint.port)).await?;

        stream.write_all(line.as_bytes()).await?;
        stream.flush().await?;

        let body = read_reply(&mut stream).await?;
        tracing::debug!(
            command = command_name(line),
            bytes = body.len(),
            "Received miner reply"
        );

        Ok(clean_reply(&body))
    }
}

impl Protocol for TcpClient {
    async fn send_raw(&self, line: &str) -> Result<String, ProtocolError> {
        if self.endpoint.host.trim().is_empty() {
            let err = ProtocolError::InvalidAddress(format!(
                "empty host (port {})",
                self.endpoint.port
            ));
            tracing::warn!(
                command = command_name(line),
                error = %err,
                "Miner has no address"
            );
            return Err(err);
        }

        let attempts = self.endpoint.attempts();
        let mut attempt = 1;

        tracing::debug!(
            host = %self.endpoint.host,
            port = self.endpoint.port,
            command = command_name(line),
            "Sending miner command"
        );

        loop {
            match self.attempt(line).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < attempts => {
                    tracing::debug!(
                        command = command_name(line),
                        attempt,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => {
                    tracing::warn!(
                        host = %self.endpoint.host,
                        command = command_name(line),
                        attempts,
                        error = %e,
                        "Miner did not answer"
                    );
                    return Err(ProtocolError::RetriesExhausted {
                        attempts,
                        last: Box::new(e),
                    });
                }
            }
        }
    }
}

/// Command word of a line; parameters may carry credentials and are not logged.
fn command_name(line: &str) -> &str {
    line.split_once('|').map_or(line, |(name, _)| name)
}

/// Reads until EOF or [`MAX_RESPONSE_BYTES`].
async fn read_reply<R: AsyncRead + Unpin>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    while body.len() < MAX_RESPONSE_BYTES {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = MAX_RESPONSE_BYTES - body.len();
        body.extend_from_slice(&chunk[..n.min(room)]);
    }

    Ok(body)
}

/// Decodes lossily and strips whitespace and the NUL terminator.
fn clean_reply(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}
