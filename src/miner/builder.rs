// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP miner builder.

use std::time::Duration;

use crate::error::{Error, ValueError};
use crate::miner::{Miner, WebCredentials};
use crate::protocol::{Endpoint, TcpClient};

/// Builder for miners reached over the CGMiner TCP API.
///
/// Created by [`Miner::tcp`] or [`Miner::from_endpoint`]. Nothing is sent
/// while building: the first command opens the first connection.
///
/// # Examples
///
/// ```
/// use avalon_lib::Miner;
/// use std::time::Duration;
///
/// # fn example() -> avalon_lib::Result<()> {
/// let miner = Miner::tcp("192.168.1.50")
///     .with_port(4028)
///     .with_timeout(Duration::from_secs(3))
///     .with_retries(1)
///     .with_web_credentials("admin", "secret")
///     .build()?;
///
/// assert_eq!(miner.protocol().endpoint().attempts(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MinerBuilder {
    endpoint: Endpoint,
    credentials: WebCredentials,
}

impl MinerBuilder {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            credentials: WebCredentials::default(),
        }
    }

    /// Sets the API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.endpoint = self.endpoint.with_port(port);
        self
    }

    /// Sets the timeout of one attempt.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint = self.endpoint.with_timeout(timeout);
        self
    }

    /// Sets how many times a failed attempt is repeated.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.endpoint = self.endpoint.with_retries(retries);
        self
    }

    /// Sets the web interface credentials used by `setpool`.
    #[must_use]
    pub fn with_web_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = WebCredentials::new(user, password);
        self
    }

    /// Returns the connection settings.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Builds the miner.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyField`] if the host is empty.
    pub fn build(self) -> Result<Miner<TcpClient>, Error> {
        if self.endpoint.host().trim().is_empty() {
            return Err(ValueError::EmptyField("host").into());
        }

        Ok(Miner::new(TcpClient::new(self.endpoint)).with_web_credentials(self.credentials))
    }
}
