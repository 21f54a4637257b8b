// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level miner abstraction.
//!
//! [`Miner`] wraps a [`Protocol`] and exposes one method per API operation.
//! Reads return decoded records, or `None` when the miner did not answer;
//! writes return a [`CommandResult`] that is never an `Err`, so a poller can
//! keep going when a single command fails.
//!
//! ```no_run
//! use avalon_lib::Miner;
//! use avalon_lib::types::WorkMode;
//!
//! # async fn example() -> avalon_lib::Result<()> {
//! let miner = Miner::tcp("192.168.1.50")
//!     .with_web_credentials("admin", "secret")
//!     .build()?;
//!
//! if let Some(summary) = miner.summary().await {
//!     println!("{summary:?}");
//! }
//!
//! let result = miner.set_work_mode(WorkMode::Low).await;
//! println!("{}: {}", result.success, result.message);
//! # Ok(())
//! # }
//! ```

mod builder;
mod snapshot;

pub use builder::MinerBuilder;
pub use snapshot::{MinerSnapshot, PoolUpdate};

use std::fmt;
use std::sync::Arc;

use crate::command::{AscsetCommand, Command, QueryCommand, SetPoolCommand};
use crate::error::Error;
use crate::protocol::{Endpoint, Protocol, TcpClient};
use crate::response::{
    CommandResult, ExtendedStatus, LedUserSetting, Pools, Record, decode, decode_extended,
};
use crate::types::{
    DEFAULT_COLOR_TEMP, LedEffect, LedSetting, MAX_BRIGHTNESS, RgbColor, WorkMode,
    firmware_scale,
};

/// Default user of the miner's web interface, required by `setpool`.
pub const DEFAULT_WEB_USER: &str = "admin";

/// Default password of the miner's web interface.
pub const DEFAULT_WEB_PASSWORD: &str = "admin";

/// Web interface credentials sent with `setpool`.
#[derive(Clone, PartialEq, Eq)]
pub struct WebCredentials {
    user: String,
    password: String,
}

impl WebCredentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Returns the user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Default for WebCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_WEB_USER, DEFAULT_WEB_PASSWORD)
    }
}

impl fmt::Debug for WebCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// A miner reachable through a [`Protocol`].
///
/// Cloning is cheap and clones share the transport.
///
/// # Creating a Miner
///
/// Use [`Miner::tcp`] for the CGMiner TCP API, or [`Miner::new`] with any
/// other [`Protocol`] implementation.
#[derive(Debug)]
pub struct Miner<P: Protocol> {
    protocol: Arc<P>,
    credentials: WebCredentials,
}

impl<P: Protocol> Clone for Miner<P> {
    fn clone(&self) -> Self {
        Self {
            protocol: Arc::clone(&self.protocol),
            credentials: self.credentials.clone(),
        }
    }
}

impl Miner<TcpClient> {
    /// Starts building a TCP miner for `host` with default settings.
    #[must_use]
    pub fn tcp(host: impl Into<String>) -> MinerBuilder {
        MinerBuilder::new(Endpoint::new(host))
    }

    /// Starts building a TCP miner from existing connection settings.
    #[must_use]
    pub fn from_endpoint(endpoint: Endpoint) -> MinerBuilder {
        MinerBuilder::new(endpoint)
    }
}

impl<P: Protocol> Miner<P> {
    /// Creates a miner over `protocol` with the default web credentials.
    #[must_use]
    pub fn new(protocol: P) -> Self {
        Self {
            protocol: Arc::new(protocol),
            credentials: WebCredentials::default(),
        }
    }

    /// Replaces the web credentials.
    #[must_use]
    pub fn with_web_credentials(mut self, credentials: WebCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns the web credentials.
    #[must_use]
    pub fn web_credentials(&self) -> &WebCredentials {
        &self.credentials
    }

    /// Sends a raw command line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the miner did not answer.
    pub async fn send_raw(&self, line: &str) -> Result<String, Error> {
        self.protocol.send_raw(line).await.map_err(Error::Protocol)
    }

    /// Sends a command and decodes the reply into a [`CommandResult`].
    pub async fn command<C: Command + ?Sized>(&self, command: &C) -> CommandResult {
        match self.protocol.send_command(command).await {
            Ok(raw) => CommandResult::from_reply(command, raw),
            Err(_) => CommandResult::no_response(),
        }
    }

    // ========== Queries ==========

    /// Sends a query and decodes the reply; `None` if the miner did not answer.
    pub async fn query(&self, query: QueryCommand) -> Option<Record> {
        let raw = self.protocol.send_command(&query).await.ok()?;
        Some(decode(&raw))
    }

    /// Firmware and API versions.
    pub async fn version(&self) -> Option<Record> {
        self.query(QueryCommand::Version).await
    }

    /// Aggregate hashing statistics.
    pub async fn summary(&self) -> Option<Record> {
        self.query(QueryCommand::Summary).await
    }

    /// Per-device statistics.
    pub async fn stats(&self) -> Option<Record> {
        self.query(QueryCommand::Stats).await
    }

    /// Device list.
    pub async fn devs(&self) -> Option<Record> {
        self.query(QueryCommand::Devs).await
    }

    /// Configured pools keyed `p1`, `p2`, ... in the order the miner lists
    /// them.
    pub async fn pools(&self) -> Option<Pools> {
        self.query(QueryCommand::Pools).await.map(Record::into_pools)
    }

    /// Extended status. Empty when the miner did not answer.
    pub async fn estats(&self) -> ExtendedStatus {
        self.protocol
            .send_command(&QueryCommand::Estats)
            .await
            .map(|raw| decode_extended(&raw))
            .unwrap_or_default()
    }

    /// Runs every query concurrently.
    ///
    /// Each category fails on its own; see [`MinerSnapshot`].
    pub async fn snapshot(&self) -> MinerSnapshot {
        let (version, summary, stats, estats, devs, pools) = tokio::join!(
            self.version(),
            self.summary(),
            self.stats(),
            self.estats(),
            self.devs(),
            self.pools(),
        );

        MinerSnapshot {
            version,
            summary,
            stats,
            estats,
            devs,
            pools,
        }
    }

    // ========== Settings ==========

    /// Switches the work mode.
    pub async fn set_work_mode(&self, mode: WorkMode) -> CommandResult {
        self.command(&AscsetCommand::WorkMode(mode)).await
    }

    /// Writes an LED setting. Brightness is clamped to 5-100.
    pub async fn set_led(&self, setting: LedSetting) -> CommandResult {
        self.command(&AscsetCommand::Led(setting)).await
    }

    /// Switches the LED off.
    pub async fn turn_led_off(&self) -> CommandResult {
        self.set_led(LedSetting::off()).await
    }

    /// Shows `base` as a steady color at `brightness` (0-255).
    ///
    /// The color is scaled with [`firmware_scale`] first.
    pub async fn set_led_color(&self, base: RgbColor, brightness: u8) -> CommandResult {
        self.set_led(LedSetting::stay(firmware_scale(base, brightness)))
            .await
    }

    /// Changes the LED effect, keeping the brightness, color temperature and
    /// color from `current` (usually the last polled `LEDUser` value).
    ///
    /// Without a current setting, full brightness white is used.
    pub async fn set_led_effect(
        &self,
        effect: LedEffect,
        current: Option<&LedUserSetting>,
    ) -> CommandResult {
        let setting = current.map_or(
            LedSetting::new(effect, MAX_BRIGHTNESS, DEFAULT_COLOR_TEMP, RgbColor::WHITE),
            |user| user.with_effect(effect),
        );
        self.set_led(setting).await
    }

    /// Reboots the miner.
    pub async fn reboot(&self) -> CommandResult {
        self.command(&AscsetCommand::Reboot).await
    }

    /// Writes pool slot `index` (1-3).
    ///
    /// The miner applies pool changes after a reboot; see
    /// [`configure_pool`](Self::configure_pool).
    pub async fn set_pool(
        &self,
        index: i64,
        url: &str,
        user: &str,
        password: &str,
    ) -> CommandResult {
        let command = SetPoolCommand::new(
            self.credentials.user(),
            self.credentials.password(),
            index,
            url,
            user,
            password,
        );
        let result = self.command(&command).await;

        if result.success {
            tracing::info!(
                pool = index,
                message = %result.message,
                "Pool set, reboot required"
            );
        } else {
            tracing::error!(
                pool = index,
                message = %result.message,
                raw = ?result.raw,
                "Failed to set pool"
            );
        }

        result
    }

    /// Writes pool slot `index`, then reboots if the miner accepted it.
    pub async fn configure_pool(
        &self,
        index: i64,
        url: &str,
        user: &str,
        password: &str,
    ) -> PoolUpdate {
        let pool = self.set_pool(index, url, user, password).await;
        let reboot = if pool.success {
            Some(self.reboot().await)
        } else {
            None
        };
        PoolUpdate { pool, reboot }
    }
}
