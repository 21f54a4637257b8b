// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable connection settings.
//!
//! [`MinerConfig`] is what an application stores (in a settings file, an
//! options form, ...) to recreate a [`Miner`](crate::Miner). Only `host` is
//! required; everything else falls back to the API defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Miner;
use crate::error::ValueError;
use crate::miner::{DEFAULT_WEB_PASSWORD, DEFAULT_WEB_USER, MinerBuilder};
use crate::protocol::Endpoint;

/// Connection settings for one miner.
///
/// # Examples
///
/// ```
/// use avalon_lib::config::MinerConfig;
///
/// let config: MinerConfig = serde_json::from_str(r#"{"host": "192.168.1.50", "retries": 0}"#).unwrap();
/// assert_eq!(config.port, 4028);
/// assert_eq!(config.retries, 0);
///
/// let miner = config.into_builder().build().unwrap();
/// assert_eq!(miner.protocol().endpoint().attempts(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Host name or IP address.
    pub host: String,
    /// CGMiner API port (default 4028).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-attempt timeout in seconds (default 5).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a failure (default 2).
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Web interface user (default `admin`).
    #[serde(default = "default_web_user")]
    pub web_user: String,
    /// Web interface password (default `admin`).
    #[serde(default = "default_web_password")]
    pub web_password: String,
}

fn default_port() -> u16 {
    Endpoint::DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    Endpoint::DEFAULT_TIMEOUT.as_secs()
}

fn default_retries() -> u32 {
    Endpoint::DEFAULT_RETRIES
}

fn default_web_user() -> String {
    DEFAULT_WEB_USER.to_string()
}

fn default_web_password() -> String {
    DEFAULT_WEB_PASSWORD.to_string()
}

impl MinerConfig {
    /// Creates a configuration for `host` with default values.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            web_user: default_web_user(),
            web_password: default_web_password(),
        }
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Checks the settings a miner cannot work without.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::EmptyField`] for an empty host or web password.
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.host.trim().is_empty() {
            return Err(ValueError::EmptyField("host"));
        }
        if self.web_password.is_empty() {
            return Err(ValueError::EmptyField("web_password"));
        }
        Ok(())
    }

    /// Converts into a builder; call [`MinerBuilder::build`] to finish.
    #[must_use]
    pub fn into_builder(self) -> MinerBuilder {
        let timeout = self.timeout();
        Miner::tcp(self.host)
            .with_port(self.port)
            .with_timeout(timeout)
            .with_retries(self.retries)
            .with_web_credentials(self.web_user, self.web_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_host_is_required() {
        let config: MinerConfig = serde_json::from_str(r#"{"host": "10.0.0.9"}"#).unwrap();
        assert_eq!(config, MinerConfig::new("10.0.0.9"));
        assert_eq!(config.port, 4028);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retries, 2);
        assert_eq!(config.web_user, "admin");
        assert_eq!(config.web_password, "admin");
    }

    #[test]
    fn missing_host_fails() {
        assert!(serde_json::from_str::<MinerConfig>(r#"{"port": 4028}"#).is_err());
    }

    #[test]
    fn validate_rejects_empty_fields() {
        assert_eq!(
            MinerConfig::new("").validate(),
            Err(ValueError::EmptyField("host"))
        );

        let mut config = MinerConfig::new("10.0.0.9");
        config.web_password.clear();
        assert_eq!(config.validate(), Err(ValueError::EmptyField("web_password")));

        assert_eq!(MinerConfig::new("10.0.0.9").validate(), Ok(()));
    }

    #[test]
    fn into_builder_carries_every_field() {
        let config = MinerConfig {
            host: "nano.local".to_string(),
            port: 4029,
            timeout_secs: 2,
            retries: 1,
            web_user: "root".to_string(),
            web_password: "pw".to_string(),
        };

        let miner = config.into_builder().build().unwrap();
        let endpoint = miner.protocol().endpoint();
        assert_eq!(endpoint.host(), "nano.local");
        assert_eq!(endpoint.port(), 4029);
        assert_eq!(endpoint.timeout(), Duration::from_secs(2));
        assert_eq!(endpoint.attempts(), 2);
        assert_eq!(miner.web_credentials().user(), "root");
    }

    #[test]
    fn serializes_every_field() {
        let json = serde_json::to_value(MinerConfig::new("h")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "host": "h",
                "port": 4028,
                "timeout_secs": 5,
                "retries": 2,
                "web_user": "admin",
                "web_password": "admin"
            })
        );
    }
}
