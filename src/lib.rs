// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Avalon Lib - A Rust library to monitor and control Avalon Nano miners.
//!
//! The miner exposes a CGMiner-style API on TCP port 4028: one command line
//! per connection, answered with pipe and comma separated `key=value`
//! sections. This library provides async access to it.
//!
//! # Supported Features
//!
//! - **Status queries**: version, summary, stats, devices, pools
//! - **Extended status**: temperatures, fans, power supply, LED, work mode
//! - **Settings**: work mode, LED effect and color, pool slots, reboot
//! - **LED color model**: firmware-compatible brightness scaling
//!
//! # Quick Start
//!
//! ```no_run
//! use avalon_lib::Miner;
//! use avalon_lib::types::{RgbColor, WorkMode};
//!
//! #[tokio::main]
//! async fn main() -> avalon_lib::Result<()> {
//!     let miner = Miner::tcp("192.168.1.50").build()?;
//!
//!     // Read everything at once
//!     let snapshot = miner.snapshot().await;
//!     if let Some(temp) = snapshot.estats.temperature("ITemp") {
//!         println!("intake: {temp} °C");
//!     }
//!
//!     // Change settings
//!     miner.set_work_mode(WorkMode::Mid).await.into_result()?;
//!     miner.set_led_color(RgbColor::new(255, 120, 0), 128).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure Model
//!
//! Commands are retried on transport errors (see
//! [`Endpoint`](protocol::Endpoint)). When the miner still does not answer,
//! reads return `None` and writes return a [`CommandResult`] with
//! `success == false`. Malformed replies decode into whatever could be
//! recovered; decoding never fails.

pub mod command;
pub mod config;
pub mod error;
mod miner;
pub mod protocol;
pub mod response;
pub mod types;

pub use command::{AscsetCommand, Command, QueryCommand, SetPoolCommand};
pub use config::MinerConfig;
pub use error::{Error, ProtocolError, Result, ValueError};
pub use miner::{
    DEFAULT_WEB_PASSWORD, DEFAULT_WEB_USER, Miner, MinerBuilder, MinerSnapshot, PoolUpdate,
    WebCredentials,
};
pub use protocol::{Endpoint, Protocol, TcpClient};
pub use response::{CommandResult, ExtendedStatus, Pools, Record, Scalar, Section};
pub use types::{LedEffect, LedSetting, RgbColor, WorkMode};
