// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only query commands.

use crate::command::Command;

/// Parameterless queries.
///
/// All of them are answered in the generic `STATUS|SECTION,...` layout,
/// except [`QueryCommand::Estats`] whose payload uses `KEY[value]` tokens.
///
/// # Examples
///
/// ```
/// use avalon_lib::command::{Command, QueryCommand};
///
/// assert_eq!(QueryCommand::Devs.name(), "devs");
/// assert_eq!(QueryCommand::Devs.parameter(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCommand {
    /// Firmware and API version.
    Version,
    /// Aggregate hashing statistics.
    Summary,
    /// Per-device statistics.
    Stats,
    /// Device list.
    Devs,
    /// Configured pools.
    Pools,
    /// Extended status: temperatures, fans, PSU, LED and work mode.
    Estats,
}

impl QueryCommand {
    /// Every query, in the order a full poll sends them.
    pub const ALL: [Self; 6] = [
        Self::Version,
        Self::Summary,
        Self::Stats,
        Self::Estats,
        Self::Devs,
        Self::Pools,
    ];
}

impl Command for QueryCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Summary => "summary",
            Self::Stats => "stats",
            Self::Devs => "devs",
            Self::Pools => "pools",
            Self::Estats => "estats",
        }
    }

    fn parameter(&self) -> Option<String> {
        None
    }
}
