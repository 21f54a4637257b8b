// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Aggregated results of several commands.

use serde::Serialize;

use crate::response::{CommandResult, ExtendedStatus, Pools, Record};

/// One poll of every query, as returned by
/// [`Miner::snapshot`](crate::Miner::snapshot).
///
/// Each field is independent: a category the miner did not answer is
/// `None` (or an empty [`ExtendedStatus`]) while the others are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MinerSnapshot {
    /// `version` reply.
    pub version: Option<Record>,
    /// `summary` reply.
    pub summary: Option<Record>,
    /// `stats` reply.
    pub stats: Option<Record>,
    /// `estats` reply.
    pub estats: ExtendedStatus,
    /// `devs` reply.
    pub devs: Option<Record>,
    /// `pools` reply, renumbered.
    pub pools: Option<Pools>,
}

impl MinerSnapshot {
    /// Returns true if at least one query was answered.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.version.is_some()
            || self.summary.is_some()
            || self.stats.is_some()
            || self.devs.is_some()
            || self.pools.is_some()
            || !self.estats.is_empty()
    }
}

/// Outcome of [`Miner::configure_pool`](crate::Miner::configure_pool).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolUpdate {
    /// Result of `setpool`.
    pub pool: CommandResult,
    /// Result of the follow-up reboot; `None` if `setpool` failed.
    pub reboot: Option<CommandResult>,
}

impl PoolUpdate {
    /// Returns true if the pool was written and the miner is rebooting.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.pool.success && self.reboot.as_ref().is_some_and(|r| r.success)
    }
}
