// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Miner work mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Performance tier of the miner.
///
/// Sent as `ascset|0,workmode,set,<level>` and reported back as
/// `WORKMODE[<level>]` in the extended status.
///
/// # Examples
///
/// ```
/// use avalon_lib::types::WorkMode;
///
/// let mode: WorkMode = "mid".parse().unwrap();
/// assert_eq!(mode.level(), 1);
/// assert_eq!(WorkMode::try_from(2).unwrap(), WorkMode::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkMode {
    /// Lowest power draw.
    Low,
    /// Balanced.
    Mid,
    /// Highest hash rate.
    High,
}

impl WorkMode {
    /// Every mode, ordered by level.
    pub const ALL: [Self; 3] = [Self::Low, Self::Mid, Self::High];

    /// Level number used on the wire.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Mid => 1,
            Self::High => 2,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Mid => "Mid",
            Self::High => "High",
        }
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for WorkMode {
    type Error = ValueError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|mode| i64::from(mode.level()) == level)
            .ok_or(ValueError::OutOfRange {
                min: 0,
                max: 2,
                actual: level,
            })
    }
}

impl FromStr for WorkMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s) || mode.level().to_string() == s)
            .ok_or_else(|| ValueError::InvalidWorkMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(WorkMode::Low.level(), 0);
        assert_eq!(WorkMode::Mid.level(), 1);
        assert_eq!(WorkMode::High.level(), 2);
    }

    #[test]
    fn parses_names_and_digits() {
        assert_eq!("Low".parse::<WorkMode>().unwrap(), WorkMode::Low);
        assert_eq!("HIGH".parse::<WorkMode>().unwrap(), WorkMode::High);
        assert_eq!("1".parse::<WorkMode>().unwrap(), WorkMode::Mid);
        assert!(matches!(
            "turbo".parse::<WorkMode>(),
            Err(ValueError::InvalidWorkMode(s)) if s == "turbo"
        ));
        assert!("3".parse::<WorkMode>().is_err());
    }

    #[test]
    fn from_reported_level() {
        assert_eq!(WorkMode::try_from(0).unwrap(), WorkMode::Low);
        assert_eq!(
            WorkMode::try_from(5),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 2,
                actual: 5
            })
        );
    }

    #[test]
    fn display_round_trips() {
        for mode in WorkMode::ALL {
            assert_eq!(mode.to_string().parse::<WorkMode>().unwrap(), mode);
        }
    }
}
