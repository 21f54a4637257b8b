// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ascset` commands: settings applied to ASIC controller 0.

use crate::command::Command;
use crate::types::{LedSetting, WorkMode};

/// Settings written through `ascset|0,<option>,...`.
///
/// # Examples
///
/// ```
/// use avalon_lib::command::{AscsetCommand, Command};
/// use avalon_lib::types::LedSetting;
///
/// let cmd = AscsetCommand::Led(LedSetting::off());
/// assert_eq!(cmd.parameter(), Some("0,ledset,0-5-50-0-0-0".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AscsetCommand {
    /// Switch performance tier.
    WorkMode(WorkMode),
    /// Write the LED effect, brightness, color temperature and color.
    Led(LedSetting),
    /// Reboot the miner.
    Reboot,
}

impl Command for AscsetCommand {
    fn name(&self) -> &'static str {
        "ascset"
    }

    fn parameter(&self) -> Option<String> {
        let parameter = match self {
            Self::WorkMode(mode) => format!("0,workmode,set,{}", mode.level()),
            Self::Led(setting) => format!("0,ledset,{}", setting.to_parameter()),
            Self::Reboot => "0,reboot,0".to_string(),
        };
        Some(parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LedEffect, RgbColor};

    #[test]
    fn work_mode_levels() {
        assert_eq!(
            AscsetCommand::WorkMode(WorkMode::Mid).to_wire(),
            "ascset|0,workmode,set,1"
        );
        assert_eq!(
            AscsetCommand::WorkMode(WorkMode::High).to_wire(),
            "ascset|0,workmode,set,2"
        );
    }

    #[test]
    fn led_clamps_brightness() {
        let setting = LedSetting::new(LedEffect::FLASH, 120, 50, RgbColor::new(0, 128, 255));
        assert_eq!(
            AscsetCommand::Led(setting).to_wire(),
            "ascset|0,ledset,2-100-50-0-128-255"
        );
    }

    #[test]
    fn reboot() {
        assert_eq!(AscsetCommand::Reboot.to_wire(), "ascset|0,reboot,0");
    }
}
