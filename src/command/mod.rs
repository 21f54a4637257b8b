// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CGMiner API command definitions.
//!
//! A command line is the command name, optionally followed by `|` and a
//! parameter string. There is no framing: the line is written as-is and the
//! miner closes the connection after answering.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Wire example |
//! |-------------|---------|--------------|
//! | [`QueryCommand`] | Read-only queries | `summary`, `estats` |
//! | [`AscsetCommand`] | Work mode, LED and reboot | `ascset\|0,reboot,0` |
//! | [`SetPoolCommand`] | Pool configuration | `setpool\|admin,admin,0,url,user,pass` |
//!
//! # Examples
//!
//! ```
//! use avalon_lib::command::{AscsetCommand, Command, QueryCommand};
//! use avalon_lib::types::WorkMode;
//!
//! assert_eq!(QueryCommand::Summary.to_wire(), "summary");
//!
//! let cmd = AscsetCommand::WorkMode(WorkMode::High);
//! assert_eq!(cmd.name(), "ascset");
//! assert_eq!(cmd.to_wire(), "ascset|0,workmode,set,2");
//! ```

mod ascset;
mod pool;
mod query;

pub use ascset::AscsetCommand;
pub use pool::SetPoolCommand;
pub use query::QueryCommand;

/// A command that can be sent to a miner.
pub trait Command {
    /// Returns the command name, for example `"summary"` or `"ascset"`.
    fn name(&self) -> &'static str;

    /// Returns the parameter string sent after `|`, if any.
    fn parameter(&self) -> Option<String>;

    /// Returns the full command line.
    ///
    /// Format: `<name>|<parameter>` or just `<name>`.
    fn to_wire(&self) -> String {
        match self.parameter() {
            Some(parameter) => format!("{}|{parameter}", self.name()),
            None => self.name().to_string(),
        }
    }

    /// Whether a reply whose `STATUS` code is not `"S"` still counts as
    /// success, judging by its message.
    ///
    /// Most commands trust the status code alone.
    fn accepts_as_success(&self, _message: &str) -> bool {
        false
    }
}
