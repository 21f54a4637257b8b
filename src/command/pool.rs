// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pool configuration command.

use std::fmt;

use crate::command::Command;

/// Writes one pool slot: `setpool|<web_user>,<web_password>,<index>,<url>,<user>,<password>`.
///
/// Slots are numbered 1-3 by callers and 0-2 by the firmware. Indices 1, 2
/// and 3 are shifted down; anything else is sent unchanged.
///
/// Some firmware answers a successful `setpool` with a non-`S` status and a
/// message such as `"Set info success"`, so this command also counts a reply
/// as successful when its message contains `success` or `set info`
/// (case-insensitive).
///
/// # Examples
///
/// ```
/// use avalon_lib::command::{Command, SetPoolCommand};
///
/// let cmd = SetPoolCommand::new("admin", "admin", 2, "stratum+tcp://pool:3333", "wallet.nano", "x");
/// assert_eq!(cmd.device_index(), 1);
/// assert_eq!(
///     cmd.to_wire(),
///     "setpool|admin,admin,1,stratum+tcp://pool:3333,wallet.nano,x"
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SetPoolCommand {
    web_user: String,
    web_password: String,
    index: i64,
    url: String,
    user: String,
    password: String,
}

impl SetPoolCommand {
    /// Creates a pool command for the 1-based slot `index`.
    #[must_use]
    pub fn new(
        web_user: impl Into<String>,
        web_password: impl Into<String>,
        index: i64,
        url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            web_user: web_user.into(),
            web_password: web_password.into(),
            index,
            url: url.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Slot index as given by the caller.
    #[must_use]
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Slot index as sent to the firmware.
    #[must_use]
    pub fn device_index(&self) -> i64 {
        match self.index {
            1..=3 => self.index - 1,
            other => other,
        }
    }

    /// Pool URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pool worker name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }
}

impl fmt::Debug for SetPoolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetPoolCommand")
            .field("web_user", &self.web_user)
            .field("index", &self.index)
            .field("url", &self.url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl Command for SetPoolCommand {
    fn name(&self) -> &'static str {
        "setpool"
    }

    fn parameter(&self) -> Option<String> {
        Some(format!(
            "{},{},{},{},{},{}",
            self.web_user,
            self.web_password,
            self.device_index(),
            self.url,
            self.user,
            self.password
        ))
    }

    fn accepts_as_success(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        message.contains("success") || message.contains("set info")
    }
}
