// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of CGMiner API replies.
//!
//! Two grammars are in use:
//!
//! - the generic `STATUS|SECTION,key=value,...|...` layout shared by most
//!   commands, decoded by [`decode`] into a [`Record`];
//! - the `KEY[value]` layout of the `estats` payload, decoded by
//!   [`decode_extended`] into an [`ExtendedStatus`].
//!
//! Both decoders are total: they never fail, they only decode less.

mod command_result;
mod estats;
mod record;
mod scalar;

pub use command_result::{CommandResult, NO_MESSAGE, NO_RESPONSE_MESSAGE};
pub use estats::{
    ExtendedStatus, LedStatus, LedUser, LedUserSetting, PowerSupply, PowerSupplyReading,
    TEMPERATURE_KEYS, decode_extended,
};
pub use record::{Fields, POOL_SECTION, Pools, Record, STATUS_SECTION, Section, decode};
pub use scalar::Scalar;
