// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for miner control.
//!
//! # Types
//!
//! - [`WorkMode`] - Performance tier (Low/Mid/High)
//! - [`LedEffect`] - LED effect number
//! - [`LedSetting`] - Full `ledset` parameter
//! - [`RgbColor`] - 8-bit RGB color
//!
//! # LED color model
//!
//! - [`firmware_scale`] - Perceptual color and brightness to firmware color
//! - [`reconstruct_base_color`] - Firmware color back to a perceptual color

mod led;
mod rgb_color;
mod work_mode;

pub use led::{
    DEFAULT_COLOR_TEMP, FIRMWARE_CHANNEL_FLOOR, FirmwareColor, LedEffect, LedSetting,
    MAX_BRIGHTNESS, MIN_BRIGHTNESS, firmware_scale, reconstruct_base_color,
};
pub use rgb_color::RgbColor;
pub use work_mode::WorkMode;
