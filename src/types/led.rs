// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED settings and the firmware color model.
//!
//! The miner stores its LED color already scaled by brightness, and refuses
//! colors where every channel is below [`FIRMWARE_CHANNEL_FLOOR`]. A user
//! picks a full-brightness color and a 0-255 brightness; [`firmware_scale`]
//! turns that into what the firmware accepts, and
//! [`reconstruct_base_color`] goes (approximately) the other way for a
//! polled `LEDUser` value.
//!
//! # Miner Methods
//!
//! - [`set_led()`](crate::Miner::set_led) - Send a full [`LedSetting`]
//! - [`set_led_color()`](crate::Miner::set_led_color) - Scale and send a color
//! - [`set_led_effect()`](crate::Miner::set_led_effect) - Change only the effect

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

use super::RgbColor;

/// Lowest brightness percentage the firmware accepts.
pub const MIN_BRIGHTNESS: u8 = 5;

/// Highest brightness percentage.
pub const MAX_BRIGHTNESS: u8 = 100;

/// Color temperature sent when the caller does not choose one.
pub const DEFAULT_COLOR_TEMP: u16 = 50;

/// At least one scaled channel must reach this value.
pub const FIRMWARE_CHANNEL_FLOOR: u8 = 13;

/// LED effect number.
///
/// | Value | Name |
/// |-------|------|
/// | 0 | `LED_off` |
/// | 1 | `Stay` |
/// | 2 | `Flash` |
/// | 3 | `Breathing` |
/// | 4 | `Loop` |
///
/// Unknown numbers reported by newer firmware are kept as-is.
///
/// # Examples
///
/// ```
/// use avalon_lib::types::LedEffect;
///
/// let effect: LedEffect = "breathing".parse().unwrap();
/// assert_eq!(effect, LedEffect::BREATHING);
/// assert_eq!(effect.value(), 3);
/// assert_eq!(LedEffect::STAY.name(), Some("Stay"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedEffect(u8);

impl LedEffect {
    /// LED off.
    pub const OFF: Self = Self(0);

    /// Steady color.
    pub const STAY: Self = Self(1);

    /// Flashing.
    pub const FLASH: Self = Self(2);

    /// Breathing.
    pub const BREATHING: Self = Self(3);

    /// Color loop.
    pub const LOOP: Self = Self(4);

    const NAMED: [(Self, &'static str); 5] = [
        (Self::OFF, "LED_off"),
        (Self::STAY, "Stay"),
        (Self::FLASH, "Flash"),
        (Self::BREATHING, "Breathing"),
        (Self::LOOP, "Loop"),
    ];

    /// Wraps a raw effect number.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Effect number as sent on the wire.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Display name for the known effects.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(effect, _)| effect == self)
            .map(|(_, name)| *name)
    }

    /// All named effects, in wire order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::NAMED.into_iter().map(|(effect, _)| effect)
    }

    /// Effect for a reported `LEDUser` value; `None` outside `u8`.
    #[must_use]
    pub fn from_reported(value: i64) -> Option<Self> {
        u8::try_from(value).ok().map(Self)
    }
}

impl fmt::Display for LedEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Effect{}", self.0),
        }
    }
}

impl FromStr for LedEffect {
    type Err = ValueError;

    /// Accepts a display name (case-insensitive, `off` for `LED_off`) or a
    /// number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Ok(Self(value));
        }
        if s.eq_ignore_ascii_case("off") {
            return Ok(Self::OFF);
        }
        Self::NAMED
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(effect, _)| *effect)
            .ok_or_else(|| ValueError::InvalidLedEffect(s.to_string()))
    }
}

/// A complete LED command: effect, brightness, color temperature and color.
///
/// The brightness is clamped to [`MIN_BRIGHTNESS`]..=[`MAX_BRIGHTNESS`] when
/// formatted; the color is sent unchanged, so callers are expected to pass an
/// already scaled color (see [`firmware_scale`]).
///
/// # Examples
///
/// ```
/// use avalon_lib::types::{LedEffect, LedSetting, RgbColor};
///
/// let setting = LedSetting::new(LedEffect::STAY, 0, 50, RgbColor::new(255, 0, 0));
/// assert_eq!(setting.to_parameter(), "1-5-50-255-0-0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedSetting {
    /// Effect number.
    pub effect: LedEffect,
    /// Brightness percentage.
    pub brightness: u8,
    /// Color temperature.
    pub color_temp: u16,
    /// Color as stored by the firmware.
    pub color: RgbColor,
}

impl LedSetting {
    /// Creates a setting.
    #[must_use]
    pub const fn new(effect: LedEffect, brightness: u8, color_temp: u16, color: RgbColor) -> Self {
        Self {
            effect,
            brightness,
            color_temp,
            color,
        }
    }

    /// The setting that switches the LED off.
    #[must_use]
    pub const fn off() -> Self {
        Self::new(LedEffect::OFF, MIN_BRIGHTNESS, DEFAULT_COLOR_TEMP, RgbColor::BLACK)
    }

    /// Steady color from a [`firmware_scale`] result.
    #[must_use]
    pub const fn stay(scaled: FirmwareColor) -> Self {
        Self::new(LedEffect::STAY, scaled.percent, DEFAULT_COLOR_TEMP, scaled.color)
    }

    /// Brightness as sent: clamped to the firmware range.
    #[must_use]
    pub fn clamped_brightness(&self) -> u8 {
        self.brightness.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS)
    }

    /// `ledset` parameter: `effect-brightness-ct-r-g-b`.
    #[must_use]
    pub fn to_parameter(&self) -> String {
        let (r, g, b) = self.color.channels();
        format!(
            "{}-{}-{}-{r}-{g}-{b}",
            self.effect.value(),
            self.clamped_brightness(),
            self.color_temp
        )
    }
}

/// A color scaled the way the firmware stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FirmwareColor {
    /// Scaled color.
    pub color: RgbColor,
    /// Brightness percentage, at least [`MIN_BRIGHTNESS`].
    pub percent: u8,
}

/// Scales a full-brightness color to a firmware color.
///
/// `percent = max(5, round(brightness / 255 * 100))` and each channel is
/// `round(channel * percent / 100)`. If all three scaled channels are below
/// [`FIRMWARE_CHANNEL_FLOOR`], the largest one is raised to it (ties go to
/// red, then green). Halves round to even, as the firmware's own
/// integration does.
///
/// # Examples
///
/// ```
/// use avalon_lib::types::{RgbColor, firmware_scale};
///
/// let full = firmware_scale(RgbColor::WHITE, 255);
/// assert_eq!(full.percent, 100);
/// assert_eq!(full.color, RgbColor::WHITE);
///
/// let dim = firmware_scale(RgbColor::new(10, 10, 10), 13);
/// assert_eq!(dim.percent, 5);
/// assert_eq!(dim.color, RgbColor::new(13, 0, 0));
/// ```
#[must_use]
pub fn firmware_scale(base: RgbColor, brightness: u8) -> FirmwareColor {
    let percent = round_to_u8(f64::from(brightness) / 255.0 * 100.0).max(MIN_BRIGHTNESS);
    let scale = |channel: u8| round_to_u8(f64::from(channel) * f64::from(percent) / 100.0);

    let (mut r, mut g, mut b) = (scale(base.red()), scale(base.green()), scale(base.blue()));

    if r < FIRMWARE_CHANNEL_FLOOR && g < FIRMWARE_CHANNEL_FLOOR && b < FIRMWARE_CHANNEL_FLOOR {
        if r >= g && r >= b {
            r = FIRMWARE_CHANNEL_FLOOR;
        } else if g >= b {
            g = FIRMWARE_CHANNEL_FLOOR;
        } else {
            b = FIRMWARE_CHANNEL_FLOOR;
        }
    }

    FirmwareColor {
        color: RgbColor::new(r, g, b),
        percent,
    }
}

/// Approximates the full-brightness color behind a firmware color.
///
/// The firmware brightness `percent` is mapped to 0-255, each channel is
/// multiplied by `255 / max(1, that)` and clamped to 255. The floor applied
/// by [`firmware_scale`] cannot be undone, so this is lossy.
///
/// # Examples
///
/// ```
/// use avalon_lib::types::{RgbColor, reconstruct_base_color};
///
/// let base = reconstruct_base_color(50, RgbColor::new(64, 32, 0));
/// assert_eq!(base, RgbColor::new(128, 64, 0));
/// ```
#[must_use]
pub fn reconstruct_base_color(percent: u8, color: RgbColor) -> RgbColor {
    let device_brightness = (f64::from(percent) / 100.0 * 255.0)
        .round_ties_even()
        .max(1.0);
    let scale = 255.0 / device_brightness;
    let channel = |c: u8| round_to_u8((f64::from(c) * scale).min(255.0));

    RgbColor::new(
        channel(color.red()),
        channel(color.green()),
        channel(color.blue()),
    )
}

/// Rounds half to even and saturates into `u8`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u8(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
