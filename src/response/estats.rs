// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extended status (`estats`) decoding.
//!
//! After the usual `STATUS` segment the miner packs its telemetry into a flat
//! run of `KEY[value]` tokens:
//!
//! ```text
//! STATUS=S,...|STATS=0,ID=AVA100,MM ID0=Ver[Nano3s-25021401] ITemp[25.4] OTemp[38] Fan1[2040] FanR[45%] PS[0 1205 1202 21 0 1203 126] LED[1] LEDUser[1-100-50-255-0-0] WORKMODE[2]
//! ```
//!
//! Each identifier has its own value shape, so each gets its own decoding
//! rule. A value that does not decode is kept as `None` or as a raw fallback,
//! never dropped and never an error.

use std::num::ParseIntError;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::{LedEffect, LedSetting, RgbColor, WorkMode, reconstruct_base_color};

/// Identifier followed by a bracketed value.
static BRACKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\[([^\]]*)\]").expect("constant regex pattern is valid"));

/// Identifiers decoded as temperatures (degrees Celsius).
pub const TEMPERATURE_KEYS: [&str; 7] = [
    "ITemp", "OTemp", "TMax", "TAvg", "TarT", "MTmax", "MTavg",
];

/// Decoded `estats` reply.
///
/// The shape is fixed: every map exists even when the miner did not report
/// anything for it.
///
/// # Examples
///
/// ```
/// use avalon_lib::response::{decode_extended, PowerSupply};
///
/// let estats = decode_extended("STATUS=S|ITemp[25.4] Fan1[50%] PS[1 2 3 4 5 6 7] LED[1]");
///
/// assert_eq!(estats.temperatures["ITemp"], Some(25.4));
/// assert_eq!(estats.fans["Fan1"], Some(50));
/// assert_eq!(estats.led.led, Some(1));
/// match estats.power_supply {
///     Some(PowerSupply::Reading(ps)) => assert_eq!(ps.power, 7),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtendedStatus {
    /// Temperature readings; `None` when the value did not parse.
    pub temperatures: IndexMap<String, Option<f64>>,
    /// Fan readings (`Fan1` in RPM, `FanR` in percent).
    pub fans: IndexMap<String, Option<i64>>,
    /// Power supply telemetry from `PS[...]`.
    pub power_supply: Option<PowerSupply>,
    /// LED state from `LED[...]` and `LEDUser[...]`.
    pub led: LedStatus,
    /// Every other identifier, verbatim.
    pub misc: IndexMap<String, String>,
    /// Work mode level from `WORKMODE[...]`.
    pub work_mode: Option<i64>,
}

impl ExtendedStatus {
    /// Returns true if nothing was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
            && self.fans.is_empty()
            && self.power_supply.is_none()
            && self.led.led.is_none()
            && self.led.user.is_none()
            && self.misc.is_empty()
            && self.work_mode.is_none()
    }

    /// Returns a temperature reading.
    #[must_use]
    pub fn temperature(&self, key: &str) -> Option<f64> {
        self.temperatures.get(key).copied().flatten()
    }

    /// Returns a fan reading.
    #[must_use]
    pub fn fan(&self, key: &str) -> Option<i64> {
        self.fans.get(key).copied().flatten()
    }

    /// Returns the reported work mode, if it is a known level.
    #[must_use]
    pub fn selected_work_mode(&self) -> Option<WorkMode> {
        self.work_mode.and_then(|level| WorkMode::try_from(level).ok())
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            k if TEMPERATURE_KEYS.contains(&k) => {
                self.temperatures.insert(k.to_string(), value.parse().ok());
            }
            k if k.starts_with("Fan") => {
                self.fans.insert(k.to_string(), parse_fan(value));
            }
            "PS" => self.power_supply = Some(PowerSupply::parse(value)),
            "LED" => self.led.led = value.parse().ok(),
            "LEDUser" => self.led.user = Some(LedUser::parse(value)),
            "WORKMODE" => self.work_mode = value.parse().ok(),
            k => {
                self.misc.insert(k.to_string(), value.to_string());
            }
        }
    }
}

fn parse_fan(value: &str) -> Option<i64> {
    if value.is_empty() {
        return None;
    }
    value.replace('%', "").trim().parse().ok()
}

/// Decodes an `estats` reply.
///
/// Returns an empty [`ExtendedStatus`] if the text has no `|` delimiter.
/// Only the text after the first `|` is scanned.
#[must_use]
pub fn decode_extended(text: &str) -> ExtendedStatus {
    let mut status = ExtendedStatus::default();
    let Some((_, payload)) = text.split_once('|') else {
        return status;
    };

    for captures in BRACKET_PATTERN.captures_iter(payload.trim()) {
        status.apply(&captures[1], captures[2].trim());
    }

    status
}

/// Power supply telemetry from `PS[status cv hv ping reserved current power]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerSupply {
    /// All seven fields decoded.
    Reading(PowerSupplyReading),
    /// Fewer than seven space separated fields.
    TooFewFields {
        /// The bracket value.
        raw: String,
    },
    /// Seven or more fields, but not all integers.
    ParseError {
        /// The bracket value.
        raw: String,
    },
}

/// Decoded power supply fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerSupplyReading {
    /// Supply status code.
    pub status: i64,
    /// Control board voltage.
    pub control_voltage: i64,
    /// Hashboard voltage in millivolts.
    pub hashboard_voltage: i64,
    /// Supply ping.
    pub ping: i64,
    /// Unused by current firmware.
    pub reserved: i64,
    /// Output current.
    pub current_output: i64,
    /// Power draw in watts.
    pub power: i64,
}

impl PowerSupply {
    fn parse(value: &str) -> Self {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() < 7 {
            return Self::TooFewFields {
                raw: value.to_string(),
            };
        }

        let fields: Result<Vec<i64>, ParseIntError> =
            parts[..7].iter().map(|p| p.parse()).collect();
        match fields.as_deref() {
            Ok(&[
                status,
                control_voltage,
                hashboard_voltage,
                ping,
                reserved,
                current_output,
                power,
            ]) => Self::Reading(PowerSupplyReading {
                status,
                control_voltage,
                hashboard_voltage,
                ping,
                reserved,
                current_output,
                power,
            }),
            _ => Self::ParseError {
                raw: value.to_string(),
            },
        }
    }

    /// Returns the decoded reading, if any.
    #[must_use]
    pub fn reading(&self) -> Option<&PowerSupplyReading> {
        match self {
            Self::Reading(reading) => Some(reading),
            _ => None,
        }
    }
}

impl Serialize for PowerSupply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Reading(reading) => reading.serialize(serializer),
            Self::TooFewFields { raw } => {
                serialize_fallback(serializer, raw, "too_few_fields", &true)
            }
            Self::ParseError { raw } => serialize_fallback(serializer, raw, "parse_error", &true),
        }
    }
}

/// LED state reported by `estats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedStatus {
    /// `LED[...]` value; `None` when absent or not an integer.
    #[serde(rename = "LED")]
    pub led: Option<i64>,
    /// `LEDUser[...]` value.
    #[serde(rename = "LEDUser")]
    pub user: Option<LedUser>,
}

impl LedStatus {
    /// Returns the decoded user LED setting, if any.
    #[must_use]
    pub fn user_setting(&self) -> Option<&LedUserSetting> {
        self.user.as_ref().and_then(LedUser::setting)
    }
}

/// User LED configuration from `LEDUser[effect-brightness-ct-r-g-b]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedUser {
    /// All six fields decoded.
    Setting(LedUserSetting),
    /// Fewer than six non-empty fields.
    Incomplete {
        /// The bracket value.
        raw: String,
    },
    /// A field was not an integer.
    Error {
        /// The bracket value.
        raw: String,
        /// Conversion error message.
        message: String,
    },
}

impl LedUser {
    fn parse(value: &str) -> Self {
        let parts: Vec<&str> = value
            .split('-')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() < 6 {
            return Self::Incomplete {
                raw: value.to_string(),
            };
        }

        let fields: Result<Vec<i64>, ParseIntError> =
            parts[..6].iter().map(|p| p.parse()).collect();
        match fields {
            Ok(f) => Self::Setting(LedUserSetting {
                effect: f[0],
                brightness: f[1],
                color_temp: f[2],
                r: f[3],
                g: f[4],
                b: f[5],
                raw: value.to_string(),
            }),
            Err(err) => Self::Error {
                raw: value.to_string(),
                message: err.to_string(),
            },
        }
    }

    /// Returns the decoded setting, if any.
    #[must_use]
    pub fn setting(&self) -> Option<&LedUserSetting> {
        match self {
            Self::Setting(setting) => Some(setting),
            _ => None,
        }
    }
}

impl Serialize for LedUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Setting(setting) => setting.serialize(serializer),
            Self::Incomplete { raw } => serialize_fallback(serializer, raw, "incomplete", &true),
            Self::Error { raw, message } => serialize_fallback(serializer, raw, "error", message),
        }
    }
}

/// Decoded `LEDUser` fields, as reported by the firmware.
///
/// `r`, `g` and `b` are already scaled by `brightness`; use
/// [`base_color`](Self::base_color) to recover the color a user picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedUserSetting {
    /// Effect number (0 = off, 1 = stay, ...).
    pub effect: i64,
    /// Brightness percent.
    pub brightness: i64,
    /// Color temperature.
    pub color_temp: i64,
    /// Red channel.
    #[serde(rename = "R")]
    pub r: i64,
    /// Green channel.
    #[serde(rename = "G")]
    pub g: i64,
    /// Blue channel.
    #[serde(rename = "B")]
    pub b: i64,
    /// The bracket value.
    pub raw: String,
}

impl LedUserSetting {
    /// Returns true unless the effect is "off".
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.effect != 0
    }

    /// Returns the effect, if it fits the wire range.
    #[must_use]
    pub fn led_effect(&self) -> Option<LedEffect> {
        LedEffect::from_reported(self.effect)
    }

    /// Builds a setting that keeps this brightness, color temperature and
    /// color but switches to `effect`.
    #[must_use]
    pub fn with_effect(&self, effect: LedEffect) -> LedSetting {
        LedSetting::new(
            effect,
            clamp_u8(self.brightness),
            u16::try_from(self.color_temp.clamp(0, i64::from(u16::MAX))).unwrap_or(u16::MAX),
            self.color(),
        )
    }

    /// Returns the reported color, channels clamped to 0-255.
    #[must_use]
    pub fn color(&self) -> RgbColor {
        RgbColor::new(clamp_u8(self.r), clamp_u8(self.g), clamp_u8(self.b))
    }

    /// Returns the brightness on a 0-255 scale.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn perceptual_brightness(&self) -> u8 {
        let percent = self.brightness.clamp(0, 100) as f64;
        (percent / 100.0 * 255.0).round_ties_even() as u8
    }

    /// Approximates the unscaled color from the reported one.
    ///
    /// Returns `None` when brightness is zero, as nothing can be recovered.
    #[must_use]
    pub fn base_color(&self) -> Option<RgbColor> {
        if self.brightness <= 0 {
            return None;
        }
        Some(reconstruct_base_color(
            clamp_u8(self.brightness.min(100)),
            self.color(),
        ))
    }
}

fn clamp_u8(value: i64) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}

fn serialize_fallback<S, V>(
    serializer: S,
    raw: &str,
    flag: &'static str,
    value: &V,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize + ?Sized,
{
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("raw", raw)?;
    map.serialize_entry(flag, value)?;
    map.end()
}
