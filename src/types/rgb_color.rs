// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 8-bit RGB color.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RGB color with 8-bit channels.
///
/// Used both for the perceptual (full brightness) color a user picks and for
/// the scaled color the miner firmware stores, see
/// [`firmware_scale`](super::firmware_scale).
///
/// # Examples
///
/// ```
/// use avalon_lib::types::RgbColor;
///
/// let amber = RgbColor::from_hex("#FFBF00").unwrap();
/// assert_eq!(amber, RgbColor::new(255, 191, 0));
/// assert_eq!(amber.to_string(), "#FFBF00");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Black, all channels off.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White, all channels full.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `RRGGBB` or `RGB`, with or without a leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidHexColor`] if the text is not 3 or 6 hex
    /// digits.
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || ValueError::InvalidHexColor(hex.to_string());

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // Each short digit doubles: "F80" is "FF8800".
            3 => Ok(Self::new(
                channel(&digits[0..1])? * 0x11,
                channel(&digits[1..2])? * 0x11,
                channel(&digits[2..3])? * 0x11,
            )),
            _ => Err(invalid()),
        }
    }

    /// Red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Channels as an `(r, g, b)` tuple.
    #[must_use]
    pub const fn channels(&self) -> (u8, u8, u8) {
        (self.red, self.green, self.blue)
    }

    /// Returns true if every channel is zero.
    #[must_use]
    pub const fn is_black(&self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }

    /// Hex form without the `#` prefix, upper case.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<RgbColor> for (u8, u8, u8) {
    fn from(color: RgbColor) -> Self {
        color.channels()
    }
}
