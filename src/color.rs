// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Frequency heat-map for class label buttons.
//!
//! Rare classes render green, common classes render red. The growth factor stretches the
//! frequency axis so datasets with flat class distributions still get visible contrast.

use std::fmt;

/// Scaled value at which the mapping switches from the red band to the green band.
const SEAM: f64 = 99.0;

/// A 24-bit color with a zero blue channel in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the channels as `0xRRGGBB`.
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn from_packed(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.packed())
    }
}

/// Maps a class's corpus frequency (in percent) to its button color.
///
/// `scaled = 100 - frequency_percent * growth_factor`. Below [`SEAM`] the red channel is
/// saturated and green ramps up with `scaled`; from the seam upwards green is saturated and red
/// falls to zero at `scaled == 100`. Both bands meet at `(255, 255, 0)`.
///
/// The published upper-band red, `25500 / 99 - 255 / 99 * scaled`, drops from 255 to about 3
/// at the seam. Red here is rescaled to `255 * (100 - scaled)` so the bands stay continuous.
pub fn color_for(frequency_percent: f64, growth_factor: f64) -> Rgb {
    let scaled = 100.0 - frequency_percent * growth_factor;
    if !scaled.is_finite() {
        return Rgb::new(255, 0, 0);
    }

    if scaled < SEAM {
        Rgb::new(255, channel(255.0 / SEAM * scaled), 0)
    } else {
        Rgb::new(channel(255.0 * (100.0 - scaled)), 255, 0)
    }
}

/// Rounds half-up and clamps into a channel.
fn channel(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 255.0) as u8
}
