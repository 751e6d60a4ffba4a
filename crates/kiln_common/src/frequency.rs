//! Clock frequencies stored as whole Hertz.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nanoseconds in one second.
const NS_PER_S: f64 = 1_000_000_000.0;

/// A clock frequency in whole Hertz.
///
/// Device clocks are always integral, so unlike a measured frequency this
/// never carries a fractional part. Parses strings like `"300MHz"`,
/// `"1.5GHz"`, `"100 kHz"` or a bare number of Hertz.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(u64);

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from a value in megahertz.
    pub const fn from_mhz(mhz: u64) -> Self {
        Self(mhz * 1_000_000)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> u64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Returns `true` for a zero frequency, which no real clock has.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the length of one clock cycle in nanoseconds.
    ///
    /// Returns infinity for a zero frequency.
    pub fn period_ns(&self) -> f64 {
        NS_PER_S / self.0 as f64
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000 && hz % 1_000_000 == 0 {
            write!(f, "{}GHz", hz as f64 / 1_000_000_000.0)
        } else if hz >= 1_000_000 && hz % 1_000 == 0 {
            write!(f, "{}MHz", hz as f64 / 1_000_000.0)
        } else if hz >= 1_000 {
            write!(f, "{}kHz", hz as f64 / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (number, scale) = [
            ("ghz", 1_000_000_000.0),
            ("mhz", 1_000_000.0),
            ("khz", 1_000.0),
            ("hz", 1.0),
        ]
        .iter()
        .find_map(|(suffix, scale)| lower.strip_suffix(suffix).map(|n| (n.trim(), *scale)))
        .unwrap_or((lower.as_str(), 1.0));

        let value: f64 = number.parse().map_err(|_| err())?;
        let hz = (value * scale).round();
        if !hz.is_finite() || hz < 0.0 || hz > u64::MAX as f64 {
            return Err(err());
        }
        Ok(Frequency(hz as u64))
    }
}
