use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Error returned when a quantity such as `"2ms"` or `"10Mbps"` cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseUnitError {
    #[error("empty value")]
    Empty,
    #[error("'{0}' has no unit suffix")]
    MissingUnit(String),
    #[error("'{0}' does not start with a non-negative number")]
    InvalidNumber(String),
    #[error("unknown unit '{unit}' in '{input}'")]
    UnknownUnit { unit: String, input: String },
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// Split `"10 Mbps"` into `("10", "Mbps")`.
fn split_quantity(input: &str) -> Result<(&str, &str), ParseUnitError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseUnitError::Empty);
    }
    let split = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| ParseUnitError::MissingUnit(input.to_string()))?;
    let (number, unit) = input.split_at(split);
    if number.is_empty() {
        return Err(ParseUnitError::InvalidNumber(input.to_string()));
    }
    Ok((number, unit.trim()))
}

/// Exact decimal `number * scale`, where `scale` is a power of ten. Digits
/// below the base unit are rejected rather than rounded.
fn scaled(number: &str, scale: u64, input: &str) -> Result<u64, ParseUnitError> {
    let invalid = || ParseUnitError::InvalidNumber(input.to_string());
    let out_of_range = || ParseUnitError::OutOfRange(input.to_string());

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
        return Err(invalid());
    }
    let fraction = fraction.trim_end_matches('0');
    let places = scale.ilog10() as usize;
    if fraction.len() > places {
        return Err(invalid());
    }

    // only digits remain, so a failed parse means overflow
    let whole: u64 = match whole {
        "" => 0,
        digits => digits.parse().map_err(|_| out_of_range())?,
    };
    let fraction: u64 = match fraction {
        "" => 0,
        digits => {
            let value: u64 = digits.parse().map_err(|_| invalid())?;
            value * 10u64.pow((places - digits.len()) as u32)
        }
    };
    whole
        .checked_mul(scale)
        .and_then(|v| v.checked_add(fraction))
        .ok_or_else(out_of_range)
}

/// Simulated time with nanosecond resolution.
///
/// Serialized as a human-readable string (`"2ms"`, `"10us"`) so that config
/// files and exported plans read the same way the scenario is described.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct SimTime(u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    pub const fn from_micros(micros: u64) -> Self {
        SimTime(micros * NANOS_PER_MICRO)
    }

    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * NANOS_PER_MILLI)
    }

    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * NANOS_PER_SEC)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: SimTime) -> Option<SimTime> {
        self.0.checked_add(other.0).map(SimTime)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = self.0;
        if ns == 0 {
            write!(f, "0s")
        } else if ns % NANOS_PER_SEC == 0 {
            write!(f, "{}s", ns / NANOS_PER_SEC)
        } else if ns % NANOS_PER_MILLI == 0 {
            write!(f, "{}ms", ns / NANOS_PER_MILLI)
        } else if ns % NANOS_PER_MICRO == 0 {
            write!(f, "{}us", ns / NANOS_PER_MICRO)
        } else {
            write!(f, "{}ns", ns)
        }
    }
}

impl FromStr for SimTime {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, unit) = split_quantity(s)?;
        let scale = match unit {
            "s" => NANOS_PER_SEC,
            "ms" => NANOS_PER_MILLI,
            "us" | "µs" => NANOS_PER_MICRO,
            "ns" => 1,
            other => {
                return Err(ParseUnitError::UnknownUnit {
                    unit: other.to_string(),
                    input: s.to_string(),
                });
            }
        };
        scaled(number, scale, s).map(SimTime)
    }
}

impl From<SimTime> for String {
    fn from(time: SimTime) -> String {
        time.to_string()
    }
}

impl TryFrom<String> for SimTime {
    type Error = ParseUnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Link data rate in bits per second.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct DataRate(u64);

impl DataRate {
    pub const fn from_bps(bps: u64) -> Self {
        DataRate(bps)
    }

    pub const fn from_kbps(kbps: u64) -> Self {
        DataRate(kbps * 1_000)
    }

    pub const fn from_mbps(mbps: u64) -> Self {
        DataRate(mbps * 1_000_000)
    }

    pub const fn bps(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bps = self.0;
        if bps != 0 && bps % 1_000_000_000 == 0 {
            write!(f, "{}Gbps", bps / 1_000_000_000)
        } else if bps != 0 && bps % 1_000_000 == 0 {
            write!(f, "{}Mbps", bps / 1_000_000)
        } else if bps != 0 && bps % 1_000 == 0 {
            write!(f, "{}Kbps", bps / 1_000)
        } else {
            write!(f, "{}bps", bps)
        }
    }
}

impl FromStr for DataRate {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (number, unit) = split_quantity(s)?;
        let scale = match unit {
            "bps" | "b/s" => 1,
            "Kbps" | "kbps" | "Kb/s" | "kb/s" => 1_000,
            "Mbps" | "mbps" | "Mb/s" => 1_000_000,
            "Gbps" | "gbps" | "Gb/s" => 1_000_000_000,
            other => {
                return Err(ParseUnitError::UnknownUnit {
                    unit: other.to_string(),
                    input: s.to_string(),
                });
            }
        };
        scaled(number, scale, s).map(DataRate)
    }
}

impl From<DataRate> for String {
    fn from(rate: DataRate) -> String {
        rate.to_string()
    }
}

impl TryFrom<String> for DataRate {
    type Error = ParseUnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
