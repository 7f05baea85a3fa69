use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGISTRATION_PREFIX: &str = "AR25";
const SERIAL_RANGE: RangeInclusive<u16> = 1000..=9999;
const DATE_FORMAT: &str = "%Y%m%d";

/// Human-readable registration number, `PREFIX-YYYYMMDD-NNNN`.
///
/// Codes are not unique by construction; the store enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegistrationCode {
    raw: String,
    date: NaiveDate,
    serial: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a registration number of the form PREFIX-YYYYMMDD-NNNN")]
pub struct InvalidRegistrationCode(pub String);

impl RegistrationCode {
    /// Draws a code for `date` with a serial uniform in 1000..=9999.
    pub fn generate<R: Rng>(prefix: &str, date: NaiveDate, rng: &mut R) -> Self {
        let serial = rng.gen_range(SERIAL_RANGE);
        Self {
            raw: format!("{prefix}-{}-{serial}", date.format(DATE_FORMAT)),
            date,
            serial,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidRegistrationCode> {
        let invalid = || InvalidRegistrationCode(raw.to_string());
        let trimmed = raw.trim();

        let mut parts = trimmed.split('-');
        let (Some(prefix), Some(date), Some(serial), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if prefix.is_empty() || !prefix.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        if date.len() != 8 || !date.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())?;
        let serial = serial
            .parse::<u16>()
            .ok()
            .filter(|value| SERIAL_RANGE.contains(value) && serial.len() == 4)
            .ok_or_else(invalid)?;

        Ok(Self {
            raw: trimmed.to_string(),
            date,
            serial,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn prefix(&self) -> &str {
        self.raw.split('-').next().unwrap_or_default()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn serial(&self) -> u16 {
        self.serial
    }
}

impl fmt::Display for RegistrationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for RegistrationCode {
    type Err = InvalidRegistrationCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl TryFrom<String> for RegistrationCode {
    type Error = InvalidRegistrationCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RegistrationCode> for String {
    fn from(code: RegistrationCode) -> Self {
        code.raw
    }
}
