//! National Identity Card numbers.
//!
//! Two formats are in circulation:
//!
//! - old: `YYDDDSSSSV` (9 digits and a `V` or `X`), year 19YY
//! - new: `YYYYDDDSSSSC` (12 digits)
//!
//! `DDD` is the day of the year of birth, offset by 500 for women. The
//! day count treats every February as having 29 days.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

static NIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{9}[VvXx]|[0-9]{12})$").expect("NIC pattern is valid"));

/// Offset added to the day number for female holders
const FEMALE_DAY_OFFSET: u32 = 500;

/// Month lengths used by the NIC day count
const NIC_MONTH_DAYS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s {
            "male" => Gender::Male,
            _ => Gender::Female,
        }
    }
}

/// A validated NIC with the details encoded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nic {
    number: String,
    gender: Gender,
    date_of_birth: NaiveDate,
}

impl Nic {
    /// Parse and validate a NIC number.
    ///
    /// Errors are reported against the `nic` request field.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if !NIC_PATTERN.is_match(trimmed) {
            return Err(AppError::field(
                "nic",
                "NIC must be 9 digits followed by V/X, or 12 digits",
            ));
        }

        let number = trimmed.to_ascii_uppercase();
        let (year, day_code) = if number.len() == 10 {
            (1900 + digits(&number[0..2]), digits(&number[2..5]))
        } else {
            (digits(&number[0..4]), digits(&number[4..7]))
        };

        let (gender, day_of_year) = if day_code > FEMALE_DAY_OFFSET {
            (Gender::Female, day_code - FEMALE_DAY_OFFSET)
        } else {
            (Gender::Male, day_code)
        };

        let date_of_birth = birth_date(year as i32, day_of_year)
            .ok_or_else(|| AppError::field("nic", "NIC encodes an invalid date of birth"))?;

        Ok(Self {
            number,
            gender,
            date_of_birth,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.number
    }

    pub fn into_string(self) -> String {
        self.number
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }
}

impl std::fmt::Display for Nic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.number)
    }
}

// Input is pre-checked by NIC_PATTERN.
fn digits(s: &str) -> u32 {
    s.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn birth_date(year: i32, day_of_year: u32) -> Option<NaiveDate> {
    if day_of_year == 0 {
        return None;
    }

    let mut remaining = day_of_year;
    for (index, days) in NIC_MONTH_DAYS.iter().enumerate() {
        if remaining <= *days {
            return NaiveDate::from_ymd_opt(year, index as u32 + 1, remaining);
        }
        remaining -= days;
    }
    None
}
