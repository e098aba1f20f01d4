//! Segment ("Mosaic") code decoding.
//!
//! A code is one letter class A–M followed by a two-digit class number below
//! 50, e.g. `B07`. The letter/number pair maps onto a fixed income tier and a
//! fixed education tier; the table lives in [`IncomeTier::of`] and
//! [`EducationTier::of`].

use crate::error::FormatError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static SEGMENT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-M])(\d{2})$").expect("valid segment code pattern"));

/// Highest class number. Any two digits below 50 decode, `00` included.
pub const MAX_CLASS_NUMBER: u8 = 49;

/// A decoded segment code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentCode {
    pub letter: char,
    pub number: u8,
}

impl SegmentCode {
    /// Parse a raw token. Anything off-pattern, or numbered 50 and above, is a
    /// [`FormatError`].
    pub fn parse(raw: &str) -> Result<Self, FormatError> {
        let caps = SEGMENT_CODE
            .captures(raw)
            .ok_or_else(|| FormatError::Pattern(raw.to_string()))?;

        let letter = caps[1]
            .chars()
            .next()
            .ok_or_else(|| FormatError::Pattern(raw.to_string()))?;
        let number: u8 = caps[2]
            .parse()
            .map_err(|_| FormatError::Pattern(raw.to_string()))?;

        if number > MAX_CLASS_NUMBER {
            return Err(FormatError::NumberOutOfRange {
                code: raw.to_string(),
                number,
            });
        }

        Ok(Self { letter, number })
    }

    pub fn income(&self) -> IncomeTier {
        IncomeTier::of(self.letter, self.number)
    }

    pub fn education(&self) -> EducationTier {
        EducationTier::of(self.letter, self.number)
    }

    /// Indicator name for the letter class, e.g. `mos_letter_B`.
    pub fn letter_feature(&self) -> String {
        format!("mos_letter_{}", self.letter)
    }
}

impl fmt::Display for SegmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.letter, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeTier {
    High,
    Average,
    Low,
}

impl IncomeTier {
    /// First matching rule wins.
    pub fn of(letter: char, number: u8) -> Self {
        let high = matches!(letter, 'A' | 'D')
            || (letter == 'B' && (5..=8).contains(&number))
            || (letter == 'C' && matches!(number, 10 | 12 | 13))
            || (letter == 'E' && matches!(number, 17 | 18))
            || (letter == 'F' && number == 21);
        if high {
            return IncomeTier::High;
        }

        let average = (letter == 'B' && number == 9)
            || matches!(letter, 'G' | 'H')
            || (letter == 'C' && number == 11)
            || (letter == 'E' && matches!(number, 19 | 20));
        if average {
            return IncomeTier::Average;
        }

        IncomeTier::Low
    }

    pub fn feature_name(&self) -> &'static str {
        match self {
            IncomeTier::High => "high_income",
            IncomeTier::Average => "average_income",
            IncomeTier::Low => "low_income",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationTier {
    Good,
    Average,
    Poor,
}

impl EducationTier {
    pub fn of(letter: char, number: u8) -> Self {
        if matches!(letter, 'A' | 'B' | 'C' | 'I') || (letter == 'H' && number == 30) {
            EducationTier::Good
        } else if matches!(letter, 'D' | 'F') || (letter == 'H' && matches!(number, 31 | 32)) {
            EducationTier::Average
        } else {
            EducationTier::Poor
        }
    }

    pub fn feature_name(&self) -> &'static str {
        match self {
            EducationTier::Good => "good_education",
            EducationTier::Average => "average_education",
            EducationTier::Poor => "poor_education",
        }
    }
}
