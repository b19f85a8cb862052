//! Leading-date extraction for file names.
//!
//! Many archived documents are named `YYYYMMDD<something>.pdf`. This module
//! recognizes such a prefix at year, month or day precision. It validates the
//! field ranges only; `20230231` is accepted even though February has no 31st.
//!
//! # Examples
//!
//! ```
//! use renfiles::date::{DatePrecision, extract_leading_date};
//!
//! let date = extract_leading_date("20230115abstract_paper.pdf").unwrap();
//! assert_eq!(date.raw(), "20230115");
//! assert_eq!(date.precision(), DatePrecision::YearMonthDay);
//!
//! // month 13 is invalid, so only the year survives
//! let date = extract_leading_date("202313xx").unwrap();
//! assert_eq!(date.raw(), "2023");
//!
//! assert!(extract_leading_date("notes.pdf").is_none());
//! ```

use std::fmt;

const YEAR_RANGE: (u32, u32) = (1, 2999);
const MONTH_RANGE: (u32, u32) = (1, 12);
const DAY_RANGE: (u32, u32) = (1, 31);

/// How much of a leading date could be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePrecision {
    /// `YYYY`
    Year,
    /// `YYYYMM`
    YearMonth,
    /// `YYYYMMDD`
    YearMonthDay,
}

impl DatePrecision {
    /// Number of characters the prefix occupies at this precision.
    pub fn width(&self) -> usize {
        match self {
            DatePrecision::Year => 4,
            DatePrecision::YearMonth => 6,
            DatePrecision::YearMonthDay => 8,
        }
    }
}

/// A validated numeric date prefix.
///
/// `raw` always holds exactly 4, 6 or 8 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadingDate {
    raw: String,
    precision: DatePrecision,
}

impl LeadingDate {
    /// The digits of the prefix, e.g. `"202301"`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn precision(&self) -> DatePrecision {
        self.precision
    }

    /// Length of the prefix in characters (4, 6 or 8).
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Always false for a parsed date.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The four-digit year as written in the name, e.g. `"2023"`.
    pub fn year(&self) -> &str {
        &self.raw[..4]
    }

    pub fn month(&self) -> Option<&str> {
        (self.precision >= DatePrecision::YearMonth).then(|| &self.raw[4..6])
    }

    pub fn day(&self) -> Option<&str> {
        (self.precision == DatePrecision::YearMonthDay).then(|| &self.raw[6..8])
    }
}

impl fmt::Display for LeadingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parses the longest valid date prefix of `name`.
///
/// Returns `None` when the first four characters are not a year in
/// `[1, 2999]`. Month and day fields that fail to parse or fall outside their
/// range (including `00`) silently truncate the precision.
pub fn extract_leading_date(name: &str) -> Option<LeadingDate> {
    let chars: Vec<char> = name.chars().take(8).collect();

    if !field_in_range(&chars, 0, 4, YEAR_RANGE) {
        return None;
    }
    let mut precision = DatePrecision::Year;

    if field_in_range(&chars, 4, 6, MONTH_RANGE) {
        precision = DatePrecision::YearMonth;
        if field_in_range(&chars, 6, 8, DAY_RANGE) {
            precision = DatePrecision::YearMonthDay;
        }
    }

    // every accepted field is ASCII digits, so char and byte offsets agree
    let raw: String = chars[..precision.width()].iter().collect();
    Some(LeadingDate { raw, precision })
}

/// Checks that `chars[start..end]` exists, is all ASCII digits and its value
/// lies within `range` (inclusive).
fn field_in_range(chars: &[char], start: usize, end: usize, range: (u32, u32)) -> bool {
    let Some(field) = chars.get(start..end) else {
        return false;
    };
    if !field.iter().all(char::is_ascii_digit) {
        return false;
    }
    let value = field
        .iter()
        .fold(0u32, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0));
    (range.0..=range.1).contains(&value)
}
