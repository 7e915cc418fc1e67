use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A publication date in the numeric `YYYYMMDD` form used by archive records.
///
/// Ordering is chronological because the digits are most-significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PubDate(u32);

impl PubDate {
    /// Builds a date from its numeric form, rejecting values that are not a
    /// real calendar day.
    pub fn from_numeric(value: u32) -> Option<Self> {
        let date = Self(value);
        date.to_naive_date().map(|_| date)
    }

    pub const fn numeric(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        let year = (self.0 / 10_000) as i32;
        let month = (self.0 / 100) % 100;
        let day = self.0 % 100;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

impl From<NaiveDate> for PubDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.year() as u32 * 10_000 + date.month() * 100 + date.day())
    }
}

impl TryFrom<u32> for PubDate {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_numeric(value).ok_or_else(|| format!("{value} is not a calendar date"))
    }
}

impl From<PubDate> for u32 {
    fn from(date: PubDate) -> Self {
        date.0
    }
}

impl FromStr for PubDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 8 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("expected YYYYMMDD, got '{s}'"));
        }
        let value: u32 = trimmed
            .parse()
            .map_err(|e| format!("invalid numeric date '{s}': {e}"))?;
        Self::from_numeric(value).ok_or_else(|| format!("'{s}' is not a calendar date"))
    }
}

impl fmt::Display for PubDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let date: PubDate = "20111231".parse().unwrap();
        assert_eq!(date.numeric(), 20111231);
        assert_eq!(
            date.to_naive_date(),
            NaiveDate::from_ymd_opt(2011, 12, 31)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<PubDate>().is_err());
        assert!("2011-12-31".parse::<PubDate>().is_err());
        assert!("2011123".parse::<PubDate>().is_err());
        assert!("abcdefgh".parse::<PubDate>().is_err());
        assert!("20111332".parse::<PubDate>().is_err());
        assert!("20110230".parse::<PubDate>().is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a: PubDate = "20111231".parse().unwrap();
        let b: PubDate = "20120101".parse().unwrap();
        let c: PubDate = "20120615".parse().unwrap();
        assert!(a < b && b < c);
        assert_eq!([b, c, a].iter().min(), Some(&a));
    }

    #[test]
    fn test_from_naive_date() {
        let date = NaiveDate::from_ymd_opt(1925, 3, 7).unwrap();
        assert_eq!(PubDate::from(date).to_string(), "19250307");
    }

    #[test]
    fn test_serde_validates_calendar() {
        let date: PubDate = serde_json::from_str("20120229").unwrap();
        assert_eq!(date.numeric(), 20120229);
        assert_eq!(serde_json::to_string(&date).unwrap(), "20120229");

        assert!(serde_json::from_str::<PubDate>("20110229").is_err());
        assert!(serde_json::from_str::<PubDate>("99999999").is_err());
        assert!(PubDate::try_from(20111301).is_err());
    }
}
