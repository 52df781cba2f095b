//! Day-level data (a colored and/or annotated calendar day)

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{Datelike, NaiveDate};

/// The key of a day entry: a plain calendar date.
///
/// This is serialized as the ISO string `YYYY-MM-DD`, which is also the only shape
/// [`FromStr`] accepts. There is no further validation anywhere in the crate: a string
/// that parses as a date is a valid key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    content: NaiveDate,
}

impl DayKey {
    /// Build a key from calendar components. Returns `None` for dates that do not exist
    /// (for example February 30th)
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|content| Self { content })
    }

    pub fn as_date(&self) -> NaiveDate {
        self.content
    }

    pub fn year(&self) -> i32 {
        self.content.year()
    }

    /// The same month and day, re-anchored into another year.
    /// February 29th falls back to February 28th when `year` is not a leap year.
    pub fn with_year(&self, year: i32) -> Self {
        let month = self.content.month();
        let day = self.content.day();
        let content = NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, day - 1))
            .unwrap_or(self.content);
        Self { content }
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self { content: date }
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let content = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?;
        Ok(Self { content })
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content.format("%Y-%m-%d"))
    }
}

/// Used to support serde
impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D>(deserializer: D) -> Result<DayKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}


/// What a single day carries: an optional group color and an optional free-text note.
///
/// An entry with neither field set must not be stored: the mutation entry points of
/// [`YearDocument`](crate::document::YearDocument) delete such entries instead of keeping
/// empty records around.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl DayEntry {
    pub fn new(color: Option<String>, note: Option<String>) -> Self {
        Self { color, note }
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.note = note;
    }

    /// Whether this entry carries no data at all (and thus must not be stored)
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.note.is_none()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_round_trip() {
        let key: DayKey = "2024-01-02".parse().unwrap();
        assert_eq!(key, DayKey::new(2024, 1, 2).unwrap());
        assert_eq!(key.to_string(), "2024-01-02");
    }

    #[test]
    fn rejects_garbage() {
        assert!("abc".parse::<DayKey>().is_err());
        assert!("2024-13-01".parse::<DayKey>().is_err());
        assert!("2024-02-30".parse::<DayKey>().is_err());
    }

    #[test]
    fn reanchoring_handles_leap_days() {
        let key = DayKey::new(2024, 2, 29).unwrap();
        assert_eq!(key.with_year(2023), DayKey::new(2023, 2, 28).unwrap());
        assert_eq!(key.with_year(2028), DayKey::new(2028, 2, 29).unwrap());

        let key = DayKey::new(2024, 7, 14).unwrap();
        assert_eq!(key.with_year(1990), DayKey::new(1990, 7, 14).unwrap());
    }

    #[test]
    fn serde_as_map_key() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(DayKey::new(2024, 3, 1).unwrap(), DayEntry::new(Some("#FFB3BA".into()), None));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"2024-03-01":{"color":"#FFB3BA"}}"##);
        let back: BTreeMap<DayKey, DayEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
