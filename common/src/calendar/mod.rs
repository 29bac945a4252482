//! Indonesian public-holiday calendar and the date features the forecasting
//! models are trained on.
//!
//! Fixed-date holidays and the Easter-derived Christian holidays are computed
//! for any year. Holidays that follow the lunar or lunisolar calendars (Imlek,
//! Nyepi, Waisak and the Islamic holidays) come from the embedded
//! `holidays_id.json` table, so only the years listed there know them. Dates
//! past the latest published government decree are astronomical projections
//! and can be corrected through an extra holidays file.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const EXTRA_HOLIDAY_NAME: &str = "Libur Tambahan";

#[derive(Debug, Error)]
#[error("invalid date '{input}': {reason}")]
pub struct DateError {
    pub input: String,
    #[source]
    pub reason: chrono::ParseError,
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> std::result::Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|reason| DateError {
        input: input.to_string(),
        reason,
    })
}

#[derive(Debug, Deserialize)]
struct HolidayEntry {
    date: NaiveDate,
    name: String,
}

#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    listed: HashMap<NaiveDate, String>,
    listed_years: BTreeSet<i32>,
}

impl HolidayCalendar {
    /// Built-in national calendar.
    pub fn indonesia() -> Result<Self> {
        let table = include_str!("holidays_id.json");
        let table: HashMap<i32, Vec<HolidayEntry>> =
            serde_json::from_str(table).context("embedded holiday table is malformed")?;

        let mut listed = HashMap::new();
        let mut listed_years = BTreeSet::new();
        for (year, entries) in table {
            listed_years.insert(year);
            for entry in entries {
                if entry.date.year() != year {
                    anyhow::bail!("holiday {} is filed under year {}", entry.date, year);
                }
                listed.insert(entry.date, entry.name);
            }
        }

        Ok(Self {
            listed,
            listed_years,
        })
    }

    /// Add operator-declared days off on top of the national calendar.
    pub fn with_extra<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        for date in dates {
            if national_holiday(date).is_some() {
                continue;
            }
            self.listed
                .entry(date)
                .or_insert_with(|| EXTRA_HOLIDAY_NAME.to_string());
        }
        self
    }

    /// Merge a JSON array of `YYYY-MM-DD` strings.
    pub fn extend_from_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read holiday file: {:?}", path.as_ref()))?;
        let dates: Vec<NaiveDate> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse holiday file: {:?}", path.as_ref()))?;
        debug!("Loaded {} extra holidays from {:?}", dates.len(), path.as_ref());
        Ok(self.with_extra(dates))
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        national_holiday(date).or_else(|| self.listed.get(&date).map(String::as_str))
    }

    /// Whether the lunar holidays of `year` are known.
    pub fn covers_year(&self, year: i32) -> bool {
        self.listed_years.contains(&year)
    }

    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.covers_year(date.year())
    }

    pub fn covered_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.listed_years.iter().copied()
    }

    /// Years from now through `ahead` years later whose lunar holidays are
    /// unknown.
    pub fn uncovered_upcoming(&self, ahead: i32) -> Vec<i32> {
        let year = current_year();
        (year..=year + ahead)
            .filter(|y| !self.covers_year(*y))
            .collect()
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}

fn national_holiday(date: NaiveDate) -> Option<&'static str> {
    fixed_holiday(date).or_else(|| easter_holiday(date))
}

fn fixed_holiday(date: NaiveDate) -> Option<&'static str> {
    let year = date.year();
    match (date.month(), date.day()) {
        (1, 1) => Some("Tahun Baru Masehi"),
        (5, 1) if year >= 2014 => Some("Hari Buruh Internasional"),
        (6, 1) if year >= 2017 => Some("Hari Lahir Pancasila"),
        (8, 17) if year >= 1945 => Some("Hari Kemerdekaan Republik Indonesia"),
        (12, 25) => Some("Hari Raya Natal"),
        _ => None,
    }
}

fn easter_holiday(date: NaiveDate) -> Option<&'static str> {
    let easter = easter_sunday(date.year())?;
    match (date - easter).num_days() {
        -2 => Some("Wafat Yesus Kristus"),
        0 => Some("Hari Paskah"),
        39 => Some("Kenaikan Yesus Kristus"),
        _ => None,
    }
}

/// Western Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    if year < 1583 {
        return None;
    }
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Calendar features of a single day.
///
/// `dayofweek` counts from Monday = 0, `dayofyear` from January 1st = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateFeatures {
    pub month: u32,
    pub dayofweek: u32,
    pub dayofyear: u32,
    pub is_workday: bool,
    pub is_holiday: bool,
}

impl DateFeatures {
    pub fn derive(date: NaiveDate, calendar: &HolidayCalendar) -> Self {
        let dayofweek = date.weekday().num_days_from_monday();
        let is_holiday = calendar.is_holiday(date);
        Self {
            month: date.month(),
            dayofweek,
            dayofyear: date.ordinal(),
            is_workday: dayofweek < 5 && !is_holiday,
            is_holiday,
        }
    }
}

/// Every day in `[start, end]`, used by the calendar tests and tooling.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let len = (end - start).num_days().max(-1) + 1;
    (0..len).map(move |offset| start + Duration::days(offset))
}
