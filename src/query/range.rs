use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;
use serde::Serialize;

use crate::date_util::{last_day_of_month, parse_iso_date, quarter_of};
use crate::error::{Error, Result};
use crate::records::{DerivedShift, RatingRecord};

static RE_HALF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-H([12])$").unwrap());
static RE_QUARTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-Q([1-4])$").unwrap());
static RE_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-W(\d{1,2})$").unwrap());
static RE_MONTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").unwrap());

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::RangeParse(format!("{end} is before {start}")));
        }
        Ok(Self { start, end })
    }

    /// Both endpoints are included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The smallest range spanning every shift and rating date.
    pub fn covering(shifts: &[DerivedShift], ratings: &[RatingRecord]) -> Option<Self> {
        let dates = shifts
            .iter()
            .map(|s| s.record.date)
            .chain(ratings.iter().map(|r| r.date));
        let (mut lo, mut hi): (Option<NaiveDate>, Option<NaiveDate>) = (None, None);
        for d in dates {
            lo = Some(lo.map_or(d, |v| v.min(d)));
            hi = Some(hi.map_or(d, |v| v.max(d)));
        }
        Some(Self {
            start: lo?,
            end: hi?,
        })
    }

    /// Parse a range expression relative to `today`.
    ///
    /// Supported formats:
    /// - `2025-01-01..2025-03-31`: explicit bounds
    /// - `2025`: year
    /// - `2025-H1`: half
    /// - `2025-Q1`: quarter
    /// - `2025-01`: month
    /// - `2025-W05`: ISO week
    /// - `30d`: rolling last N days, ending today
    /// - `ytd`, `qtd`, `mtd`: to date
    pub fn parse(s: &str, today: NaiveDate) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::RangeParse(format!("unrecognized range: {s}"));

        if let Some((from, to)) = s.split_once("..") {
            let start = parse_iso_date(from).ok_or_else(invalid)?;
            let end = parse_iso_date(to).ok_or_else(invalid)?;
            return Self::new(start, end);
        }

        match s.to_lowercase().as_str() {
            "ytd" => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(invalid)?;
                return Self::new(start, today);
            }
            "qtd" => {
                let month = (quarter_of(today) as u32 - 1) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(today.year(), month, 1).ok_or_else(invalid)?;
                return Self::new(start, today);
            }
            "mtd" => {
                let start =
                    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).ok_or_else(invalid)?;
                return Self::new(start, today);
            }
            _ => {}
        }

        // Rolling: "30d", "7d", etc.
        if let Some(n) = s
            .strip_suffix(['d', 'D'])
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
        {
            let start = today
                .checked_sub_signed(Duration::days(i64::from(n) - 1))
                .ok_or_else(invalid)?;
            return Self::new(start, today);
        }

        if s.len() == 4 {
            if let Ok(year) = s.parse::<i32>() {
                return months(year, 1, 12).ok_or_else(invalid);
            }
        }

        if let Some(caps) = RE_HALF.captures(s) {
            let year: i32 = caps[1].parse().map_err(|_| invalid())?;
            let first = if &caps[2] == "1" { 1 } else { 7 };
            return months(year, first, first + 5).ok_or_else(invalid);
        }

        if let Some(caps) = RE_QUARTER.captures(s) {
            let year: i32 = caps[1].parse().map_err(|_| invalid())?;
            let q: u32 = caps[2].parse().map_err(|_| invalid())?;
            return months(year, (q - 1) * 3 + 1, q * 3).ok_or_else(invalid);
        }

        if let Some(caps) = RE_WEEK.captures(s) {
            let year: i32 = caps[1].parse().map_err(|_| invalid())?;
            let week: u32 = caps[2].parse().map_err(|_| invalid())?;
            let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(invalid)?;
            let end = start
                .checked_add_signed(Duration::days(6))
                .ok_or_else(invalid)?;
            return Self::new(start, end);
        }

        if let Some(caps) = RE_MONTH.captures(s) {
            let year: i32 = caps[1].parse().map_err(|_| invalid())?;
            let month: u32 = caps[2].parse().map_err(|_| invalid())?;
            return months(year, month, month).ok_or_else(invalid);
        }

        Err(invalid())
    }
}

fn months(year: i32, first: u32, last: u32) -> Option<DateRange> {
    Some(DateRange {
        start: NaiveDate::from_ymd_opt(year, first, 1)?,
        end: last_day_of_month(year, last)?,
    })
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}
