//! Hourly normalization of close shifts.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

use crate::records::{DerivedShift, ShiftRecord};

static RE_PERIOD_SEP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").unwrap());

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Length in hours of a close window such as `"23:00 - 00:00"`.
///
/// An end time at or before the start time is read as crossing midnight
/// once, so `"10:00 - 10:00"` is 24 hours. Returns `None` for anything that
/// is not exactly two `HH:MM` times.
pub fn duration_hours(period_label: &str) -> Option<f64> {
    let parts: Vec<&str> = RE_PERIOD_SEP.split(period_label.trim()).collect();
    let [start, end] = parts.as_slice() else {
        return None;
    };
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;

    let mut hours = (end - start).num_seconds() as f64 / SECONDS_PER_HOUR;
    if hours <= 0.0 {
        hours += 24.0;
    }
    Some(hours)
}

/// Attach duration and per-hour rates to one shift.
pub fn derive_shift(record: ShiftRecord) -> DerivedShift {
    let duration = duration_hours(&record.period_label);
    if duration.is_none() {
        log::debug!(
            "Unparseable close period {:?} for {} on {}",
            record.period_label,
            record.location,
            record.date
        );
    }
    let revenue_per_hour = duration.map(|h| record.revenue / h);
    let orders_per_hour = duration.map(|h| record.order_count as f64 / h);

    DerivedShift {
        record,
        duration_hours: duration,
        revenue_per_hour,
        orders_per_hour,
    }
}

/// Derive a whole batch, preserving order. The input is left untouched.
pub fn derive_shifts(records: &[ShiftRecord]) -> Vec<DerivedShift> {
    records.iter().cloned().map(derive_shift).collect()
}
