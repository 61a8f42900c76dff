use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One close shift at one location on one date, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub date: NaiveDate,
    pub location: String,
    /// Close window, e.g. `"23:00 - 00:00"`.
    pub period_label: String,
    pub order_count: u32,
    pub revenue: f64,
}

/// A shift record plus its hourly-normalized fields.
///
/// The derived fields are `None` when the period label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedShift {
    #[serde(flatten)]
    pub record: ShiftRecord,
    pub duration_hours: Option<f64>,
    pub revenue_per_hour: Option<f64>,
    pub orders_per_hour: Option<f64>,
}

/// Star ratings for one brand at one location on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub date: NaiveDate,
    pub location: String,
    pub brand: String,
    /// Uber Eats rating.
    pub rating_platform_a: f64,
    /// Deliveroo rating.
    pub rating_platform_b: f64,
}

pub const PLATFORM_A_LABEL: &str = "Uber Eats";
pub const PLATFORM_B_LABEL: &str = "Deliveroo";

pub const MAX_RATING: f64 = 5.0;

impl ShiftRecord {
    /// Check a manually entered shift before it is appended.
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(Error::InvalidRecord("shift location is empty".into()));
        }
        if self.period_label.trim().is_empty() {
            return Err(Error::InvalidRecord("shift period label is empty".into()));
        }
        if !self.revenue.is_finite() || self.revenue < 0.0 {
            return Err(Error::InvalidRecord(format!(
                "revenue must be a non-negative amount, got {}",
                self.revenue
            )));
        }
        Ok(())
    }
}

impl RatingRecord {
    /// Check a manually entered rating row before it is appended.
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(Error::InvalidRecord("rating location is empty".into()));
        }
        if self.brand.trim().is_empty() {
            return Err(Error::InvalidRecord("rating brand is empty".into()));
        }
        for (label, value) in [
            (PLATFORM_A_LABEL, self.rating_platform_a),
            (PLATFORM_B_LABEL, self.rating_platform_b),
        ] {
            if !(0.0..=MAX_RATING).contains(&value) {
                return Err(Error::InvalidRecord(format!(
                    "{label} rating must be between 0 and {MAX_RATING}, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// True iff both platform ratings reach `min_rating`.
    pub fn meets_goal(&self, min_rating: f64) -> bool {
        self.rating_platform_a >= min_rating && self.rating_platform_b >= min_rating
    }
}
