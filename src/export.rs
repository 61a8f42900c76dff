use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::records::{RatingRecord, ShiftRecord};

/// The two-table payload exchanged with the data store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub shifts: Vec<ShiftRecord>,
    pub ratings: Vec<RatingRecord>,
}

pub const SHIFT_COLUMNS: [&str; 5] = ["date", "location", "period_label", "order_count", "revenue"];
pub const RATING_COLUMNS: [&str; 5] = [
    "date",
    "location",
    "brand",
    "rating_platform_a",
    "rating_platform_b",
];

impl Workbook {
    pub fn new(shifts: Vec<ShiftRecord>, ratings: Vec<RatingRecord>) -> Self {
        Self { shifts, ratings }
    }

    /// Serialize to a download payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let workbook: Workbook = serde_json::from_slice(bytes)
            .map_err(|e| Error::Export(format!("not a close/rating workbook: {e}")))?;
        for shift in &workbook.shifts {
            shift.validate()?;
        }
        for rating in &workbook.ratings {
            rating.validate()?;
        }
        Ok(workbook)
    }

    pub fn shifts_csv(&self) -> String {
        let mut out = SHIFT_COLUMNS.join(",");
        out.push('\n');
        for s in &self.shifts {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                s.date,
                csv_escape(&s.location),
                csv_escape(&s.period_label),
                s.order_count,
                s.revenue,
            ));
        }
        out
    }

    pub fn ratings_csv(&self) -> String {
        let mut out = RATING_COLUMNS.join(",");
        out.push('\n');
        for r in &self.ratings {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                r.date,
                csv_escape(&r.location),
                csv_escape(&r.brand),
                r.rating_platform_a,
                r.rating_platform_b,
            ));
        }
        out
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
