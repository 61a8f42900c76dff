use chrono::NaiveDate;

use crate::query::range::DateRange;
use crate::records::{DerivedShift, RatingRecord};

/// Builder for the date/location/brand filters shared by every view.
///
/// Unset filters match everything. Results keep the input order.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    range: Option<DateRange>,
    location: Option<String>,
    brand: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Restrict to one location; `None` means all locations.
    pub fn location(mut self, location: Option<&str>) -> Self {
        self.location = location.map(|s| s.to_string());
        self
    }

    /// Restrict ratings to one brand. Shifts ignore this.
    pub fn brand(mut self, brand: Option<&str>) -> Self {
        self.brand = brand.map(|s| s.to_string());
        self
    }

    /// Same date and location constraints, any brand.
    pub fn without_brand(&self) -> Self {
        Self {
            brand: None,
            ..self.clone()
        }
    }

    pub fn selected_location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn selected_range(&self) -> Option<DateRange> {
        self.range
    }

    fn matches(&self, date: NaiveDate, location: &str) -> bool {
        self.range.is_none_or(|r| r.contains(date))
            && self.location.as_deref().is_none_or(|l| l == location)
    }

    pub fn shifts<'a>(&self, shifts: &'a [DerivedShift]) -> Vec<&'a DerivedShift> {
        shifts
            .iter()
            .filter(|s| self.matches(s.record.date, &s.record.location))
            .collect()
    }

    pub fn ratings<'a>(&self, ratings: &'a [RatingRecord]) -> Vec<&'a RatingRecord> {
        ratings
            .iter()
            .filter(|r| self.matches(r.date, &r.location))
            .filter(|r| self.brand.as_deref().is_none_or(|b| b == r.brand))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hourly::derive_shift;
    use crate::records::ShiftRecord;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn shift(day: u32, location: &str) -> DerivedShift {
        derive_shift(ShiftRecord {
            date: d(day),
            location: location.into(),
            period_label: "23:00 - 00:00".into(),
            order_count: day,
            revenue: day as f64 * 10.0,
        })
    }

    fn rating(day: u32, location: &str, brand: &str) -> RatingRecord {
        RatingRecord {
            date: d(day),
            location: location.into(),
            brand: brand.into(),
            rating_platform_a: 4.0,
            rating_platform_b: 4.0,
        }
    }

    #[test]
    fn test_no_filters_matches_all() {
        let shifts = vec![shift(1, "Amiens"), shift(2, "Beauvais")];
        assert_eq!(RecordFilter::new().shifts(&shifts).len(), 2);
    }

    #[test]
    fn test_range_inclusive_at_both_ends() {
        let shifts: Vec<_> = (1..=10).map(|day| shift(day, "Amiens")).collect();
        let filter = RecordFilter::new().range(DateRange::new(d(3), d(6)).unwrap());
        let days: Vec<u32> = filter
            .shifts(&shifts)
            .iter()
            .map(|s| s.record.order_count)
            .collect();
        assert_eq!(days, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_location_filter_preserves_order() {
        let shifts = vec![
            shift(5, "Amiens"),
            shift(1, "Beauvais"),
            shift(3, "Amiens"),
        ];
        let filter = RecordFilter::new().location(Some("Amiens"));
        let days: Vec<u32> = filter
            .shifts(&shifts)
            .iter()
            .map(|s| s.record.order_count)
            .collect();
        assert_eq!(days, vec![5, 3]);
    }

    #[test]
    fn test_brand_filter_applies_to_ratings_only() {
        let ratings = vec![
            rating(1, "Amiens", "Smash"),
            rating(1, "Amiens", "Tacos"),
            rating(2, "Beauvais", "Smash"),
        ];
        let filter = RecordFilter::new().brand(Some("Smash"));
        assert_eq!(filter.ratings(&ratings).len(), 2);

        let shifts = vec![shift(1, "Amiens")];
        assert_eq!(filter.shifts(&shifts).len(), 1);

        let filter = filter.location(Some("Beauvais"));
        assert_eq!(filter.ratings(&ratings).len(), 1);
    }

    #[test]
    fn test_without_brand_keeps_date_and_location() {
        let ratings = vec![
            rating(1, "Amiens", "Smash"),
            rating(2, "Amiens", "Tacos"),
            rating(5, "Amiens", "Tacos"),
            rating(2, "Beauvais", "Tacos"),
        ];
        let filter = RecordFilter::new()
            .range(DateRange::new(d(1), d(3)).unwrap())
            .location(Some("Amiens"))
            .brand(Some("Smash"));
        assert_eq!(filter.ratings(&ratings).len(), 1);

        let widened = filter.without_brand();
        let days: Vec<_> = widened.ratings(&ratings).iter().map(|r| r.date).collect();
        assert_eq!(days, vec![d(1), d(2)]);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let shifts = vec![shift(1, "Amiens")];
        let filter = RecordFilter::new().location(Some("Lille"));
        assert!(filter.shifts(&shifts).is_empty());
    }
}
