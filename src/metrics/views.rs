//! Row-level views: detail tables, chart series and choice lists.

use std::collections::BTreeSet;

use super::types::{HeatmapCell, RatingPoint};
use crate::records::{DerivedShift, RatingRecord, PLATFORM_A_LABEL, PLATFORM_B_LABEL};

/// Shifts ordered by date, location, then close window.
pub fn sorted_shifts<'a>(shifts: &[&'a DerivedShift]) -> Vec<&'a DerivedShift> {
    let mut rows = shifts.to_vec();
    rows.sort_by(|a, b| {
        (a.record.date, &a.record.location, &a.record.period_label).cmp(&(
            b.record.date,
            &b.record.location,
            &b.record.period_label,
        ))
    });
    rows
}

/// Ratings ordered by date, location, then brand.
pub fn sorted_ratings<'a>(ratings: &[&'a RatingRecord]) -> Vec<&'a RatingRecord> {
    let mut rows = ratings.to_vec();
    rows.sort_by(|a, b| (a.date, &a.location, &a.brand).cmp(&(b.date, &b.location, &b.brand)));
    rows
}

/// The `n` latest shifts by date, oldest first. Same-day rows keep insertion order.
pub fn recent_shifts(shifts: &[DerivedShift], n: usize) -> Vec<&DerivedShift> {
    let mut rows: Vec<&DerivedShift> = shifts.iter().collect();
    rows.sort_by_key(|s| s.record.date);
    let skip = rows.len().saturating_sub(n);
    rows.split_off(skip)
}

/// The `n` latest rating rows by date, oldest first.
pub fn recent_ratings(ratings: &[RatingRecord], n: usize) -> Vec<&RatingRecord> {
    let mut rows: Vec<&RatingRecord> = ratings.iter().collect();
    rows.sort_by_key(|r| r.date);
    let skip = rows.len().saturating_sub(n);
    rows.split_off(skip)
}

/// One point per row and platform.
pub fn rating_timeline(ratings: &[&RatingRecord]) -> Vec<RatingPoint> {
    ratings
        .iter()
        .flat_map(|r| {
            [
                (PLATFORM_A_LABEL, r.rating_platform_a),
                (PLATFORM_B_LABEL, r.rating_platform_b),
            ]
            .into_iter()
            .map(move |(platform, rating)| RatingPoint {
                date: r.date,
                location: r.location.clone(),
                brand: r.brand.clone(),
                platform,
                rating,
            })
        })
        .collect()
}

pub fn revenue_heatmap(shifts: &[&DerivedShift]) -> Vec<HeatmapCell> {
    shifts
        .iter()
        .map(|s| HeatmapCell {
            date: s.record.date,
            location: s.record.location.clone(),
            period_label: s.record.period_label.clone(),
            revenue_per_hour: s.revenue_per_hour,
            revenue: s.record.revenue,
            order_count: s.record.order_count,
        })
        .collect()
}

/// Distinct locations of the close table, sorted.
pub fn choices_locations(shifts: &[DerivedShift]) -> Vec<String> {
    let set: BTreeSet<&str> = shifts.iter().map(|s| s.record.location.as_str()).collect();
    set.into_iter().map(String::from).collect()
}

pub fn choices_period_labels(shifts: &[DerivedShift]) -> Vec<String> {
    let set: BTreeSet<&str> = shifts.iter().map(|s| s.record.period_label.as_str()).collect();
    set.into_iter().map(String::from).collect()
}

pub fn choices_brands(ratings: &[&RatingRecord]) -> Vec<String> {
    let set: BTreeSet<&str> = ratings.iter().map(|r| r.brand.as_str()).collect();
    set.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_sorted_shifts() {
        let rows = [
            shift(2, "Amiens", "23:00 - 00:00", 1, 1.0),
            shift(1, "Beauvais", "23:00 - 00:00", 2, 2.0),
            shift(1, "Amiens", "23:00 - 00:00", 3, 3.0),
            shift(1, "Amiens", "22:00 - 23:00", 4, 4.0),
        ];
        let refs: Vec<&DerivedShift> = rows.iter().collect();
        let orders: Vec<u32> = sorted_shifts(&refs)
            .iter()
            .map(|s| s.record.order_count)
            .collect();
        assert_eq!(orders, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sorted_ratings() {
        let rows = [
            rating(2, "Amiens", "Smash", 1.0, 1.0),
            rating(1, "Amiens", "Tacos", 2.0, 2.0),
            rating(1, "Amiens", "Smash", 3.0, 3.0),
        ];
        let refs: Vec<&RatingRecord> = rows.iter().collect();
        let a: Vec<f64> = sorted_ratings(&refs)
            .iter()
            .map(|r| r.rating_platform_a)
            .collect();
        assert_eq!(a, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_recent_shifts() {
        let rows = vec![
            shift(5, "Amiens", "23:00 - 00:00", 5, 1.0),
            shift(1, "Amiens", "23:00 - 00:00", 1, 1.0),
            shift(3, "Amiens", "23:00 - 00:00", 3, 1.0),
        ];
        let orders: Vec<u32> = recent_shifts(&rows, 2)
            .iter()
            .map(|s| s.record.order_count)
            .collect();
        assert_eq!(orders, vec![3, 5]);
        assert_eq!(recent_shifts(&rows, 10).len(), 3);
        assert!(recent_shifts(&rows, 0).is_empty());
    }

    #[test]
    fn test_recent_ratings() {
        let rows = vec![
            rating(4, "Amiens", "Smash", 4.0, 4.0),
            rating(2, "Amiens", "Smash", 2.0, 2.0),
        ];
        let a: Vec<f64> = recent_ratings(&rows, 1)
            .iter()
            .map(|r| r.rating_platform_a)
            .collect();
        assert_eq!(a, vec![4.0]);
    }

    #[test]
    fn test_rating_timeline_is_long_format() {
        let rows = [rating(1, "Amiens", "Smash", 4.2, 4.7)];
        let refs: Vec<&RatingRecord> = rows.iter().collect();
        let points = rating_timeline(&refs);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].platform, "Uber Eats");
        assert_eq!(points[0].rating, 4.2);
        assert_eq!(points[1].platform, "Deliveroo");
        assert_eq!(points[1].rating, 4.7);
    }

    #[test]
    fn test_revenue_heatmap() {
        let rows = [
            shift(1, "Amiens", "23:00 - 00:00", 4, 120.0),
            shift(1, "Amiens", "nope", 2, 60.0),
        ];
        let refs: Vec<&DerivedShift> = rows.iter().collect();
        let cells = revenue_heatmap(&refs);
        assert_eq!(cells[0].revenue_per_hour, Some(120.0));
        assert_eq!(cells[1].revenue_per_hour, None);
    }

    #[test]
    fn test_choices() {
        let shifts = vec![
            shift(1, "Beauvais", "23:00 - 00:00", 1, 1.0),
            shift(1, "Amiens", "22:00 - 23:00", 1, 1.0),
            shift(2, "Amiens", "23:00 - 00:00", 1, 1.0),
        ];
        let ratings = vec![
            rating(1, "Lille", "Tacos", 4.0, 4.0),
            rating(1, "Amiens", "Smash", 4.0, 4.0),
        ];
        assert_eq!(
            choices_locations(&shifts),
            vec!["Amiens", "Beauvais"]
        );
        assert_eq!(
            choices_period_labels(&shifts),
            vec!["22:00 - 23:00", "23:00 - 00:00"]
        );
        let refs: Vec<&RatingRecord> = ratings.iter().collect();
        assert_eq!(choices_brands(&refs), vec!["Smash", "Tacos"]);
    }
}
