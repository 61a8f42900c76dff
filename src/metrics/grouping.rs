use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::mean;
use super::types::{BrandPerformance, PeriodRanking, PivotRow};
use crate::records::{DerivedShift, RatingRecord};

/// Number of groups returned by [`top_periods`].
pub const TOP_PERIODS: usize = 10;

/// The best close windows by mean hourly revenue, at most [`TOP_PERIODS`].
pub fn top_periods(shifts: &[&DerivedShift]) -> Vec<PeriodRanking> {
    let mut ranked = rank_periods(shifts);
    ranked.truncate(TOP_PERIODS);
    ranked
}

/// Every `(location, period_label)` group, best mean hourly revenue first.
///
/// Groups are built in ascending key order and the sort is stable, so ties
/// keep key order. Groups with no defined hourly revenue come last.
pub fn rank_periods(shifts: &[&DerivedShift]) -> Vec<PeriodRanking> {
    let mut groups: BTreeMap<(&str, &str), Vec<&DerivedShift>> = BTreeMap::new();
    for s in shifts {
        groups
            .entry((s.record.location.as_str(), s.record.period_label.as_str()))
            .or_default()
            .push(s);
    }

    let mut ranked: Vec<PeriodRanking> = groups
        .into_iter()
        .map(|((location, period_label), rows)| {
            let n = rows.len() as f64;
            PeriodRanking {
                location: location.to_string(),
                period_label: period_label.to_string(),
                shift_count: rows.len(),
                mean_revenue_per_hour: mean(rows.iter().filter_map(|s| s.revenue_per_hour)),
                mean_revenue: rows.iter().map(|s| s.record.revenue).sum::<f64>() / n,
                mean_order_count: rows.iter().map(|s| s.record.order_count as f64).sum::<f64>()
                    / n,
            }
        })
        .collect();

    ranked.sort_by(|a, b| descending_defined_first(a.mean_revenue_per_hour, b.mean_revenue_per_hour));
    ranked
}

fn descending_defined_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sum each `(date, location, period_label)` group, in ascending key order.
///
/// Hourly rates are summed like the totals. With one shift per key, which is
/// the normal case, this is the shift's own rate.
pub fn revenue_pivot(shifts: &[&DerivedShift]) -> Vec<PivotRow> {
    let mut groups: BTreeMap<(NaiveDate, &str, &str), PivotRow> = BTreeMap::new();
    for s in shifts {
        let r = &s.record;
        let row = groups
            .entry((r.date, r.location.as_str(), r.period_label.as_str()))
            .or_insert_with(|| PivotRow {
                date: r.date,
                location: r.location.clone(),
                period_label: r.period_label.clone(),
                revenue: 0.0,
                order_count: 0,
                revenue_per_hour: None,
                orders_per_hour: None,
            });
        row.revenue += r.revenue;
        row.order_count += r.order_count as u64;
        row.revenue_per_hour = add_defined(row.revenue_per_hour, s.revenue_per_hour);
        row.orders_per_hour = add_defined(row.orders_per_hour, s.orders_per_hour);
    }
    groups.into_values().collect()
}

fn add_defined(acc: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (acc, value) {
        (Some(a), Some(v)) => Some(a + v),
        (None, v) => v,
        (a, None) => a,
    }
}

/// Mean ratings per `(location, brand)`, sorted by location then brand.
pub fn brand_performance(ratings: &[&RatingRecord]) -> Vec<BrandPerformance> {
    let mut groups: BTreeMap<(&str, &str), Vec<&RatingRecord>> = BTreeMap::new();
    for r in ratings {
        groups
            .entry((r.location.as_str(), r.brand.as_str()))
            .or_default()
            .push(r);
    }

    groups
        .into_iter()
        .map(|((location, brand), rows)| {
            let n = rows.len() as f64;
            BrandPerformance {
                location: location.to_string(),
                brand: brand.to_string(),
                row_count: rows.len(),
                mean_platform_a: rows.iter().map(|r| r.rating_platform_a).sum::<f64>() / n,
                mean_platform_b: rows.iter().map(|r| r.rating_platform_b).sum::<f64>() / n,
            }
        })
        .collect()
}
