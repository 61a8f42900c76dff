pub mod grouping;
pub mod types;
pub mod views;

pub use grouping::{brand_performance, rank_periods, revenue_pivot, top_periods, TOP_PERIODS};
pub use types::*;
pub use views::{
    choices_brands, choices_locations, choices_period_labels, rating_timeline, recent_ratings,
    recent_shifts, revenue_heatmap, sorted_ratings, sorted_shifts,
};

use crate::goals::GoalConfig;
use crate::records::{DerivedShift, RatingRecord};

/// Compute the headline shift figures.
///
/// `location` is the active location filter (`None` for all locations).
/// Revenue goal attainment is only evaluated for a single location that has
/// a configured goal.
pub fn summarize_shifts(
    shifts: &[&DerivedShift],
    goals: &GoalConfig,
    location: Option<&str>,
) -> ShiftSummary {
    let revenue_goal = location.and_then(|loc| {
        goals.revenue_goal(loc).map(|goal| {
            let flags = revenue_goal_flags(shifts, goal);
            let nb_ok = flags.iter().filter(|ok| **ok).count();
            RevenueGoalAttainment {
                location: loc.to_string(),
                goal,
                nb_ok,
                nb_total: flags.len(),
                pct_ok: pct(nb_ok, flags.len()),
            }
        })
    });

    if shifts.is_empty() {
        return ShiftSummary {
            revenue_goal,
            ..ShiftSummary::default()
        };
    }

    let total_revenue: f64 = shifts.iter().map(|s| s.record.revenue).sum();
    let total_orders: u64 = shifts.iter().map(|s| s.record.order_count as u64).sum();
    let average_basket = if total_orders > 0 {
        Some(total_revenue / total_orders as f64)
    } else {
        None
    };

    ShiftSummary {
        row_count: shifts.len(),
        total_revenue: Some(total_revenue),
        total_orders: Some(total_orders),
        average_basket,
        average_revenue_per_hour: mean(shifts.iter().filter_map(|s| s.revenue_per_hour)),
        revenue_goal,
    }
}

/// Per-row `revenue >= goal`, in input order.
pub fn revenue_goal_flags(shifts: &[&DerivedShift], goal: f64) -> Vec<bool> {
    shifts.iter().map(|s| s.record.revenue >= goal).collect()
}

/// Compute average ratings and rating-goal attainment.
pub fn summarize_ratings(ratings: &[&RatingRecord], min_rating: f64) -> RatingSummary {
    let flags = rating_goal_flags(ratings, min_rating);
    let nb_ok = flags.iter().filter(|ok| **ok).count();

    RatingSummary {
        row_count: ratings.len(),
        mean_platform_a: mean(ratings.iter().map(|r| r.rating_platform_a)),
        mean_platform_b: mean(ratings.iter().map(|r| r.rating_platform_b)),
        goal: RatingGoalAttainment {
            min_rating,
            nb_ok,
            nb_total: flags.len(),
            pct_ok: pct(nb_ok, flags.len()),
        },
    }
}

/// Per-row `meets_goal`, in input order.
pub fn rating_goal_flags(ratings: &[&RatingRecord], min_rating: f64) -> Vec<bool> {
    ratings.iter().map(|r| r.meets_goal(min_rating)).collect()
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn pct(ok: usize, total: usize) -> f64 {
    if total > 0 {
        100.0 * ok as f64 / total as f64
    } else {
        0.0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::hourly::derive_shift;
    use crate::records::{DerivedShift, RatingRecord, ShiftRecord};

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    pub fn shift(d: u32, location: &str, period: &str, orders: u32, revenue: f64) -> DerivedShift {
        derive_shift(ShiftRecord {
            date: day(d),
            location: location.into(),
            period_label: period.into(),
            order_count: orders,
            revenue,
        })
    }

    pub fn rating(d: u32, location: &str, brand: &str, a: f64, b: f64) -> RatingRecord {
        RatingRecord {
            date: day(d),
            location: location.into(),
            brand: brand.into(),
            rating_platform_a: a,
            rating_platform_b: b,
        }
    }
}
