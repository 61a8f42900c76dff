use chrono::NaiveDate;
use serde::Serialize;

/// Headline figures for a filtered set of shifts.
///
/// Every figure is `None` when the filtered set is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShiftSummary {
    pub row_count: usize,
    pub total_revenue: Option<f64>,
    pub total_orders: Option<u64>,
    /// Revenue per order; `None` when there are no orders.
    pub average_basket: Option<f64>,
    /// Mean over the shifts whose hourly revenue is defined.
    pub average_revenue_per_hour: Option<f64>,
    /// Present only when a single location with a configured goal is selected.
    pub revenue_goal: Option<RevenueGoalAttainment>,
}

/// How many closes reached the revenue target of one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueGoalAttainment {
    pub location: String,
    pub goal: f64,
    pub nb_ok: usize,
    pub nb_total: usize,
    /// 0 when there are no rows.
    pub pct_ok: f64,
}

/// Average ratings and goal attainment for a filtered set of rating rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub row_count: usize,
    pub mean_platform_a: Option<f64>,
    pub mean_platform_b: Option<f64>,
    pub goal: RatingGoalAttainment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingGoalAttainment {
    pub min_rating: f64,
    pub nb_ok: usize,
    pub nb_total: usize,
    pub pct_ok: f64,
}

/// Mean performance of one close window at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRanking {
    pub location: String,
    pub period_label: String,
    pub shift_count: usize,
    pub mean_revenue_per_hour: Option<f64>,
    pub mean_revenue: f64,
    pub mean_order_count: f64,
}

/// Per-date totals for one close window, used for the evolution charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub date: NaiveDate,
    pub location: String,
    pub period_label: String,
    pub revenue: f64,
    pub order_count: u64,
    pub revenue_per_hour: Option<f64>,
    pub orders_per_hour: Option<f64>,
}

/// Average ratings of one brand at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandPerformance {
    pub location: String,
    pub brand: String,
    pub row_count: usize,
    pub mean_platform_a: f64,
    pub mean_platform_b: f64,
}

/// One rating on one platform, in long format for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub location: String,
    pub brand: String,
    pub platform: &'static str,
    pub rating: f64,
}

/// A date x close-window cell of hourly revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub location: String,
    pub period_label: String,
    pub revenue_per_hour: Option<f64>,
    pub revenue: f64,
    pub order_count: u32,
}
