pub mod date_util;
pub mod error;
pub mod export;
pub mod goals;
pub mod hourly;
pub mod metrics;
pub mod query;
pub mod records;
pub mod report;
pub mod storage;

pub use error::{Error, Result};
pub use export::Workbook;
pub use goals::GoalConfig;
pub use metrics::{
    BrandPerformance, HeatmapCell, PeriodRanking, PivotRow, RatingPoint, RatingSummary,
    ShiftSummary,
};
pub use query::{DateRange, RecordFilter};
pub use records::{DerivedShift, RatingRecord, ShiftRecord};
pub use storage::Database;

/// One working session over the close and rating data.
///
/// Owns its copy of both record collections and the goal configuration.
/// Records can be appended but are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    shifts: Vec<DerivedShift>,
    ratings: Vec<RatingRecord>,
    goals: GoalConfig,
}

impl Dashboard {
    pub fn new(shifts: Vec<ShiftRecord>, ratings: Vec<RatingRecord>, goals: GoalConfig) -> Self {
        Self {
            shifts: hourly::derive_shifts(&shifts),
            ratings,
            goals,
        }
    }

    /// Start a session from the data store.
    pub async fn load(db: &Database, goals: GoalConfig) -> Result<Self> {
        let (shifts, ratings) = db.load().await?;
        Ok(Self::new(shifts, ratings, goals))
    }

    pub fn from_workbook(workbook: Workbook, goals: GoalConfig) -> Self {
        Self::new(workbook.shifts, workbook.ratings, goals)
    }

    pub fn shifts(&self) -> &[DerivedShift] {
        &self.shifts
    }

    pub fn ratings(&self) -> &[RatingRecord] {
        &self.ratings
    }

    pub fn goals(&self) -> &GoalConfig {
        &self.goals
    }

    pub fn goals_mut(&mut self) -> &mut GoalConfig {
        &mut self.goals
    }

    // ── Manual entry ───────────────────────────────────────────────

    /// Validate, derive and append a shift. Returns the derived row.
    pub fn append_shift(&mut self, shift: ShiftRecord) -> Result<&DerivedShift> {
        shift.validate()?;
        let derived = hourly::derive_shift(shift);
        if derived.duration_hours.is_none() {
            log::warn!(
                "Close period {:?} is not HH:MM - HH:MM; hourly figures unavailable",
                derived.record.period_label
            );
        }
        self.shifts.push(derived);
        Ok(&self.shifts[self.shifts.len() - 1])
    }

    pub fn append_rating(&mut self, rating: RatingRecord) -> Result<&RatingRecord> {
        rating.validate()?;
        self.ratings.push(rating);
        Ok(&self.ratings[self.ratings.len() - 1])
    }

    // ── Views ──────────────────────────────────────────────────────

    /// Default analysis range: every date present in either table.
    pub fn full_range(&self) -> Option<DateRange> {
        DateRange::covering(&self.shifts, &self.ratings)
    }

    pub fn locations(&self) -> Vec<String> {
        metrics::choices_locations(&self.shifts)
    }

    pub fn period_labels(&self) -> Vec<String> {
        metrics::choices_period_labels(&self.shifts)
    }

    /// Brands rated within the date and location of `filter`. The brand
    /// selection itself is ignored.
    pub fn brands(&self, filter: &RecordFilter) -> Vec<String> {
        metrics::choices_brands(&filter.without_brand().ratings(&self.ratings))
    }

    pub fn filter_shifts(&self, filter: &RecordFilter) -> Vec<&DerivedShift> {
        filter.shifts(&self.shifts)
    }

    pub fn filter_ratings(&self, filter: &RecordFilter) -> Vec<&RatingRecord> {
        filter.ratings(&self.ratings)
    }

    pub fn shift_summary(&self, filter: &RecordFilter) -> ShiftSummary {
        metrics::summarize_shifts(
            &self.filter_shifts(filter),
            &self.goals,
            filter.selected_location(),
        )
    }

    pub fn rating_summary(&self, filter: &RecordFilter) -> RatingSummary {
        metrics::summarize_ratings(&self.filter_ratings(filter), self.goals.min_rating_goal())
    }

    pub fn top_periods(&self, filter: &RecordFilter) -> Vec<PeriodRanking> {
        metrics::top_periods(&self.filter_shifts(filter))
    }

    pub fn revenue_pivot(&self, filter: &RecordFilter) -> Vec<PivotRow> {
        metrics::revenue_pivot(&self.filter_shifts(filter))
    }

    pub fn revenue_heatmap(&self, filter: &RecordFilter) -> Vec<HeatmapCell> {
        metrics::revenue_heatmap(&self.filter_shifts(filter))
    }

    /// One row per brand in the date and location of `filter`, whatever
    /// brand is selected.
    pub fn brand_performance(&self, filter: &RecordFilter) -> Vec<BrandPerformance> {
        metrics::brand_performance(&self.filter_ratings(&filter.without_brand()))
    }

    pub fn rating_timeline(&self, filter: &RecordFilter) -> Vec<RatingPoint> {
        metrics::rating_timeline(&self.filter_ratings(filter))
    }

    pub fn shift_details(&self, filter: &RecordFilter) -> Vec<&DerivedShift> {
        metrics::sorted_shifts(&self.filter_shifts(filter))
    }

    pub fn rating_details(&self, filter: &RecordFilter) -> Vec<&RatingRecord> {
        metrics::sorted_ratings(&self.filter_ratings(filter))
    }

    // ── Export ─────────────────────────────────────────────────────

    /// Current collections without derived fields.
    pub fn workbook(&self) -> Workbook {
        Workbook::new(
            self.shifts.iter().map(|s| s.record.clone()).collect(),
            self.ratings.clone(),
        )
    }

    /// Write the current collections back to the data store.
    pub async fn save(&self, db: &Database) -> Result<()> {
        let workbook = self.workbook();
        db.save(workbook.shifts, workbook.ratings).await
    }
}
