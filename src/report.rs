//! Fixed-layout text report built from the summary figures.

use std::fmt;

use crate::metrics::{RatingSummary, ShiftSummary};
use crate::query::DateRange;
use crate::records::{PLATFORM_A_LABEL, PLATFORM_B_LABEL};

/// Everything the report shows. Nothing here is computed by the renderer.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub title: &'a str,
    pub location: Option<&'a str>,
    pub range: Option<DateRange>,
    pub shifts: &'a ShiftSummary,
    pub ratings: &'a RatingSummary,
}

const RULE: &str = "------------------------------------------------------------";
const NA: &str = "NA";

pub fn render_text(input: &ReportInput<'_>) -> String {
    input.to_string()
}

impl fmt::Display for ReportInput<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "{}", self.title)?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "{:<28}{}", "Location:", self.location.unwrap_or("All"))?;
        let range = self
            .range
            .map_or_else(|| NA.to_string(), |r| r.to_string());
        writeln!(out, "{:<28}{range}", "Period:")?;
        writeln!(out)?;

        let s = self.shifts;
        writeln!(out, "Closes")?;
        writeln!(out, "{RULE}")?;
        if s.row_count == 0 {
            writeln!(out, "No close data for the selected filters.")?;
        } else {
            writeln!(out, "{:<28}{}", "Closes:", s.row_count)?;
            writeln!(out, "{:<28}{}", "Total revenue (EUR):", amount(s.total_revenue, 0))?;
            writeln!(
                out,
                "{:<28}{}",
                "Orders:",
                s.total_orders.map_or_else(|| NA.to_string(), |n| n.to_string())
            )?;
            writeln!(out, "{:<28}{}", "Average basket (EUR):", amount(s.average_basket, 2))?;
            writeln!(
                out,
                "{:<28}{}",
                "Revenue per hour (EUR/h):",
                amount(s.average_revenue_per_hour, 2)
            )?;
        }
        if let Some(goal) = &s.revenue_goal {
            writeln!(
                out,
                "{:<28}{} / {} closes >= {} EUR ({:.1} %)",
                "Revenue goal:", goal.nb_ok, goal.nb_total, goal.goal, goal.pct_ok
            )?;
        }
        writeln!(out)?;

        let r = self.ratings;
        writeln!(out, "Ratings")?;
        writeln!(out, "{RULE}")?;
        if r.row_count == 0 {
            writeln!(out, "No rating data for the selected filters.")?;
        } else {
            writeln!(
                out,
                "{:<28}{}",
                format!("{PLATFORM_A_LABEL} average:"),
                amount(r.mean_platform_a, 2)
            )?;
            writeln!(
                out,
                "{:<28}{}",
                format!("{PLATFORM_B_LABEL} average:"),
                amount(r.mean_platform_b, 2)
            )?;
            writeln!(
                out,
                "{:<28}{} / {} rows >= {} ({:.1} %)",
                "Rating goal:", r.goal.nb_ok, r.goal.nb_total, r.goal.min_rating, r.goal.pct_ok
            )?;
        }
        Ok(())
    }
}

fn amount(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:.decimals$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{RatingGoalAttainment, RevenueGoalAttainment};
    use chrono::NaiveDate;

    fn ratings(row_count: usize) -> RatingSummary {
        RatingSummary {
            row_count,
            mean_platform_a: (row_count > 0).then_some(4.55),
            mean_platform_b: (row_count > 0).then_some(4.25),
            goal: RatingGoalAttainment {
                min_rating: 4.5,
                nb_ok: row_count / 2,
                nb_total: row_count,
                pct_ok: if row_count > 0 { 50.0 } else { 0.0 },
            },
        }
    }

    #[test]
    fn test_render_full_report() {
        let shifts = ShiftSummary {
            row_count: 3,
            total_revenue: Some(1050.0),
            total_orders: Some(30),
            average_basket: Some(35.0),
            average_revenue_per_hour: Some(350.0),
            revenue_goal: Some(RevenueGoalAttainment {
                location: "Amiens".into(),
                goal: 350.0,
                nb_ok: 2,
                nb_total: 3,
                pct_ok: 200.0 / 3.0,
            }),
        };
        let ratings = ratings(4);
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();
        let text = render_text(&ReportInput {
            title: "Close report",
            location: Some("Amiens"),
            range: Some(range),
            shifts: &shifts,
            ratings: &ratings,
        });

        assert!(text.starts_with("Close report\n"));
        assert!(text.contains("Amiens"));
        assert!(text.contains("2025-01-01 .. 2025-01-31"));
        assert!(text.contains("1050"));
        assert!(text.contains("35.00"));
        assert!(text.contains("2 / 3 closes >= 350 EUR (66.7 %)"));
        assert!(text.contains("Uber Eats average:"));
        assert!(text.contains("4.55"));
        assert!(text.contains("2 / 4 rows >= 4.5 (50.0 %)"));
    }

    #[test]
    fn test_render_empty_report() {
        let shifts = ShiftSummary::default();
        let ratings = ratings(0);
        let text = render_text(&ReportInput {
            title: "Close report",
            location: None,
            range: None,
            shifts: &shifts,
            ratings: &ratings,
        });
        assert!(text.contains("All"));
        let input = ReportInput {
            title: "Close report",
            location: None,
            range: None,
            shifts: &shifts,
            ratings: &ratings,
        };
        assert_eq!(format!("{input}"), text);
        assert!(text.contains("No close data for the selected filters."));
        assert!(text.contains("No rating data for the selected filters."));
        assert!(!text.contains("Revenue goal:"));
    }
}
