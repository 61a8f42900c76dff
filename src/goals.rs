use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::records::MAX_RATING;

/// Revenue target per close, per location, and the rating floor applied to
/// every brand. Lives for one session only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalConfig {
    revenue_goal_by_location: BTreeMap<String, f64>,
    min_rating_goal: f64,
}

pub const DEFAULT_MIN_RATING_GOAL: f64 = 4.5;

impl Default for GoalConfig {
    fn default() -> Self {
        let revenue_goal_by_location = [("Amiens", 350.0), ("Beauvais", 200.0)]
            .into_iter()
            .map(|(loc, goal)| (loc.to_string(), goal))
            .collect();
        Self {
            revenue_goal_by_location,
            min_rating_goal: DEFAULT_MIN_RATING_GOAL,
        }
    }
}

impl GoalConfig {
    /// A configuration with no revenue goals.
    pub fn empty(min_rating_goal: f64) -> Result<Self> {
        let mut goals = Self {
            revenue_goal_by_location: BTreeMap::new(),
            min_rating_goal: DEFAULT_MIN_RATING_GOAL,
        };
        goals.set_min_rating_goal(min_rating_goal)?;
        Ok(goals)
    }

    /// Revenue goal for `location`, if one is configured.
    pub fn revenue_goal(&self, location: &str) -> Option<f64> {
        self.revenue_goal_by_location.get(location).copied()
    }

    pub fn revenue_goals(&self) -> &BTreeMap<String, f64> {
        &self.revenue_goal_by_location
    }

    pub fn set_revenue_goal(&mut self, location: &str, goal: f64) -> Result<()> {
        if !goal.is_finite() || goal < 0.0 {
            return Err(Error::Config(format!(
                "revenue goal for {location} must be non-negative, got {goal}"
            )));
        }
        self.revenue_goal_by_location
            .insert(location.to_string(), goal);
        Ok(())
    }

    /// Drop the goal for `location`. Returns whether one was set.
    pub fn remove_revenue_goal(&mut self, location: &str) -> bool {
        self.revenue_goal_by_location.remove(location).is_some()
    }

    pub fn min_rating_goal(&self) -> f64 {
        self.min_rating_goal
    }

    pub fn set_min_rating_goal(&mut self, goal: f64) -> Result<()> {
        if !(0.0..=MAX_RATING).contains(&goal) {
            return Err(Error::Config(format!(
                "rating goal must be between 0 and {MAX_RATING}, got {goal}"
            )));
        }
        self.min_rating_goal = goal;
        Ok(())
    }

    /// Apply a `LOCATION=AMOUNT` override, as given on the command line.
    pub fn apply_override(&mut self, spec: &str) -> Result<()> {
        let (location, amount) = spec
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("expected LOCATION=AMOUNT, got {spec:?}")))?;
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::Config(format!("missing location in {spec:?}")));
        }
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid goal amount in {spec:?}")))?;
        self.set_revenue_goal(location, amount)
    }
}
