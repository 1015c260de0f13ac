use super::LatLng;
use crate::constants::{HIGH_PRIORITY_AGE_DAYS, HIGH_PRIORITY_TYPES, MEDIUM_PRIORITY_AGE_DAYS};
use crate::time::days_since;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attention level derived from the problem type and the report's age.
///
/// Ordering puts `High` first, so sorting ascending lists urgent reports on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Wire token, also used in CSS classes and the CSV export
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    #[must_use]
    pub const fn badge_label(self) -> &'static str {
        match self {
            Self::High => "Alta Prioridad",
            Self::Medium => "Prioridad Media",
            Self::Low => "Baja Prioridad",
        }
    }

    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::High => "Alta",
            Self::Medium => "Media",
            Self::Low => "Baja",
        }
    }
}

#[must_use]
pub fn calculate_priority(problem_type: &str, days_since_report: i64) -> Priority {
    if HIGH_PRIORITY_TYPES.contains(&problem_type) || days_since_report > HIGH_PRIORITY_AGE_DAYS {
        Priority::High
    } else if days_since_report > MEDIUM_PRIORITY_AGE_DAYS {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// One civic issue report, as decoded from the published spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub author: String,
    pub problem_type: String,
    pub description: String,
    pub address: String,
    pub location: LatLng,
    pub date: Option<NaiveDate>,
    /// Date cell exactly as it appeared in the source
    pub raw_date: String,
    pub status: String,
    pub days_since: i64,
    pub priority: Priority,
}

impl Report {
    /// Recompute the age-dependent fields against `today`
    pub fn refresh_age(&mut self, today: NaiveDate) {
        self.days_since = days_since(self.date, today);
        self.priority = calculate_priority(&self.problem_type, self.days_since);
    }

    /// `"lat, lng"` as offered by the copy-location action
    #[must_use]
    pub fn location_text(&self) -> String {
        format!("{}, {}", self.location.lat, self.location.lng)
    }
}
