//! Query-side value types: completion filter and aggregate stats.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Completion filter applied by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterStatus {
    /// No restriction.
    #[default]
    All,
    /// Only todos with `completed == true`.
    Completed,
    /// Only todos with `completed == false`.
    Pending,
}

impl FilterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    /// Returns whether a todo with the given completion flag passes.
    pub fn accepts(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::Pending => !completed,
        }
    }
}

impl Display for FilterStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a filter value is not `all|completed|pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported filter `{}`; expected all|completed|pending",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for FilterStatus {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

/// Aggregate counters over the whole collection.
///
/// `percent_complete` is not rounded; display rounding belongs to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub percent_complete: f64,
}

impl TodoStats {
    /// Builds stats from totals; `completed` is capped at `total`.
    pub(crate) fn from_counts(total: usize, completed: usize) -> Self {
        let completed = completed.min(total);
        let percent_complete = if total == 0 {
            0.0
        } else {
            completed as f64 * 100.0 / total as f64
        };
        Self {
            total,
            completed,
            pending: total - completed,
            percent_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterStatus, TodoStats};

    #[test]
    fn filter_parses_select_values() {
        assert_eq!(" Pending ".parse::<FilterStatus>().unwrap(), FilterStatus::Pending);
        assert_eq!("ALL".parse::<FilterStatus>().unwrap(), FilterStatus::All);
        let err = "done".parse::<FilterStatus>().unwrap_err();
        assert!(err.to_string().contains("done"));
    }

    #[test]
    fn stats_for_empty_collection_are_zero() {
        let stats = TodoStats::from_counts(0, 0);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.percent_complete, 0.0);
    }

    #[test]
    fn stats_cap_completed_at_total() {
        let stats = TodoStats::from_counts(1, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.percent_complete, 100.0);
    }

    #[test]
    fn stats_percentage_is_not_truncated() {
        let stats = TodoStats::from_counts(3, 1);
        assert!((stats.percent_complete - 33.333_333).abs() < 1e-4);
        assert_eq!(stats.pending, 2);
    }
}
