use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Done,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeTag {
    #[default]
    #[serde(rename = "")]
    None,
    Today,
    Week,
    Month,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub detail: String,
    pub status: Status,
    pub time_tag: TimeTag,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::InProgress,
        Status::Done,
        Status::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Done => "done",
            Status::Closed => "closed",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Status::Pending => "○",
            Status::InProgress => "◐",
            Status::Done => "●",
            Status::Closed => "✕",
        }
    }

    /// Sort ordinal used by the store: in-progress work first, closed last.
    pub fn rank(self) -> u8 {
        match self {
            Status::InProgress => 1,
            Status::Pending => 2,
            Status::Done => 3,
            Status::Closed => 4,
        }
    }

    /// Cycle-forward. A closed task re-enters the cycle as pending.
    pub fn next(self) -> Status {
        match self {
            Status::Pending => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::Pending,
            Status::Closed => Status::Pending,
        }
    }

    pub fn toggle_closed(self) -> Status {
        match self {
            Status::Closed => Status::Pending,
            Status::Pending | Status::InProgress | Status::Done => Status::Closed,
        }
    }

    pub fn is_closed(self) -> bool {
        self == Status::Closed
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "in_progress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            "closed" => Ok(Status::Closed),
            other => Err(ParseEnumError {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

impl TimeTag {
    /// The values the session cycles through with the filter key
    pub const FILTERS: [TimeTag; 3] = [TimeTag::Today, TimeTag::Week, TimeTag::Month];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeTag::None => "",
            TimeTag::Today => "today",
            TimeTag::Week => "week",
            TimeTag::Month => "month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeTag::None => "",
            TimeTag::Today => "today",
            TimeTag::Week => "this week",
            TimeTag::Month => "this month",
        }
    }

    pub fn next_filter(self) -> TimeTag {
        match self {
            TimeTag::Today => TimeTag::Week,
            TimeTag::Week => TimeTag::Month,
            TimeTag::Month => TimeTag::Today,
            TimeTag::None => TimeTag::Today,
        }
    }
}

impl fmt::Display for TimeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeTag {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(TimeTag::None),
            "today" => Ok(TimeTag::Today),
            "week" => Ok(TimeTag::Week),
            "month" => Ok(TimeTag::Month),
            other => Err(ParseEnumError {
                kind: "time tag",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_through_open_statuses() {
        assert_eq!(Status::Pending.next(), Status::InProgress);
        assert_eq!(Status::InProgress.next(), Status::Done);
        assert_eq!(Status::Done.next(), Status::Pending);
    }

    #[test]
    fn test_next_reopens_closed() {
        assert_eq!(Status::Closed.next(), Status::Pending);
    }

    #[test]
    fn test_three_steps_return_to_pending() {
        let status = Status::Pending.next().next().next();
        assert_eq!(status, Status::Pending);
    }

    #[test]
    fn test_toggle_closed_round_trip() {
        assert_eq!(Status::Pending.toggle_closed(), Status::Closed);
        assert_eq!(Status::Closed.toggle_closed(), Status::Pending);
        assert_eq!(Status::Pending.toggle_closed().toggle_closed(), Status::Pending);
        assert_eq!(Status::Closed.toggle_closed().toggle_closed(), Status::Closed);
    }

    #[test]
    fn test_toggle_closed_from_active_statuses() {
        // Reopening always lands on pending
        assert_eq!(Status::InProgress.toggle_closed(), Status::Closed);
        assert_eq!(Status::Done.toggle_closed().toggle_closed(), Status::Pending);
    }

    #[test]
    fn test_rank_order() {
        let mut statuses = Status::ALL.to_vec();
        statuses.sort_by_key(|s| s.rank());
        assert_eq!(
            statuses,
            vec![Status::InProgress, Status::Pending, Status::Done, Status::Closed]
        );
    }

    #[test]
    fn test_icons() {
        assert_eq!(Status::Pending.icon(), "○");
        assert_eq!(Status::InProgress.icon(), "◐");
        assert_eq!(Status::Done.icon(), "●");
        assert_eq!(Status::Closed.icon(), "✕");
    }

    #[test]
    fn test_status_parse() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn test_time_tag_parse() {
        assert_eq!("".parse::<TimeTag>(), Ok(TimeTag::None));
        assert_eq!("none".parse::<TimeTag>(), Ok(TimeTag::None));
        assert_eq!("week".parse::<TimeTag>(), Ok(TimeTag::Week));
        let err = "year".parse::<TimeTag>().unwrap_err();
        assert_eq!(err.to_string(), "unknown time tag 'year'");
    }

    #[test]
    fn test_filter_cycle_wraps() {
        assert_eq!(TimeTag::Today.next_filter(), TimeTag::Week);
        assert_eq!(TimeTag::Week.next_filter(), TimeTag::Month);
        assert_eq!(TimeTag::Month.next_filter(), TimeTag::Today);
        assert_eq!(TimeTag::None.next_filter(), TimeTag::Today);
    }

    #[test]
    fn test_labels() {
        assert_eq!(TimeTag::Today.label(), "today");
        assert_eq!(TimeTag::Week.label(), "this week");
        assert_eq!(TimeTag::Month.label(), "this month");
    }

    #[test]
    fn test_serialize_spelling() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in_progress\"");
        assert_eq!(serde_json::to_string(&TimeTag::None).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&TimeTag::Month).unwrap(), "\"month\"");
    }
}
