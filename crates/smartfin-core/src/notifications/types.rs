//! Notification types produced by the rule engine.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alert,
    Insight,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Insight => "insight",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display ordering: high sorts before medium sorts before low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    High,
    Medium,
    Low,
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort key for display ordering (lower is more important).
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl FromStr for NotificationPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable identifiers for everything the engine can emit.
///
/// Clients key read/dismissed state on these strings, so the set is fixed
/// and the spellings never change. Kind and priority are properties of the
/// id, which keeps repeated generation deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationId {
    LowBalance,
    ExpenseIncrease,
    ExpenseDecrease,
    TopCategory,
    TrackIncome,
    TaxReminder,
    Welcome,
    GetStarted,
    ExploreReports,
}

impl NotificationId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowBalance => "low-balance",
            Self::ExpenseIncrease => "expense-increase",
            Self::ExpenseDecrease => "expense-decrease",
            Self::TopCategory => "top-category",
            Self::TrackIncome => "track-income",
            Self::TaxReminder => "tax-reminder",
            Self::Welcome => "welcome",
            Self::GetStarted => "get-started",
            Self::ExploreReports => "explore-reports",
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::LowBalance => NotificationKind::Alert,
            Self::ExpenseIncrease | Self::TopCategory => NotificationKind::Insight,
            Self::ExpenseDecrease
            | Self::TrackIncome
            | Self::TaxReminder
            | Self::Welcome
            | Self::GetStarted
            | Self::ExploreReports => NotificationKind::Info,
        }
    }

    pub fn priority(&self) -> NotificationPriority {
        match self {
            Self::LowBalance | Self::Welcome => NotificationPriority::High,
            Self::ExpenseIncrease
            | Self::ExpenseDecrease
            | Self::TrackIncome
            | Self::GetStarted => NotificationPriority::Medium,
            Self::TopCategory | Self::TaxReminder | Self::ExploreReports => {
                NotificationPriority::Low
            }
        }
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A generated notification. Never persisted; derived fresh on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Build a notification; kind and priority are derived from the id.
    pub fn new(id: NotificationId, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Notification {
            id,
            message: message.into(),
            kind: id.kind(),
            priority: id.priority(),
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_serialize_kebab_case() {
        let json = serde_json::to_string(&NotificationId::LowBalance).unwrap();
        assert_eq!(json, "\"low-balance\"");
        let json = serde_json::to_string(&NotificationId::GetStarted).unwrap();
        assert_eq!(json, "\"get-started\"");
    }

    #[test]
    fn test_notification_wire_shape() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let n = Notification::new(NotificationId::LowBalance, "balance is negative", now);
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["id"], "low-balance");
        assert_eq!(value["type"], "alert");
        assert_eq!(value["priority"], "high");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_priority_ranks_order() {
        assert!(NotificationPriority::High.rank() < NotificationPriority::Medium.rank());
        assert!(NotificationPriority::Medium.rank() < NotificationPriority::Low.rank());
    }
}
