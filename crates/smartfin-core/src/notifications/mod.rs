//! Rule-driven notifications derived from ledger aggregates.
//!
//! Notifications are never persisted: every read recomputes them from the
//! current aggregates, so dismissal and freshness are client concerns keyed
//! on the stable ids in [`types::NotificationId`].

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::NotificationEngine;
pub use rules::{NotificationRule, RuleContext};
pub use types::{Notification, NotificationId, NotificationKind, NotificationPriority};
