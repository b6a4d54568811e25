//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod chat;
pub mod contacts;
pub mod expenses;
pub mod notifications;
pub mod pos;
pub mod products;
pub mod reports;
pub mod transactions;

// Re-export all handlers for use in router
pub use auth::*;
pub use chat::*;
pub use contacts::*;
pub use expenses::*;
pub use notifications::*;
pub use pos::*;
pub use products::*;
pub use reports::*;
pub use transactions::*;
