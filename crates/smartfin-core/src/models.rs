//! Domain models for SmartFin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerRecord, RawAmount, RawDate, TransactionKind};

/// A registered account. The password hash never leaves the database layer
/// in serialized form.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub business_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The slice of account data the notification rules may read.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            business_name: self.business_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Account facts consumed by the notification rules (welcome window,
/// personalized messages). Deliberately smaller than [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub business_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A money movement recorded directly by the user or by a sale.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub description: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn to_ledger_record(&self) -> LedgerRecord {
        LedgerRecord {
            amount: RawAmount::Number(self.amount),
            kind: self.kind,
            category: self.category.clone(),
            date: Some(RawDate::from(self.date)),
            description: self.description.clone(),
        }
    }
}

/// Validated input for creating a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: Option<String>,
    pub amount: f64,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub date: DateTime<Utc>,
}

/// An expense entity. Expenses live in their own collection; they have no
/// kind column because the collection itself marks them as money out.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Project into the shared ledger shape. The kind is forced to expense
    /// so an uncategorized expense still counts as money out.
    pub fn to_ledger_record(&self) -> LedgerRecord {
        LedgerRecord {
            amount: RawAmount::Number(self.amount),
            kind: Some(TransactionKind::Expense),
            category: self.category.clone(),
            date: Some(RawDate::from(self.date)),
            description: self.description.clone(),
        }
    }
}

/// Validated input for creating an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: Option<String>,
    pub amount: f64,
    pub category: Option<String>,
    pub date: DateTime<Utc>,
}

/// A catalog item sold at the point of sale.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: Option<String>,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: i64,
}

/// Whether a contact buys from the business or sells to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Customer,
    Supplier,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

impl std::str::FromStr for ContactKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "supplier" | "vendor" => Ok(Self::Supplier),
            _ => Err(format!("Unknown contact kind: {}", s)),
        }
    }
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer or supplier in the address book.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub kind: ContactKind,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a contact.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub kind: ContactKind,
    pub notes: Option<String>,
}

/// One line of a requested checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// A requested point-of-sale checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub contact_id: Option<i64>,
    pub items: Vec<SaleLine>,
}

/// A completed checkout. `transaction_id` points at the income transaction
/// the sale produced, so reports and receipts stay linked.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    pub id: i64,
    pub user_id: i64,
    pub reference: String,
    pub contact_id: Option<i64>,
    pub total: f64,
    pub transaction_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One line of a completed sale, with the product name joined in for
/// receipt display.
#[derive(Debug, Clone, Serialize)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}
