//! Canonical order records.
//!
//! Printavo exposes orders through two GraphQL root fields with different node
//! shapes. Both are normalized into these types by the adapter, so nothing
//! downstream needs to know which path produced a record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order (or quote/invoice) in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque Printavo record ID.
    pub id: String,
    /// Order nickname.
    pub name: Option<String>,
    /// Human-facing short identifier (e.g. "1234"), distinct from `id`.
    pub visual_id: String,
    /// ISO 8601 creation timestamp as returned by Printavo.
    pub created_at: String,
    /// Workflow status.
    pub status: Status,
    /// Customer the order belongs to.
    pub customer: Customer,
    /// Order total. Missing upstream totals are zero.
    pub total: Decimal,
}

/// A workflow status.
///
/// Statuses are defined per Printavo account, so this is plain data rather
/// than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    /// Printavo status ID.
    pub id: String,
    /// Display name (e.g. "In Production").
    pub name: String,
    /// Display color (hex string).
    pub color: Option<String>,
}

/// The customer attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Printavo customer or contact ID.
    pub id: String,
    /// Full display name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl Order {
    /// Customer display name, or an empty string when Printavo has none.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        self.customer.name.as_deref().unwrap_or("")
    }
}
