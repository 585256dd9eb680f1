//! Normalization of Printavo node shapes into canonical records.

use std::str::FromStr;

use printavo_agent_core::{Customer, Order, Status};
use rust_decimal::Decimal;

use super::UpstreamError;
use super::queries::{RawTotal, StatusNode, get_order_by_visual_id, search_orders};

const TOTAL_FIELD: &str = "order total";

// =============================================================================
// Helper functions
// =============================================================================

pub fn convert_status(status: StatusNode) -> Status {
    Status {
        id: status.id,
        name: status.name,
        color: status.color,
    }
}

/// Parse an upstream total. Missing or blank totals are zero.
pub fn normalize_total(total: Option<RawTotal>) -> Result<Decimal, UpstreamError> {
    let raw = match total {
        None => return Ok(Decimal::ZERO),
        Some(RawTotal::Number(n)) => n.to_string(),
        Some(RawTotal::Text(s)) => s,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| UpstreamError::Normalize {
            field: TOTAL_FIELD,
            value: raw.clone(),
        })
}

// =============================================================================
// SearchOrders conversions
// =============================================================================

pub fn order_from_listing(node: search_orders::OrderNode) -> Result<Order, UpstreamError> {
    Ok(Order {
        total: normalize_total(node.total)?,
        id: node.id,
        name: node.name,
        visual_id: node.visual_id,
        created_at: node.created_at,
        status: convert_status(node.status),
        customer: Customer {
            id: node.customer.id,
            name: node.customer.name,
            email: node.customer.email,
        },
    })
}

// =============================================================================
// GetOrderByVisualId conversions
// =============================================================================

/// Invoices carry a `contact` with `fullName`; it becomes the order's customer.
pub fn order_from_invoice(node: get_order_by_visual_id::InvoiceNode) -> Result<Order, UpstreamError> {
    Ok(Order {
        total: normalize_total(node.total)?,
        id: node.id,
        name: node.name,
        visual_id: node.visual_id,
        created_at: node.created_at,
        status: convert_status(node.status),
        customer: Customer {
            id: node.contact.id,
            name: node.contact.full_name,
            email: node.contact.email,
        },
    })
}
