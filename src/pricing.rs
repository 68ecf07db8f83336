//! Order total arithmetic.
//!
//! Every total shown by the service (invoice view, order listing, invoice
//! workbook) goes through these functions. Amounts are plain `f64`: no
//! rounding happens here, only in [`format_vnd`] at display time. Inputs are
//! trusted, so negative quantities or out-of-range discounts flow through
//! unchanged.

use crate::models::OrderDetail;

/// `unit_price * quantity * (1 - discount)`, with `discount` as a fraction.
pub fn line_total(unit_price: f64, quantity: f64, discount: f64) -> f64 {
    unit_price * quantity * (1.0 - discount)
}

pub fn detail_total(detail: &OrderDetail) -> f64 {
    line_total(detail.unit_price, detail.quantity, detail.discount)
}

pub fn order_subtotal(details: &[OrderDetail]) -> f64 {
    details.iter().map(detail_total).sum()
}

/// Line items plus freight. An order with no lines still carries its freight.
pub fn order_total(details: &[OrderDetail], freight: f64) -> f64 {
    order_subtotal(details) + freight
}

/// Whole-unit VND display, e.g. `23.000 ₫`.
pub fn format_vnd(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped} ₫")
    } else {
        format!("{grouped} ₫")
    }
}
