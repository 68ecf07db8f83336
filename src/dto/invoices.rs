use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::OrderStatus;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceParty {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShippingBlock {
    pub name: Option<String>,
    /// Address parts joined with ", ", blanks skipped.
    pub address: String,
    pub shipped_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    pub unit_price: f64,
    pub quantity: f64,
    pub discount: f64,
    pub line_total: f64,
}

/// Denormalized invoice: everything needed to print one order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceView {
    pub order_id: i64,
    pub invoice_label: String,
    pub status: OrderStatus,
    pub order_date: Option<NaiveDateTime>,
    pub customer: Option<InvoiceParty>,
    pub employee: Option<InvoiceParty>,
    pub shipping: ShippingBlock,
    pub notes: Option<String>,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: f64,
    pub freight: f64,
    pub total: f64,
    pub total_display: String,
}
