use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: i64,
    pub customer_name: Option<String>,
    pub employee_name: Option<String>,
    pub order_date: Option<NaiveDateTime>,
    pub status: OrderStatus,
    pub freight: f64,
    /// Only known when the upstream embeds the order lines.
    pub total: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderActionResult {
    pub order: Order,
    pub status: OrderStatus,
}
