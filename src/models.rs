//! Records mirrored from the farm-supply REST API.
//!
//! Field names follow the upstream JSON (`orderID`, `unitPrice`, ...). Every
//! field the backend may omit is optional or defaulted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    #[serde(rename = "customerID")]
    pub customer_id: i64,
    #[serde(default, alias = "customerName", alias = "companyName", alias = "fullName")]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "accountID")]
    pub account_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    #[serde(rename = "employeeID")]
    pub employee_id: i64,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "accountID")]
    pub account_id: Option<i64>,
}

impl Employee {
    /// "Last First" as printed on invoices; blank parts are skipped.
    pub fn display_name(&self) -> String {
        [self.last_name.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    #[serde(default, rename = "imageUrl", alias = "imageURL", alias = "url")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "productID")]
    pub product_id: i64,
    #[serde(default, rename = "productName")]
    pub product_name: Option<String>,
    #[serde(default, rename = "quantityPerUnit")]
    pub quantity_per_unit: Option<String>,
    #[serde(default, rename = "unitPrice")]
    pub unit_price: Option<f64>,
    #[serde(default, alias = "productImages")]
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    #[serde(default, rename = "orderDetailID")]
    pub order_detail_id: Option<i64>,
    #[serde(default, rename = "orderID")]
    pub order_id: Option<i64>,
    #[serde(rename = "productID")]
    pub product_id: i64,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    #[serde(default, rename = "customerID")]
    pub customer_id: Option<i64>,
    /// `None` until an employee approves the order.
    #[serde(default, rename = "employeeID")]
    pub employee_id: Option<i64>,
    #[serde(default, rename = "orderDate", deserialize_with = "flexible_datetime")]
    pub order_date: Option<NaiveDateTime>,
    #[serde(default, rename = "shippedDate", deserialize_with = "flexible_datetime")]
    pub shipped_date: Option<NaiveDateTime>,
    #[serde(default, rename = "shipName")]
    pub ship_name: Option<String>,
    #[serde(default, rename = "shipAddress")]
    pub ship_address: Option<String>,
    #[serde(default, rename = "shipCity")]
    pub ship_city: Option<String>,
    #[serde(default, rename = "shipRegion")]
    pub ship_region: Option<String>,
    #[serde(default, rename = "shipPostalCode")]
    pub ship_postal_code: Option<String>,
    #[serde(default, rename = "shipCountry")]
    pub ship_country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub freight: f64,
    #[serde(default, alias = "isCancelled", deserialize_with = "null_as_false")]
    pub cancelled: bool,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub employee: Option<Employee>,
    #[serde(default, rename = "orderDetails", alias = "details")]
    pub order_details: Vec<OrderDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    Cancelled,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        if self.cancelled {
            OrderStatus::Cancelled
        } else if self.employee_id.is_some() {
            OrderStatus::Approved
        } else {
            OrderStatus::Pending
        }
    }
}

/// Flattened reporting row served by `/orders/statistics`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStats {
    #[serde(rename = "orderID")]
    pub order_id: i64,
    #[serde(default, rename = "orderDate", deserialize_with = "flexible_datetime")]
    pub order_date: Option<NaiveDateTime>,
    #[serde(default, rename = "totalPrice", deserialize_with = "null_as_zero")]
    pub total_price: f64,
    #[serde(default, rename = "employeeID")]
    pub employee_id: Option<i64>,
    #[serde(default, rename = "employeeName")]
    pub employee_name: Option<String>,
}

impl OrderStats {
    pub fn is_approved(&self) -> bool {
        self.employee_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsReport {
    #[serde(default, rename = "totalOrders")]
    pub total_orders: i64,
    #[serde(default, rename = "totalRevenue", deserialize_with = "null_as_zero")]
    pub total_revenue: f64,
    #[serde(default)]
    pub orders: Vec<OrderStats>,
}

/// Spring-style page envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default, rename = "totalElements")]
    pub total_elements: Option<i64>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<i64>,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub size: Option<i64>,
}

/// Some list endpoints answer with a bare array, others with a page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Paged { content: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Paged { content } => content,
        }
    }
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse the date shapes the backend emits: RFC 3339, naive ISO datetime, or a
/// bare `YYYY-MM-DD` (taken as midnight).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_datetime(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date `{value}`"))),
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_without_employee_is_pending() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "orderID": 7,
            "customerID": 3,
            "employeeID": null,
            "orderDate": "2025-03-05",
            "freight": null
        }))
        .unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.freight, 0.0);
        assert!(order.order_details.is_empty());
        assert_eq!(
            order.order_date.unwrap().date(),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
        );
    }

    #[test]
    fn cancelled_wins_over_approval() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "orderID": 1,
            "employeeID": 4,
            "cancelled": true
        }))
        .unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn list_payload_accepts_both_shapes() {
        let bare: ListPayload<i64> = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(bare.into_items(), vec![1, 2]);
        let paged: ListPayload<i64> =
            serde_json::from_str(r#"{"content":[3],"totalElements":1}"#).unwrap();
        assert_eq!(paged.into_items(), vec![3]);
    }

    #[test]
    fn parses_common_date_shapes() {
        assert!(parse_datetime("2025-03-20T10:15:00").is_some());
        assert!(parse_datetime("2025-03-20T10:15:00.123").is_some());
        assert!(parse_datetime("2025-03-20T10:15:00+07:00").is_some());
        assert!(parse_datetime("2025-03-20 10:15:00").is_some());
        assert!(parse_datetime("20/03/2025").is_none());
    }

    #[test]
    fn employee_display_name_skips_blanks() {
        let employee = Employee {
            employee_id: 1,
            first_name: Some("An".into()),
            last_name: Some(" ".into()),
            title: None,
            account_id: None,
        };
        assert_eq!(employee.display_name(), "An");
    }
}
