use crate::{
    client::ApiClient,
    dto::orders::{OrderActionResult, OrderList, OrderSummary},
    error::{AppError, AppResult},
    middleware::auth::{Session, ensure_staff},
    models::Order,
    pricing::order_total,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
};

pub async fn list_orders(
    api: &ApiClient,
    session: &Session,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_staff(session)?;
    let (page, per_page) = query.pagination().normalize();
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let upstream = api
        .with_token(session.token.clone())
        .list_orders(page - 1, per_page, &format!("orderDate,{}", sort_order.as_param()))
        .await?;

    let total = upstream
        .total_elements
        .unwrap_or(upstream.content.len() as i64);
    let items = upstream.content.iter().map(order_summary).collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub fn order_summary(order: &Order) -> OrderSummary {
    let total = if order.order_details.is_empty() {
        None
    } else {
        Some(order_total(&order.order_details, order.freight))
    };

    OrderSummary {
        order_id: order.order_id,
        customer_name: order.customer.as_ref().and_then(|c| c.name.clone()),
        employee_name: order
            .employee
            .as_ref()
            .map(|e| e.display_name())
            .filter(|name| !name.is_empty()),
        order_date: order.order_date,
        status: order.status(),
        freight: order.freight,
        total,
    }
}

/// Approve on behalf of the employee behind the session; the upstream owns the transition rules.
pub async fn approve_order(
    api: &ApiClient,
    session: &Session,
    order_id: i64,
) -> AppResult<ApiResponse<OrderActionResult>> {
    ensure_staff(session)?;
    let api = api.with_token(session.token.clone());

    // Orders record the approver by employee id, not by login account.
    let Some(employee) = api.find_employee_by_account(session.account_id).await? else {
        tracing::warn!(order_id, account_id = session.account_id, "no employee record for account");
        return Err(AppError::Forbidden);
    };
    let order = api.approve_order(order_id, employee.employee_id).await?;
    tracing::info!(
        order_id,
        account_id = session.account_id,
        employee_id = employee.employee_id,
        "order approved"
    );

    let status = order.status();
    Ok(ApiResponse::success(
        "Order approved",
        OrderActionResult { order, status },
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(
    api: &ApiClient,
    session: &Session,
    order_id: i64,
) -> AppResult<ApiResponse<OrderActionResult>> {
    ensure_staff(session)?;
    let order = api
        .with_token(session.token.clone())
        .cancel_order(order_id)
        .await?;
    tracing::info!(order_id, account_id = session.account_id, "order cancelled");

    let status = order.status();
    Ok(ApiResponse::success(
        "Order cancelled",
        OrderActionResult { order, status },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[test]
    fn summary_total_needs_embedded_lines() {
        let bare: Order = serde_json::from_value(serde_json::json!({
            "orderID": 1, "freight": 3000
        }))
        .unwrap();
        assert_eq!(order_summary(&bare).total, None);
        assert_eq!(order_summary(&bare).status, OrderStatus::Pending);

        let with_lines: Order = serde_json::from_value(serde_json::json!({
            "orderID": 2,
            "freight": 5000,
            "orderDetails": [{ "productID": 1, "unitPrice": 10000, "quantity": 2, "discount": 0.1 }]
        }))
        .unwrap();
        let total = order_summary(&with_lines).total.unwrap();
        assert!((total - 23000.0).abs() < 1e-6);
    }
}
