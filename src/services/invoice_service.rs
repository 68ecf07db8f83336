use crate::{
    client::ApiClient,
    dto::invoices::{InvoiceLine, InvoiceParty, InvoiceView, ShippingBlock},
    error::{AppError, AppResult},
    middleware::auth::Session,
    models::{Customer, Employee, Order, OrderDetail},
    pricing::{detail_total, format_vnd, order_subtotal, order_total},
    services::statistics_service::invoice_label,
};

/// Fetch the order and then its lines, and assemble the printable invoice.
///
/// The detail fetch only starts once the order is known to exist and to be
/// visible to `session`.
pub async fn build_invoice(api: &ApiClient, session: &Session, order_id: i64) -> AppResult<InvoiceView> {
    let api = api.with_token(session.token.clone());

    let order = api.get_order(order_id).await?;
    ensure_can_view(session, &order)?;

    let details = if order.order_details.is_empty() {
        api.get_order_details(order_id).await?
    } else {
        order.order_details.clone()
    };

    tracing::debug!(order_id, lines = details.len(), "invoice assembled");
    Ok(assemble_invoice(&order, &details))
}

/// Staff see every invoice; customers only their own.
pub fn ensure_can_view(session: &Session, order: &Order) -> AppResult<()> {
    if session.is_staff() {
        return Ok(());
    }
    let owner = order.customer.as_ref().and_then(|c| c.account_id);
    if owner == Some(session.account_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn assemble_invoice(order: &Order, details: &[OrderDetail]) -> InvoiceView {
    let lines = details.iter().map(invoice_line).collect();
    let subtotal = order_subtotal(details);
    let total = order_total(details, order.freight);

    InvoiceView {
        order_id: order.order_id,
        invoice_label: invoice_label(order.order_id),
        status: order.status(),
        order_date: order.order_date,
        customer: order.customer.as_ref().map(customer_party),
        employee: order.employee.as_ref().map(employee_party),
        shipping: ShippingBlock {
            name: order.ship_name.clone(),
            address: join_address(order),
            shipped_date: order.shipped_date,
        },
        notes: order.notes.clone(),
        lines,
        subtotal,
        freight: order.freight,
        total,
        total_display: format_vnd(total),
    }
}

fn invoice_line(detail: &OrderDetail) -> InvoiceLine {
    let product = detail.product.as_ref();
    InvoiceLine {
        product_id: detail.product_id,
        product_name: product
            .and_then(|p| p.product_name.clone())
            .unwrap_or_else(|| format!("#{}", detail.product_id)),
        unit: product.and_then(|p| p.quantity_per_unit.clone()),
        image_url: product.and_then(|p| p.images.iter().find_map(|img| img.image_url.clone())),
        unit_price: detail.unit_price,
        quantity: detail.quantity,
        discount: detail.discount,
        line_total: detail_total(detail),
    }
}

fn customer_party(customer: &Customer) -> InvoiceParty {
    InvoiceParty {
        id: customer.customer_id,
        name: customer
            .name
            .clone()
            .unwrap_or_else(|| format!("#{}", customer.customer_id)),
        phone: customer.phone.clone(),
        email: customer.email.clone(),
        address: customer.address.clone(),
    }
}

fn employee_party(employee: &Employee) -> InvoiceParty {
    let name = employee.display_name();
    InvoiceParty {
        id: employee.employee_id,
        name: if name.is_empty() {
            format!("#{}", employee.employee_id)
        } else {
            name
        },
        phone: None,
        email: None,
        address: None,
    }
}

fn join_address(order: &Order) -> String {
    [
        &order.ship_address,
        &order.ship_city,
        &order.ship_region,
        &order.ship_postal_code,
        &order.ship_country,
    ]
    .into_iter()
    .filter_map(|part| part.as_deref().map(str::trim))
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}
