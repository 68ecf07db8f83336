use axum::{
    Json, Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};

use crate::{
    dto::invoices::InvoiceView,
    error::AppResult,
    export::invoice_workbook,
    inflight::View,
    middleware::auth::Session,
    response::{ApiResponse, Meta},
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_invoice))
        .route("/{id}/export", get(export_invoice))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Printable invoice with computed totals", body = ApiResponse<InvoiceView>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found upstream"),
        (status = 409, description = "Superseded by a newer request"),
        (status = 502, description = "Upstream failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<InvoiceView>>> {
    let invoice = state
        .in_flight
        .run_latest(
            session.account_id,
            View::Invoice,
            invoice_service::build_invoice(&state.api, &session, id),
        )
        .await?;
    Ok(Json(ApiResponse::success(
        "Invoice",
        invoice,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}/export",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Invoice workbook",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found upstream"),
    ),
    security(("bearer_auth" = [])),
    tag = "Invoices"
)]
pub async fn export_invoice(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let invoice = invoice_service::build_invoice(&state.api, &session, id).await?;
    let file = invoice_workbook(&invoice)?;
    tracing::info!(order_id = id, filename = %file.filename, "invoice exported");
    Ok(super::attachment(file))
}
