use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::statistics::{StatisticsQuery, StatisticsView},
    error::{AppError, AppResult},
    export::{render_bar_chart, statistics_workbook},
    inflight::View,
    middleware::auth::Session,
    response::{ApiResponse, Meta},
    services::statistics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_statistics))
        .route("/chart.png", get(get_statistics_chart))
        .route("/export", get(export_statistics))
}

#[utoipa::path(
    get,
    path = "/api/statistics",
    params(
        ("month" = Option<String>, Query, description = "m/yyyy, or TatCa for every month"),
        ("order" = Option<String>, Query, description = "Month bucket order: chronological (default), first_seen")
    ),
    responses(
        (status = 200, description = "Approved-order revenue series", body = ApiResponse<StatisticsView>),
        (status = 400, description = "Invalid month filter"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Superseded by a newer request"),
        (status = 502, description = "Upstream failure"),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn get_statistics(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Json<ApiResponse<StatisticsView>>> {
    let view = state
        .in_flight
        .run_latest(
            session.account_id,
            View::Statistics,
            statistics_service::load_statistics(&state.api, &session, &query),
        )
        .await?;
    let meta = Meta::total(view.rows.len());
    Ok(Json(ApiResponse::success("Statistics", view, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/statistics/chart.png",
    params(
        ("month" = Option<String>, Query, description = "m/yyyy, or TatCa for every month"),
        ("order" = Option<String>, Query, description = "Month bucket order")
    ),
    responses(
        (status = 200, description = "Bar chart raster", content_type = "image/png"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn get_statistics_chart(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Response> {
    let png = state
        .in_flight
        .run_latest(session.account_id, View::StatisticsChart, async {
            let view = statistics_service::load_statistics(&state.api, &session, &query).await?;
            Ok::<_, AppError>(render_bar_chart(&view.series)?)
        })
        .await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

#[utoipa::path(
    get,
    path = "/api/statistics/export",
    params(
        ("month" = Option<String>, Query, description = "m/yyyy, or TatCa for every month"),
        ("order" = Option<String>, Query, description = "Month bucket order")
    ),
    responses(
        (status = 200, description = "Statistics workbook with embedded chart",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Statistics"
)]
pub async fn export_statistics(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<StatisticsQuery>,
) -> AppResult<Response> {
    let file = state
        .in_flight
        .run_latest(session.account_id, View::StatisticsExport, async {
            let view = statistics_service::load_statistics(&state.api, &session, &query).await?;
            Ok::<_, AppError>(statistics_workbook(&view)?)
        })
        .await?;
    tracing::info!(
        account_id = session.account_id,
        filename = %file.filename,
        bytes = file.bytes.len(),
        "statistics exported"
    );
    Ok(super::attachment(file))
}
