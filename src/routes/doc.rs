use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        invoices::{InvoiceLine, InvoiceParty, InvoiceView, ShippingBlock},
        orders::{OrderActionResult, OrderList, OrderSummary},
        statistics::{BucketOrder, ChartSeries, StatisticsView},
    },
    models::{Customer, Employee, Order, OrderDetail, OrderStats, OrderStatus, Product, ProductImage},
    response::{ApiResponse, Meta},
    routes::{health, invoices, orders, params, statistics},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::list_orders,
        orders::approve_order,
        orders::cancel_order,
        invoices::get_invoice,
        invoices::export_invoice,
        statistics::get_statistics,
        statistics::get_statistics_chart,
        statistics::export_statistics
    ),
    components(
        schemas(
            Customer,
            Employee,
            Product,
            ProductImage,
            Order,
            OrderDetail,
            OrderStats,
            OrderStatus,
            OrderSummary,
            OrderList,
            OrderActionResult,
            InvoiceParty,
            InvoiceLine,
            ShippingBlock,
            InvoiceView,
            BucketOrder,
            ChartSeries,
            StatisticsView,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            Meta,
            ApiResponse<OrderList>,
            ApiResponse<OrderActionResult>,
            ApiResponse<InvoiceView>,
            ApiResponse<StatisticsView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order listing and approval"),
        (name = "Invoices", description = "Invoice views and workbook export"),
        (name = "Statistics", description = "Revenue statistics, chart and export"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
