#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use agri_backoffice::{
    client::ApiClient,
    middleware::auth::Claims,
    routes::create_app,
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

pub const SECRET: &str = "test-secret";

/// Query strings the fake upstream received, keyed by route.
#[derive(Clone, Default)]
pub struct Recorded {
    pub calls: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

impl Recorded {
    fn push(&self, route: &str, query: HashMap<String, String>) {
        self.calls.lock().unwrap().push((route.to_string(), query));
    }

    pub fn routes(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn last_query(&self, route: &str) -> Option<HashMap<String, String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(r, _)| r == route)
            .map(|(_, q)| q.clone())
    }
}

pub fn order_102() -> Value {
    json!({
        "orderID": 102,
        "customerID": 8,
        "employeeID": 2,
        "orderDate": "2025-03-20T08:30:00",
        "shipName": "Nguyen An",
        "shipAddress": "12 Le Loi",
        "shipCity": "Can Tho",
        "freight": 5000,
        "cancelled": false,
        "customer": { "customerID": 8, "customerName": "Nguyen An", "accountID": 31 },
        "employee": { "employeeID": 2, "firstName": "Binh", "lastName": "Tran" }
    })
}

pub fn statistics_report() -> Value {
    json!({
        "totalOrders": 4,
        "totalRevenue": 350000,
        "orders": [
            { "orderID": 101, "orderDate": "2025-03-05", "totalPrice": 100000, "employeeID": 2, "employeeName": "Tran Binh" },
            { "orderID": 102, "orderDate": "2025-03-20", "totalPrice": 50000, "employeeID": 2, "employeeName": "Tran Binh" },
            { "orderID": 103, "orderDate": "2025-04-02", "totalPrice": 200000, "employeeID": 3, "employeeName": "Le Chi" },
            { "orderID": 104, "orderDate": "2025-04-09", "totalPrice": 999, "employeeID": null, "employeeName": null }
        ]
    })
}

async fn get_order(State(rec): State<Recorded>, Path(id): Path<i64>) -> impl IntoResponse {
    rec.push("get_order", HashMap::from([("id".to_string(), id.to_string())]));
    match id {
        102 => (StatusCode::OK, Json(order_102())),
        13 => (StatusCode::OK, Json(json!({ "unexpected": true }))),
        500 => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "no such order" }))),
    }
}

async fn get_details(
    State(rec): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.push("get_details", query.clone());
    if query.get("orderID").map(String::as_str) == Some("102") {
        Json(json!({
            "content": [
                {
                    "orderDetailID": 1,
                    "orderID": 102,
                    "productID": 4,
                    "unitPrice": 10000,
                    "quantity": 2,
                    "discount": 0.1,
                    "product": {
                        "productID": 4,
                        "productName": "Phan NPK 20-20-15",
                        "quantityPerUnit": "bao 25kg",
                        "images": [{ "imageUrl": "/img/npk.png" }]
                    }
                }
            ],
            "totalElements": 1
        }))
    } else {
        Json(json!([]))
    }
}

async fn list_orders(
    State(rec): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.push("list_orders", query);
    Json(json!({
        "content": [order_102(), { "orderID": 105, "freight": 0 }],
        "totalElements": 42,
        "totalPages": 3,
        "number": 0,
        "size": 20
    }))
}

async fn statistics(
    State(rec): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.push("statistics", query);
    Json(statistics_report())
}

async fn employees(
    State(rec): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let account = query.get("accountID").cloned();
    rec.push("employees", query);
    match account.as_deref() {
        Some("31") => Json(json!([
            { "employeeID": 2, "firstName": "Binh", "lastName": "Tran", "accountID": 31 }
        ])),
        _ => Json(json!([])),
    }
}

async fn approve(
    State(rec): State<Recorded>,
    Path(id): Path<i64>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let employee: i64 = query
        .get("employeeID")
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    rec.push("approve", query);
    Json(json!({ "orderID": id, "employeeID": employee, "freight": 0 }))
}

async fn cancel(State(rec): State<Recorded>, Path(id): Path<i64>) -> Json<Value> {
    rec.push("cancel", HashMap::new());
    Json(json!({ "orderID": id, "cancelled": true }))
}

/// Serve a fake farm-supply API on an ephemeral port and return its base URL.
pub async fn spawn_upstream() -> (String, Recorded) {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/statistics", get(statistics))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/approve", put(approve))
        .route("/orders/{id}/cancel", put(cancel))
        .route("/orderdetails", get(get_details))
        .route("/employees", get(employees))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), recorded)
}

pub fn api_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

pub fn app(base_url: &str) -> Router {
    create_app(AppState::new(api_client(base_url), SECRET))
}

pub fn token(account_id: i64, role: &str) -> String {
    let claims = Claims {
        sub: account_id.to_string(),
        role: role.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}
