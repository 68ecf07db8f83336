//! HTTP client for the farm-supply REST API.

pub mod error;

pub use error::{ClientError, ClientResult};

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::{Employee, ListPayload, Order, OrderDetail, Page, StatisticsReport};

/// Client for the upstream API. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Copy of this client that forwards `token` as a bearer credential.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(request).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!(%status, path = %url, body = %body, "upstream request failed");
            return match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(url)),
                _ => Err(ClientError::Rejected { status, body }),
            };
        }

        // Read the body first so a shape mismatch surfaces as Malformed rather than Transport.
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            tracing::warn!(error = %err, path = %url, "upstream payload did not match");
            ClientError::Malformed(err)
        })
    }

    pub async fn get_order(&self, order_id: i64) -> ClientResult<Order> {
        let request = self.client.get(self.url(&format!("orders/{order_id}")));
        self.send(request).await
    }

    pub async fn get_order_details(&self, order_id: i64) -> ClientResult<Vec<OrderDetail>> {
        let request = self
            .client
            .get(self.url("orderdetails"))
            .query(&[("orderID", order_id)]);
        let payload: ListPayload<OrderDetail> = self.send(request).await?;
        Ok(payload.into_items())
    }

    /// `page` is zero-based, as the upstream expects.
    pub async fn list_orders(&self, page: i64, size: i64, sort: &str) -> ClientResult<Page<Order>> {
        let request = self.client.get(self.url("orders")).query(&[
            ("page", page.to_string()),
            ("size", size.to_string()),
            ("sort", sort.to_string()),
        ]);
        self.send(request).await
    }

    /// Approved-order report; `account_id` narrows it to one employee.
    pub async fn get_statistics(&self, account_id: Option<i64>) -> ClientResult<StatisticsReport> {
        let mut request = self.client.get(self.url("orders/statistics"));
        if let Some(account_id) = account_id {
            request = request.query(&[("accountID", account_id)]);
        }
        self.send(request).await
    }

    /// Employee record linked to a login account, if there is one.
    pub async fn find_employee_by_account(&self, account_id: i64) -> ClientResult<Option<Employee>> {
        let request = self
            .client
            .get(self.url("employees"))
            .query(&[("accountID", account_id)]);
        let payload: ListPayload<Employee> = self.send(request).await?;
        Ok(payload
            .into_items()
            .into_iter()
            .find(|employee| employee.account_id == Some(account_id)))
    }

    pub async fn approve_order(&self, order_id: i64, employee_id: i64) -> ClientResult<Order> {
        let request = self
            .client
            .put(self.url(&format!("orders/{order_id}/approve")))
            .query(&[("employeeID", employee_id)]);
        self.send(request).await
    }

    pub async fn cancel_order(&self, order_id: i64) -> ClientResult<Order> {
        let request = self.client.put(self.url(&format!("orders/{order_id}/cancel")));
        self.send(request).await
    }
}
