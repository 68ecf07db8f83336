use std::{sync::Arc, time::Duration};

use crate::{client::ApiClient, config::AppConfig, inflight::InFlight};

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub jwt_secret: Arc<str>,
    pub in_flight: InFlight,
}

impl AppState {
    pub fn new(api: ApiClient, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            api,
            jwt_secret: jwt_secret.into(),
            in_flight: InFlight::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let api = ApiClient::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.upstream_timeout_secs),
        )?;
        Ok(Self::new(api, config.jwt_secret.as_str()))
    }
}
