use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::OrderStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BucketOrder {
    /// Month buckets sorted by (year, month).
    #[default]
    Chronological,
    /// Month buckets in the order their first order appears upstream.
    FirstSeen,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatisticsQuery {
    /// `3/2025`, `03/2025`; empty, `all` or `TatCa` for every month.
    pub month: Option<String>,
    pub order: Option<BucketOrder>,
}

/// Parallel label/value series ready for a bar chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatisticsView {
    /// `TatCa` or the normalized `m/yyyy` filter.
    pub month: String,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub filtered_orders: usize,
    pub filtered_revenue: f64,
    pub series: ChartSeries,
    pub rows: Vec<OrderStats>,
}
