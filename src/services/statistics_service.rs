use chrono::{Datelike, NaiveDateTime};

use crate::{
    client::ApiClient,
    dto::statistics::{BucketOrder, ChartSeries, StatisticsQuery, StatisticsView},
    error::{AppError, AppResult},
    middleware::auth::{Role, Session},
    models::{OrderStats, StatisticsReport},
};

/// Label used for orders the upstream sent without a date.
pub const UNDATED_LABEL: &str = "N/A";
pub const ALL_MONTHS: &str = "TatCa";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Month { month: u32, year: i32 },
}

impl MonthFilter {
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(MonthFilter::All),
            Some(value) if value.eq_ignore_ascii_case("all") || value == ALL_MONTHS => {
                return Ok(MonthFilter::All);
            }
            Some(value) => value,
        };

        let invalid = || AppError::BadRequest(format!("invalid month filter `{raw}`, expected m/yyyy"));
        let (month, year) = raw.split_once(['/', '-']).ok_or_else(invalid)?;
        let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
        let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) || year < 1 {
            return Err(invalid());
        }
        Ok(MonthFilter::Month { month, year })
    }

    /// `TatCa` or `m/yyyy`.
    pub fn label(&self) -> String {
        match self {
            MonthFilter::All => ALL_MONTHS.to_string(),
            MonthFilter::Month { month, year } => month_label(*month, *year),
        }
    }

    pub fn matches(&self, date: Option<NaiveDateTime>) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month { month, year } => {
                date.is_some_and(|d| d.month() == *month && d.year() == *year)
            }
        }
    }
}

pub fn month_label(month: u32, year: i32) -> String {
    format!("{month}/{year}")
}

pub fn invoice_label(order_id: i64) -> String {
    format!("HĐ {order_id}")
}

/// One bucket per calendar month; values are summed `total_price`.
pub fn bucket_by_month(orders: &[OrderStats], order: BucketOrder) -> ChartSeries {
    // (sort key, label, value); None sorts after every dated month.
    let mut buckets: Vec<(Option<(i32, u32)>, String, f64)> = Vec::new();

    for row in orders {
        let key = row.order_date.map(|d| (d.year(), d.month()));
        match buckets.iter_mut().find(|(k, _, _)| *k == key) {
            Some(bucket) => bucket.2 += row.total_price,
            None => {
                let label = match key {
                    Some((year, month)) => month_label(month, year),
                    None => UNDATED_LABEL.to_string(),
                };
                buckets.push((key, label, row.total_price));
            }
        }
    }

    if order == BucketOrder::Chronological {
        // Stable sort keeps first-seen order among equal keys.
        buckets.sort_by_key(|(key, _, _)| (key.is_none(), *key));
    }

    let (labels, values) = buckets
        .into_iter()
        .map(|(_, label, value)| (label, value))
        .unzip();
    ChartSeries { labels, values }
}

/// One bucket per invoice, in upstream order.
pub fn bucket_by_invoice(orders: &[OrderStats]) -> ChartSeries {
    let (labels, values) = orders
        .iter()
        .map(|row| (invoice_label(row.order_id), row.total_price))
        .unzip();
    ChartSeries { labels, values }
}

pub fn aggregate(report: StatisticsReport, filter: MonthFilter, order: BucketOrder) -> StatisticsView {
    let rows: Vec<OrderStats> = report
        .orders
        .into_iter()
        .filter(OrderStats::is_approved)
        .filter(|row| filter.matches(row.order_date))
        .collect();

    let series = match filter {
        MonthFilter::All => bucket_by_month(&rows, order),
        MonthFilter::Month { .. } => bucket_by_invoice(&rows),
    };

    StatisticsView {
        month: filter.label(),
        total_orders: report.total_orders,
        total_revenue: report.total_revenue,
        filtered_orders: rows.len(),
        filtered_revenue: rows.iter().map(|row| row.total_price).sum(),
        series,
        rows,
    }
}

/// Admins see every employee's orders, employees only their own.
pub fn statistics_scope(session: &Session) -> AppResult<Option<i64>> {
    match session.role {
        Role::Admin => Ok(None),
        Role::Employee => Ok(Some(session.account_id)),
        Role::Customer => Err(AppError::Forbidden),
    }
}

pub async fn load_statistics(
    api: &ApiClient,
    session: &Session,
    query: &StatisticsQuery,
) -> AppResult<StatisticsView> {
    let scope = statistics_scope(session)?;
    let filter = MonthFilter::parse(query.month.as_deref())?;
    let order = query.order.unwrap_or_default();

    let report = api
        .with_token(session.token.clone())
        .get_statistics(scope)
        .await?;

    let view = aggregate(report, filter, order);
    tracing::debug!(
        account_id = session.account_id,
        month = %view.month,
        buckets = view.series.len(),
        rows = view.rows.len(),
        "statistics aggregated"
    );
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn stats(order_id: i64, day: u32, month: u32, year: i32, total: f64) -> OrderStats {
        OrderStats {
            order_id,
            order_date: NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(9, 0, 0)),
            total_price: total,
            employee_id: Some(1),
            employee_name: Some("Tran Binh".into()),
        }
    }

    fn report(orders: Vec<OrderStats>) -> StatisticsReport {
        StatisticsReport {
            total_orders: orders.len() as i64,
            total_revenue: orders.iter().map(|o| o.total_price).sum(),
            orders,
        }
    }

    fn march_april() -> Vec<OrderStats> {
        vec![
            stats(101, 5, 3, 2025, 100000.0),
            stats(102, 20, 3, 2025, 50000.0),
            stats(103, 2, 4, 2025, 200000.0),
        ]
    }

    #[test]
    fn all_months_groups_by_month() {
        let view = aggregate(report(march_april()), MonthFilter::All, BucketOrder::FirstSeen);
        assert_eq!(view.series.labels, vec!["3/2025", "4/2025"]);
        assert_eq!(view.series.values, vec![150000.0, 200000.0]);
        assert_eq!(view.month, "TatCa");
    }

    #[test]
    fn single_month_buckets_per_invoice() {
        let filter = MonthFilter::parse(Some("3/2025")).unwrap();
        let view = aggregate(report(march_april()), filter, BucketOrder::default());
        assert_eq!(view.series.labels, vec!["HĐ 101", "HĐ 102"]);
        assert_eq!(view.series.values, vec![100000.0, 50000.0]);
        assert_eq!(view.filtered_orders, 2);
        assert_eq!(view.series.sum(), view.filtered_revenue);
    }

    #[test]
    fn chronological_order_fixes_first_seen_order() {
        let orders = vec![
            stats(1, 1, 4, 2025, 10.0),
            stats(2, 1, 12, 2024, 20.0),
            stats(3, 9, 4, 2025, 5.0),
        ];
        let first_seen = bucket_by_month(&orders, BucketOrder::FirstSeen);
        assert_eq!(first_seen.labels, vec!["4/2025", "12/2024"]);

        let chronological = bucket_by_month(&orders, BucketOrder::Chronological);
        assert_eq!(chronological.labels, vec!["12/2024", "4/2025"]);
        assert_eq!(chronological.values, vec![20.0, 15.0]);
    }

    #[test]
    fn undated_orders_sort_last() {
        let mut orders = vec![stats(1, 1, 2, 2025, 10.0)];
        orders.insert(
            0,
            OrderStats {
                order_date: None,
                ..stats(2, 1, 1, 2025, 7.0)
            },
        );
        let series = bucket_by_month(&orders, BucketOrder::Chronological);
        assert_eq!(series.labels, vec!["2/2025", UNDATED_LABEL]);
    }

    #[test]
    fn unapproved_rows_are_ignored() {
        let mut orders = march_april();
        orders[0].employee_id = None;
        let view = aggregate(report(orders), MonthFilter::All, BucketOrder::default());
        assert_eq!(view.filtered_orders, 2);
        assert_eq!(view.series.values, vec![50000.0, 200000.0]);
    }

    #[test]
    fn empty_report_yields_empty_series() {
        let view = aggregate(report(vec![]), MonthFilter::All, BucketOrder::default());
        assert!(view.series.is_empty());
        assert!(view.rows.is_empty());
        assert_eq!(view.filtered_revenue, 0.0);
    }

    #[test]
    fn bucket_sum_matches_filtered_sum() {
        let view = aggregate(report(march_april()), MonthFilter::All, BucketOrder::default());
        assert_eq!(view.series.sum(), 350000.0);
        assert_eq!(view.filtered_revenue, 350000.0);
    }

    #[test]
    fn parses_month_filters() {
        assert_eq!(MonthFilter::parse(None).unwrap(), MonthFilter::All);
        assert_eq!(MonthFilter::parse(Some(" ")).unwrap(), MonthFilter::All);
        assert_eq!(MonthFilter::parse(Some("TatCa")).unwrap(), MonthFilter::All);
        assert_eq!(
            MonthFilter::parse(Some("03/2025")).unwrap(),
            MonthFilter::Month { month: 3, year: 2025 }
        );
        assert_eq!(MonthFilter::parse(Some("03/2025")).unwrap().label(), "3/2025");
        assert!(MonthFilter::parse(Some("13/2025")).is_err());
        assert!(MonthFilter::parse(Some("march")).is_err());
    }

    #[test]
    fn customers_have_no_statistics_scope() {
        let session = Session {
            account_id: 5,
            role: Role::Customer,
            token: String::new(),
        };
        assert!(matches!(statistics_scope(&session), Err(AppError::Forbidden)));

        let employee = Session {
            role: Role::Employee,
            ..session
        };
        assert_eq!(statistics_scope(&employee).unwrap(), Some(5));
    }

    // (order id, day, month, year, whole-dong total, approved)
    fn arb_rows() -> impl Strategy<Value = Vec<OrderStats>> {
        prop::collection::vec(
            (1i64..10_000, 1u32..=28, 1u32..=12, 2023i32..=2025, 0u32..5_000_000, any::<bool>()),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(id, day, month, year, total, approved)| OrderStats {
                    employee_id: approved.then_some(1),
                    ..stats(id, day, month, year, f64::from(total))
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn one_bucket_per_calendar_month(rows in arb_rows(), first_seen in any::<bool>()) {
            let order = if first_seen { BucketOrder::FirstSeen } else { BucketOrder::Chronological };
            let series = bucket_by_month(&rows, order);

            let months: HashSet<(i32, u32)> = rows
                .iter()
                .filter_map(|row| row.order_date)
                .map(|d| (d.year(), d.month()))
                .collect();
            let labels: HashSet<&String> = series.labels.iter().collect();

            prop_assert_eq!(series.len(), months.len());
            prop_assert_eq!(labels.len(), series.len());
            prop_assert_eq!(series.values.len(), series.labels.len());
        }

        #[test]
        fn chronological_buckets_are_sorted(rows in arb_rows()) {
            let series = bucket_by_month(&rows, BucketOrder::Chronological);
            let keys: Vec<(i32, u32)> = series
                .labels
                .iter()
                .map(|label| {
                    let (month, year) = label.split_once('/').unwrap();
                    (year.parse().unwrap(), month.parse().unwrap())
                })
                .collect();
            prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn bucket_values_sum_to_filtered_revenue(
            rows in arb_rows(),
            month in 1u32..=12,
            year in 2023i32..=2025,
            per_month in any::<bool>(),
        ) {
            let filter = if per_month { MonthFilter::Month { month, year } } else { MonthFilter::All };
            let expected: f64 = rows
                .iter()
                .filter(|row| row.is_approved() && filter.matches(row.order_date))
                .map(|row| row.total_price)
                .sum();

            let view = aggregate(report(rows), filter, BucketOrder::default());

            prop_assert!(view.rows.iter().all(OrderStats::is_approved));
            prop_assert_eq!(view.filtered_orders, view.rows.len());
            prop_assert_eq!(view.series.sum(), expected);
            prop_assert_eq!(view.filtered_revenue, expected);
            if per_month {
                prop_assert_eq!(view.series.len(), view.rows.len());
            }
        }
    }
}
