//! Sales report history and the aggregation reader that fills it.

use core::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use bookstore_core::{DomainError, DomainResult, SearchCriteria};
use bookstore_sales::SalesReport;

use crate::catalog::Catalog;
use crate::store::EntityStore;

/// Append-only list of generated reports, oldest first.
#[derive(Debug, Default)]
pub struct ReportHistory {
    reports: Mutex<Vec<SalesReport>>,
}

impl ReportHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reports(reports: Vec<SalesReport>) -> Self {
        Self {
            reports: Mutex::new(reports),
        }
    }

    pub fn append(&self, report: SalesReport) {
        self.lock().push(report);
    }

    pub fn all(&self) -> Vec<SalesReport> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whose timestamp lies within the `from` / `to` filters
    /// (RFC 3339, inclusive). Other filter keys are ignored.
    pub fn search(&self, criteria: &SearchCriteria) -> DomainResult<Vec<SalesReport>> {
        let from = time_bound(criteria, "from")?;
        let to = time_bound(criteria, "to")?;

        Ok(self
            .lock()
            .iter()
            .filter(|r| r.within(from, to))
            .cloned()
            .collect())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SalesReport>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn time_bound(criteria: &SearchCriteria, key: &str) -> DomainResult<Option<DateTime<Utc>>> {
    let Some(value) = criteria.get(key) else {
        return Ok(None);
    };
    let raw = match value {
        JsonValue::String(s) => s.as_str(),
        other => {
            return Err(DomainError::validation(format!(
                "{key} must be an RFC 3339 timestamp, got {other}"
            )));
        }
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| DomainError::validation(format!("invalid {key} timestamp {raw:?}: {e}")))
}

/// Which store a report is folded from.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// One sale line per recorded book sale.
    #[default]
    BookSales,
    /// One sale line per order item; the record count is the order count.
    Orders,
}

impl FromStr for ReportSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book_sales" | "book-sales" => Ok(Self::BookSales),
            "orders" => Ok(Self::Orders),
            other => Err(DomainError::validation(format!(
                "unknown report source {other:?} (expected book_sales or orders)"
            ))),
        }
    }
}

/// Read-side consumer: scans a store unfiltered and folds it into a report.
#[derive(Debug, Clone)]
pub struct AggregationReader {
    catalog: Catalog,
}

impl AggregationReader {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Build a report from the current contents of `source` and append it to
    /// the report history.
    pub fn generate(&self, source: ReportSource) -> DomainResult<SalesReport> {
        let all = SearchCriteria::all();
        let now = Utc::now();

        let report = match source {
            ReportSource::BookSales => {
                SalesReport::from_book_sales(&self.catalog.book_sales.search(&all)?, now)
            }
            ReportSource::Orders => SalesReport::from_orders(&self.catalog.orders.search(&all)?, now),
        };

        tracing::info!(
            ?source,
            total_orders = report.total_orders,
            total_revenue = report.total_revenue,
            titles = report.top_selling_books.len(),
            "sales report generated"
        );

        self.catalog.reports.append(report.clone());
        Ok(report)
    }
}
