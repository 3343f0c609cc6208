//! JSON snapshot persistence for the whole catalog.
//!
//! The loader runs once at startup; the writer can run on demand or on a
//! fixed schedule. Each store is copied under its own lock, one at a time, so
//! a snapshot is per-store consistent but not a cross-store point in time.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bookstore_catalog::{Author, Book};
use bookstore_core::EntityId;
use bookstore_parties::Customer;
use bookstore_sales::{BookSale, Order, OrderItem, SalesReport};

use crate::catalog::Catalog;
use crate::reports::ReportHistory;
use crate::store::InMemoryEntityStore;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Serialized shape: identity-keyed entity maps plus the report history.
///
/// `next_ids` is optional on load; without it each counter resumes after the
/// largest stored identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub authors: BTreeMap<EntityId, Author>,
    #[serde(default)]
    pub books: BTreeMap<EntityId, Book>,
    #[serde(default)]
    pub customers: BTreeMap<EntityId, Customer>,
    #[serde(default)]
    pub order_items: BTreeMap<EntityId, OrderItem>,
    #[serde(default)]
    pub orders: BTreeMap<EntityId, Order>,
    #[serde(default)]
    pub book_sales: BTreeMap<EntityId, BookSale>,
    #[serde(default)]
    pub sales_reports: Vec<SalesReport>,
    #[serde(default)]
    pub next_ids: NextIds,
}

/// Identity counters per store at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextIds {
    pub authors: EntityId,
    pub books: EntityId,
    pub customers: EntityId,
    pub order_items: EntityId,
    pub orders: EntityId,
    pub book_sales: EntityId,
}

impl Catalog {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            authors: self.authors.entries(),
            books: self.books.entries(),
            customers: self.customers.entries(),
            order_items: self.order_items.entries(),
            orders: self.orders.entries(),
            book_sales: self.book_sales.entries(),
            sales_reports: self.reports.all(),
            next_ids: NextIds {
                authors: self.authors.next_id(),
                books: self.books.next_id(),
                customers: self.customers.next_id(),
                order_items: self.order_items.next_id(),
                orders: self.orders.next_id(),
                book_sales: self.book_sales.next_id(),
            },
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let next = snapshot.next_ids;
        Self {
            authors: Arc::new(InMemoryEntityStore::restore(snapshot.authors, next.authors)),
            books: Arc::new(InMemoryEntityStore::restore(snapshot.books, next.books)),
            customers: Arc::new(InMemoryEntityStore::restore(snapshot.customers, next.customers)),
            order_items: Arc::new(InMemoryEntityStore::restore(
                snapshot.order_items,
                next.order_items,
            )),
            orders: Arc::new(InMemoryEntityStore::restore(snapshot.orders, next.orders)),
            book_sales: Arc::new(InMemoryEntityStore::restore(snapshot.book_sales, next.book_sales)),
            reports: Arc::new(ReportHistory::from_reports(snapshot.sales_reports)),
        }
    }
}

/// Load the catalog from `path`, or start empty when the file does not exist.
pub fn load(path: &Path) -> Result<Catalog, SnapshotError> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no snapshot found; starting empty");
            return Ok(Catalog::new());
        }
        Err(e) => return Err(SnapshotError::io(path, e)),
    };

    let snapshot: Snapshot = serde_json::from_slice(&data)?;
    tracing::info!(
        path = %path.display(),
        authors = snapshot.authors.len(),
        books = snapshot.books.len(),
        customers = snapshot.customers.len(),
        orders = snapshot.orders.len(),
        "snapshot loaded"
    );
    Ok(Catalog::from_snapshot(snapshot))
}

/// Write the catalog to `path` via a sibling temp file and a rename.
pub fn save(catalog: &Catalog, path: &Path) -> Result<(), SnapshotError> {
    let data = serde_json::to_vec_pretty(&catalog.snapshot())?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, data).map_err(|e| SnapshotError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| SnapshotError::io(path, e))?;

    tracing::debug!(path = %path.display(), "snapshot written");
    Ok(())
}

/// Periodically write the catalog to `path` until the task is aborted.
///
/// A failed write is logged and retried on the next tick.
pub fn spawn_scheduled_writer(
    catalog: Catalog,
    path: PathBuf,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(path = %path.display(), every_secs = every.as_secs(), "snapshot writer started");

        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so the first write
        // happens one period after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let catalog = catalog.clone();
            let target = path.clone();
            let result = tokio::task::spawn_blocking(move || save(&catalog, &target)).await;
            match result {
                Ok(Ok(())) => tracing::info!(path = %path.display(), "saving data"),
                Ok(Err(e)) => tracing::error!(error = %e, "scheduled snapshot failed"),
                Err(e) => tracing::error!(error = %e, "scheduled snapshot task panicked"),
            }
        }
    })
}
