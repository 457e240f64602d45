//! Existence oracle port.
//!
//! The pipeline's only view of persisted orders. Implementations must be
//! read-only; the pipeline may issue the three queries concurrently.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

pub use crate::error::OracleError;
use crate::isbn;
use crate::types::Date;

/// Read-only existence and count queries over persisted orders.
#[async_trait]
pub trait ExistenceOracle: Send + Sync {
    /// Whether an order with exactly this title and author exists.
    async fn title_author_exists(&self, title: &str, author: &str) -> Result<bool, OracleError>;

    /// Whether an order with this ISBN exists. `isbn` is already normalized.
    async fn isbn_exists(&self, isbn: &str) -> Result<bool, OracleError>;

    /// Number of orders whose published date is `date`.
    async fn count_published_on(&self, date: Date) -> Result<i64, OracleError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// An order already on record, as far as the oracle is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingOrder {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: Date,
}

/// Oracle backed by a fixed list of orders.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOracle {
    orders: Vec<ExistingOrder>,
}

impl InMemoryOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`InMemoryOracle::push`].
    pub fn with_order(mut self, order: ExistingOrder) -> Self {
        self.push(order);
        self
    }

    pub fn push(&mut self, order: ExistingOrder) {
        self.orders.push(order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[async_trait]
impl ExistenceOracle for InMemoryOracle {
    async fn title_author_exists(&self, title: &str, author: &str) -> Result<bool, OracleError> {
        Ok(self
            .orders
            .iter()
            .any(|o| o.title == title && o.author == author))
    }

    async fn isbn_exists(&self, isbn: &str) -> Result<bool, OracleError> {
        Ok(self.orders.iter().any(|o| isbn::normalize(&o.isbn) == isbn))
    }

    async fn count_published_on(&self, date: Date) -> Result<i64, OracleError> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.published_date == date)
            .count() as i64)
    }
}

// ---------------------------------------------------------------------------
// Metering wrapper
// ---------------------------------------------------------------------------

/// Counts queries forwarded to the wrapped oracle during one pipeline run.
pub(crate) struct MeteredOracle<'a> {
    inner: &'a dyn ExistenceOracle,
    queries: AtomicU32,
}

impl<'a> MeteredOracle<'a> {
    pub(crate) fn new(inner: &'a dyn ExistenceOracle) -> Self {
        Self {
            inner,
            queries: AtomicU32::new(0),
        }
    }

    pub(crate) fn query_count(&self) -> u32 {
        self.queries.load(Ordering::Relaxed)
    }

    fn tick(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl<'a> ExistenceOracle for MeteredOracle<'a> {
    async fn title_author_exists(&self, title: &str, author: &str) -> Result<bool, OracleError> {
        self.tick();
        self.inner.title_author_exists(title, author).await
    }

    async fn isbn_exists(&self, isbn: &str) -> Result<bool, OracleError> {
        self.tick();
        self.inner.isbn_exists(isbn).await
    }

    async fn count_published_on(&self, date: Date) -> Result<i64, OracleError> {
        self.tick();
        self.inner.count_published_on(date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn oracle() -> InMemoryOracle {
        InMemoryOracle::new()
            .with_order(ExistingOrder {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                isbn: "0-306-40615-2".to_string(),
                published_date: date(2024, 5, 1),
            })
            .with_order(ExistingOrder {
                title: "Emma".to_string(),
                author: "Jane Austen".to_string(),
                isbn: "9780306406157".to_string(),
                published_date: date(2024, 5, 1),
            })
    }

    #[tokio::test]
    async fn title_author_match_is_exact() {
        let oracle = oracle();
        assert!(oracle.title_author_exists("Dune", "Frank Herbert").await.unwrap());
        assert!(!oracle.title_author_exists("Dune", "Brian Herbert").await.unwrap());
    }

    #[tokio::test]
    async fn isbn_lookup_compares_normalized_forms() {
        let oracle = oracle();
        assert!(oracle.isbn_exists("0306406152").await.unwrap());
        assert!(!oracle.isbn_exists("080442957X").await.unwrap());
    }

    #[tokio::test]
    async fn counts_orders_by_published_date() {
        let oracle = oracle();
        assert_eq!(oracle.count_published_on(date(2024, 5, 1)).await.unwrap(), 2);
        assert_eq!(oracle.count_published_on(date(2024, 5, 2)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn metered_oracle_counts_every_query() {
        let inner = oracle();
        let metered = MeteredOracle::new(&inner);
        metered.isbn_exists("0306406152").await.unwrap();
        metered.count_published_on(date(2024, 5, 1)).await.unwrap();
        assert_eq!(metered.query_count(), 2);
    }
}
