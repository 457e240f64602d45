//! [`ExistenceOracle`] backed by PostgreSQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use orderdesk_core::error::OracleError;
use orderdesk_core::oracle::ExistenceOracle;

use crate::repositories::OrderLookupRepo;
use crate::DbPool;

/// Answers validation lookups from the `orders` table.
#[derive(Debug, Clone)]
pub struct PgExistenceOracle {
    pool: DbPool,
}

impl PgExistenceOracle {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExistenceOracle for PgExistenceOracle {
    async fn title_author_exists(&self, title: &str, author: &str) -> Result<bool, OracleError> {
        OrderLookupRepo::title_author_exists(&self.pool, title, author)
            .await
            .map_err(|e| lookup_failed("title_author_exists", e))
    }

    async fn isbn_exists(&self, isbn: &str) -> Result<bool, OracleError> {
        OrderLookupRepo::isbn_exists(&self.pool, isbn)
            .await
            .map_err(|e| lookup_failed("isbn_exists", e))
    }

    async fn count_published_on(&self, date: NaiveDate) -> Result<i64, OracleError> {
        OrderLookupRepo::count_published_on(&self.pool, date)
            .await
            .map_err(|e| lookup_failed("count_published_on", e))
    }
}

/// Classify a sqlx error as an unreachable store or a failed query.
///
/// - Pool timeouts, closed pools and I/O or TLS failures map to `Unavailable`.
/// - Everything else maps to `Query`.
pub fn classify_sqlx_error(err: &sqlx::Error) -> OracleError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => OracleError::Unavailable(err.to_string()),
        other => OracleError::Query(other.to_string()),
    }
}

fn lookup_failed(query: &'static str, err: sqlx::Error) -> OracleError {
    tracing::error!(query, error = %err, "Order lookup failed");
    classify_sqlx_error(&err)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        assert_matches!(
            classify_sqlx_error(&sqlx::Error::PoolTimedOut),
            OracleError::Unavailable(_)
        );
    }

    #[test]
    fn closed_pool_is_unavailable() {
        assert_matches!(
            classify_sqlx_error(&sqlx::Error::PoolClosed),
            OracleError::Unavailable(_)
        );
    }

    #[test]
    fn missing_row_is_query_failure() {
        assert_matches!(
            classify_sqlx_error(&sqlx::Error::RowNotFound),
            OracleError::Query(_)
        );
    }
}
