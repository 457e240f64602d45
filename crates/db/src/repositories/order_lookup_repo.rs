//! Read-only lookups against the `orders` table.

use chrono::NaiveDate;
use sqlx::PgPool;

/// Stored ISBNs normalized the same way as `orderdesk_core::isbn::normalize`.
const NORMALIZED_ISBN: &str = "UPPER(REPLACE(REPLACE(isbn, '-', ''), ' ', ''))";

/// Existence and count queries used by order validation.
pub struct OrderLookupRepo;

impl OrderLookupRepo {
    /// Whether an order with exactly this title and author exists.
    pub async fn title_author_exists(
        pool: &PgPool,
        title: &str,
        author: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE title = $1 AND author = $2)",
        )
        .bind(title)
        .bind(author)
        .fetch_one(pool)
        .await
    }

    /// Whether an order with this normalized ISBN exists.
    pub async fn isbn_exists(pool: &PgPool, normalized_isbn: &str) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM orders WHERE {NORMALIZED_ISBN} = $1)");
        sqlx::query_scalar::<_, bool>(&query)
            .bind(normalized_isbn)
            .fetch_one(pool)
            .await
    }

    /// Number of orders whose published date is `date`.
    pub async fn count_published_on(pool: &PgPool, date: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE published_date::date = $1")
            .bind(date)
            .fetch_one(pool)
            .await
    }
}
