//! Integration tests for the order lookup repository and the PostgreSQL oracle.
//!
//! These need a reachable PostgreSQL instance in `DATABASE_URL`; run with
//! `cargo test -p orderdesk-db -- --ignored`. Each test gets a fresh
//! database and creates a minimal `orders` table itself.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use orderdesk_core::oracle::ExistenceOracle;
use orderdesk_core::order::{Category, OrderDraft};
use orderdesk_core::validation::{FieldId, ValidationContext, ValidationPipeline};
use orderdesk_db::repositories::OrderLookupRepo;
use orderdesk_db::PgExistenceOracle;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn setup(pool: &PgPool) {
    sqlx::query(
        "CREATE TABLE orders (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            isbn TEXT NOT NULL,
            published_date DATE NOT NULL
        )",
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn insert(pool: &PgPool, title: &str, author: &str, isbn: &str, published: NaiveDate) {
    sqlx::query("INSERT INTO orders (title, author, isbn, published_date) VALUES ($1, $2, $3, $4)")
        .bind(title)
        .bind(author)
        .bind(isbn)
        .bind(published)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn title_author_lookup(pool: PgPool) {
    setup(&pool).await;
    insert(&pool, "Dune", "Frank Herbert", "0306406152", date(1965, 8, 1)).await;

    assert!(OrderLookupRepo::title_author_exists(&pool, "Dune", "Frank Herbert")
        .await
        .unwrap());
    assert!(!OrderLookupRepo::title_author_exists(&pool, "Dune", "Brian Herbert")
        .await
        .unwrap());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn isbn_lookup_normalizes_stored_values(pool: PgPool) {
    setup(&pool).await;
    insert(&pool, "Dune", "Frank Herbert", "0-8044-2957-x", date(1965, 8, 1)).await;

    assert!(OrderLookupRepo::isbn_exists(&pool, "080442957X").await.unwrap());
    assert!(!OrderLookupRepo::isbn_exists(&pool, "0306406152").await.unwrap());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn counts_by_published_date(pool: PgPool) {
    setup(&pool).await;
    insert(&pool, "A", "Ann Author", "0306406152", date(2026, 10, 18)).await;
    insert(&pool, "B", "Ann Author", "080442957X", date(2026, 10, 18)).await;
    insert(&pool, "C", "Ann Author", "9780306406157", date(2026, 10, 17)).await;

    assert_eq!(
        OrderLookupRepo::count_published_on(&pool, date(2026, 10, 18))
            .await
            .unwrap(),
        2
    );
}

// ---------------------------------------------------------------------------
// Oracle + pipeline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn pipeline_rejects_duplicate_isbn_from_database(pool: PgPool) {
    setup(&pool).await;
    insert(&pool, "Other", "Someone Else", "978-0-306-40615-7", date(2001, 1, 1)).await;

    let oracle = PgExistenceOracle::new(pool);
    let draft = OrderDraft {
        title: "Systems Performance".to_string(),
        author: "Brendan Gregg".to_string(),
        isbn: "9780306406157".to_string(),
        category: Category::Technical.into(),
        price: Decimal::new(5999, 2),
        published_date: date(2020, 12, 1),
        cover_image_url: None,
        stock_quantity: 3,
    };

    let report = ValidationPipeline::default()
        .validate(&draft, &oracle, &ValidationContext::for_date(date(2026, 10, 18)))
        .await
        .unwrap();

    let fields: Vec<FieldId> = report.outcome.violations().iter().map(|v| v.field).collect();
    assert_eq!(fields, vec![FieldId::Isbn]);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn missing_table_is_query_error(pool: PgPool) {
    let oracle = PgExistenceOracle::new(pool);

    let result = oracle.isbn_exists("0306406152").await;

    assert!(matches!(
        result,
        Err(orderdesk_core::error::OracleError::Query(_))
    ));
}
