//! Field-level rules.
//!
//! Each rule owns one field. A blank value is reported once as `required`
//! and the field's remaining checks are skipped; otherwise independent
//! checks on the same field all report.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

use super::context::ValidationContext;
use super::denylist::Denylist;
use super::rules::{FieldId, Rule, Violation};
use crate::error::OracleError;
use crate::isbn;
use crate::oracle::ExistenceOracle;
use crate::order::{Category, OrderDraft, SubmittedCategory};
use crate::types::Date;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Minimum author name length in characters.
pub const MIN_AUTHOR_LEN: usize = 2;

/// Maximum author name length in characters.
pub const MAX_AUTHOR_LEN: usize = 100;

/// Prices must be strictly below this many currency units.
pub const MAX_PRICE_UNITS: i64 = 10_000;

/// Earliest accepted publication year.
pub const MIN_PUBLISHED_YEAR: i32 = 1400;

/// Maximum stock quantity for a single order.
pub const MAX_STOCK_QUANTITY: i32 = 100_000;

/// Accepted cover image file extensions (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Letters, spaces, dots, apostrophes and hyphens.
pub const AUTHOR_PATTERN: &str = r"^[A-Za-z .'\-]+$";

static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AUTHOR_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const MSG_TITLE_REQUIRED: &str = "The order title is required.";
pub const MSG_TITLE_TOO_LONG: &str = "The title must not exceed 200 characters.";
pub const MSG_TITLE_INAPPROPRIATE: &str = "The title contains inappropriate content.";
pub const MSG_TITLE_DUPLICATE: &str = "An order with this title already exists for this author.";
pub const MSG_AUTHOR_REQUIRED: &str = "The author's name is required.";
pub const MSG_AUTHOR_TOO_SHORT: &str = "The author's name must be at least 2 characters long.";
pub const MSG_AUTHOR_TOO_LONG: &str = "The author's name must not exceed 100 characters.";
pub const MSG_AUTHOR_INVALID_CHARS: &str = "The author's name contains invalid characters. \
     Only letters, spaces, hyphens, apostrophes, and dots are allowed.";
pub const MSG_ISBN_REQUIRED: &str = "The ISBN is required.";
pub const MSG_ISBN_INVALID: &str =
    "The ISBN must be a valid ISBN-10 or ISBN-13 (hyphens and spaces are allowed).";
pub const MSG_ISBN_DUPLICATE: &str = "An order with this ISBN already exists in the system.";
pub const MSG_PRICE_NOT_POSITIVE: &str = "The price must be greater than zero.";
pub const MSG_PRICE_TOO_HIGH: &str = "The price must be less than 10,000.";
pub const MSG_DATE_IN_FUTURE: &str = "The published date cannot be in the future.";
pub const MSG_DATE_TOO_OLD: &str = "The published date cannot be before the year 1400.";
pub const MSG_STOCK_NEGATIVE: &str = "The stock quantity cannot be negative.";
pub const MSG_STOCK_TOO_HIGH: &str = "The stock quantity cannot exceed 100,000.";
pub const MSG_COVER_URL_INVALID: &str = "The cover image URL must be a valid HTTP/HTTPS URL \
     ending with an image extension (.jpg, .jpeg, .png, .gif, .webp).";

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn violation(field: FieldId, code: &'static str, message: &str) -> Violation {
    tracing::debug!(field = field.as_str(), code, "Field rule failed");
    Violation::new(field, code, message)
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// Title presence, length and denylist.
pub struct TitleRule {
    denylist: Denylist,
}

impl TitleRule {
    pub fn new(denylist: Denylist) -> Self {
        Self { denylist }
    }

    pub fn check(&self, title: &str) -> Vec<Violation> {
        if is_blank(title) {
            return vec![violation(FieldId::Title, "required", MSG_TITLE_REQUIRED)];
        }
        let mut violations = Vec::new();
        if title.chars().count() > MAX_TITLE_LEN {
            violations.push(violation(FieldId::Title, "too_long", MSG_TITLE_TOO_LONG));
        }
        if let Some(word) = self.denylist.first_match(title) {
            tracing::warn!(title, word, "Inappropriate content detected in title");
            violations.push(violation(
                FieldId::Title,
                "inappropriate",
                MSG_TITLE_INAPPROPRIATE,
            ));
        }
        violations
    }
}

#[async_trait]
impl Rule for TitleRule {
    fn name(&self) -> &'static str {
        "title"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        Ok(self.check(&draft.title))
    }
}

/// No existing order may share both title and author.
///
/// Skipped when either value is blank; those are already reported as
/// `required`.
pub struct TitleAuthorUniqueRule;

#[async_trait]
impl Rule for TitleAuthorUniqueRule {
    fn name(&self) -> &'static str {
        "title_author_unique"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        if is_blank(&draft.title) || is_blank(&draft.author) {
            return Ok(Vec::new());
        }
        if oracle
            .title_author_exists(&draft.title, &draft.author)
            .await?
        {
            tracing::warn!(
                title = %draft.title,
                author = %draft.author,
                "Title is not unique for author"
            );
            return Ok(vec![violation(
                FieldId::Title,
                "duplicate",
                MSG_TITLE_DUPLICATE,
            )]);
        }
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

/// Author presence, length and character set.
pub struct AuthorRule;

impl AuthorRule {
    pub fn check(author: &str) -> Vec<Violation> {
        if is_blank(author) {
            return vec![violation(FieldId::Author, "required", MSG_AUTHOR_REQUIRED)];
        }
        let mut violations = Vec::new();
        let len = author.chars().count();
        if len < MIN_AUTHOR_LEN {
            violations.push(violation(FieldId::Author, "too_short", MSG_AUTHOR_TOO_SHORT));
        } else if len > MAX_AUTHOR_LEN {
            violations.push(violation(FieldId::Author, "too_long", MSG_AUTHOR_TOO_LONG));
        }
        if !AUTHOR_RE.is_match(author) {
            violations.push(violation(
                FieldId::Author,
                "invalid_characters",
                MSG_AUTHOR_INVALID_CHARS,
            ));
        }
        violations
    }
}

#[async_trait]
impl Rule for AuthorRule {
    fn name(&self) -> &'static str {
        "author"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        Ok(Self::check(&draft.author))
    }
}

// ---------------------------------------------------------------------------
// ISBN
// ---------------------------------------------------------------------------

/// ISBN presence, checksum and uniqueness. A malformed ISBN is never looked up.
pub struct IsbnRule;

#[async_trait]
impl Rule for IsbnRule {
    fn name(&self) -> &'static str {
        "isbn"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        if is_blank(&draft.isbn) {
            return Ok(vec![violation(FieldId::Isbn, "required", MSG_ISBN_REQUIRED)]);
        }
        if !isbn::is_valid(&draft.isbn) {
            tracing::warn!(isbn = %draft.isbn, "Invalid ISBN format");
            return Ok(vec![violation(FieldId::Isbn, "invalid_format", MSG_ISBN_INVALID)]);
        }
        let normalized = isbn::normalize(&draft.isbn);
        if oracle.isbn_exists(&normalized).await? {
            tracing::warn!(isbn = %normalized, "ISBN is not unique");
            return Ok(vec![violation(FieldId::Isbn, "duplicate", MSG_ISBN_DUPLICATE)]);
        }
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The submitted category must name a known variant.
pub struct CategoryRule;

impl CategoryRule {
    pub fn check(category: &SubmittedCategory) -> Vec<Violation> {
        match category {
            SubmittedCategory::Known(_) => Vec::new(),
            SubmittedCategory::Unknown(name) => {
                tracing::debug!(category = %name, "Unknown category");
                let allowed: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
                vec![Violation::new(
                    FieldId::Category,
                    "invalid_category",
                    format!("The category must be one of: {}.", allowed.join(", ")),
                )]
            }
        }
    }
}

#[async_trait]
impl Rule for CategoryRule {
    fn name(&self) -> &'static str {
        "category"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        Ok(Self::check(&draft.category))
    }
}

// ---------------------------------------------------------------------------
// Price
// ---------------------------------------------------------------------------

/// `0 < price < 10,000`.
pub struct PriceRule;

impl PriceRule {
    pub fn check(price: Decimal) -> Vec<Violation> {
        if price <= Decimal::ZERO {
            vec![violation(FieldId::Price, "not_positive", MSG_PRICE_NOT_POSITIVE)]
        } else if price >= Decimal::from(MAX_PRICE_UNITS) {
            vec![violation(FieldId::Price, "too_high", MSG_PRICE_TOO_HIGH)]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl Rule for PriceRule {
    fn name(&self) -> &'static str {
        "price"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        Ok(Self::check(draft.price))
    }
}

// ---------------------------------------------------------------------------
// Published date
// ---------------------------------------------------------------------------

/// `1400-01-01 <= published_date <= today`.
pub struct PublishedDateRule;

impl PublishedDateRule {
    pub fn check(published: Date, today: Date) -> Vec<Violation> {
        if published > today {
            return vec![violation(
                FieldId::PublishedDate,
                "in_future",
                MSG_DATE_IN_FUTURE,
            )];
        }
        match Date::from_ymd_opt(MIN_PUBLISHED_YEAR, 1, 1) {
            Some(floor) if published < floor => vec![violation(
                FieldId::PublishedDate,
                "too_old",
                MSG_DATE_TOO_OLD,
            )],
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl Rule for PublishedDateRule {
    fn name(&self) -> &'static str {
        "published_date"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        Ok(Self::check(draft.published_date, ctx.today))
    }
}

// ---------------------------------------------------------------------------
// Stock quantity
// ---------------------------------------------------------------------------

/// `0 <= stock_quantity <= 100,000`.
pub struct StockQuantityRule;

impl StockQuantityRule {
    pub fn check(quantity: i32) -> Vec<Violation> {
        if quantity < 0 {
            vec![violation(FieldId::StockQuantity, "negative", MSG_STOCK_NEGATIVE)]
        } else if quantity > MAX_STOCK_QUANTITY {
            vec![violation(FieldId::StockQuantity, "too_high", MSG_STOCK_TOO_HIGH)]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl Rule for StockQuantityRule {
    fn name(&self) -> &'static str {
        "stock_quantity"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        Ok(Self::check(draft.stock_quantity))
    }
}

// ---------------------------------------------------------------------------
// Cover image URL
// ---------------------------------------------------------------------------

/// Whether `url` is an absolute http(s) URL with a host whose last path
/// segment ends in an image extension. Query strings and fragments are ignored.
pub fn is_valid_cover_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return false;
    }

    let file_name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    match file_name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Optional cover image URL; absent or blank values pass.
pub struct CoverImageUrlRule;

#[async_trait]
impl Rule for CoverImageUrlRule {
    fn name(&self) -> &'static str {
        "cover_image_url"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        _oracle: &dyn ExistenceOracle,
        _ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        match draft.cover_image_url.as_deref() {
            Some(url) if !url.is_empty() && !is_valid_cover_url(url) => {
                tracing::warn!(url, "Invalid cover image URL");
                Ok(vec![violation(
                    FieldId::CoverImageUrl,
                    "invalid_url",
                    MSG_COVER_URL_INVALID,
                )])
            }
            _ => Ok(Vec::new()),
        }
    }
}
