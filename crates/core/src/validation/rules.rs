//! Violation, outcome and rule contract types.

use async_trait::async_trait;
use serde::Serialize;

use super::context::ValidationContext;
use crate::error::OracleError;
use crate::oracle::ExistenceOracle;
use crate::order::OrderDraft;

/// The draft field a violation is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Title,
    Author,
    Isbn,
    Category,
    Price,
    PublishedDate,
    StockQuantity,
    CoverImageUrl,
    /// Cross-field rules that do not belong to a single field.
    Order,
}

impl FieldId {
    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Isbn => "isbn",
            Self::Category => "category",
            Self::Price => "price",
            Self::PublishedDate => "published_date",
            Self::StockQuantity => "stock_quantity",
            Self::CoverImageUrl => "cover_image_url",
            Self::Order => "order",
        }
    }
}

/// A single failed rule: which field, a machine-readable code and a
/// user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: FieldId,
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    pub fn new(field: FieldId, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// Result of validating one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "violations", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Accepted,
    /// Every violation, in rule declaration order. Never empty.
    Rejected(Vec<Violation>),
}

impl ValidationOutcome {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Self::Accepted
        } else {
            Self::Rejected(violations)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Accepted => &[],
            Self::Rejected(violations) => violations,
        }
    }

    /// Violations reported against one field.
    pub fn violations_for(&self, field: FieldId) -> impl Iterator<Item = &Violation> {
        self.violations().iter().filter(move |v| v.field == field)
    }
}

/// One entry in a validation pipeline.
///
/// Rules never mutate anything; an `Err` means the oracle could not answer
/// and aborts the whole run.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        oracle: &dyn ExistenceOracle,
        ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError>;
}
