//! Cross-field business rules.
//!
//! All checks are evaluated and logged individually, but a failing draft
//! receives a single `order`-level violation.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::context::ValidationContext;
use super::denylist::Denylist;
use super::rules::{FieldId, Rule, Violation};
use crate::config::PipelineConfig;
use crate::error::OracleError;
use crate::oracle::ExistenceOracle;
use crate::order::{Category, OrderDraft};

pub const MSG_BUSINESS_RULES_FAILED: &str = "The order failed business rule validation.";

/// One of the composite business checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessCheck {
    /// Today's intake already reached the daily cap.
    DailyIntakeCap,
    /// Technical orders must meet the minimum price.
    TechnicalMinimumPrice,
    /// Children's titles must not contain denylisted words.
    ChildrenRestrictedTitle,
    /// High-value orders have a stock ceiling.
    HighValueStockLimit,
}

impl BusinessCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyIntakeCap => "daily_intake_cap",
            Self::TechnicalMinimumPrice => "technical_minimum_price",
            Self::ChildrenRestrictedTitle => "children_restricted_title",
            Self::HighValueStockLimit => "high_value_stock_limit",
        }
    }
}

/// Composite business check over the whole draft.
pub struct BusinessRule {
    denylist: Denylist,
    daily_intake_cap: i64,
    technical_min_price: Decimal,
    high_value_price: Decimal,
    high_value_max_stock: i32,
}

impl BusinessRule {
    pub fn from_config(config: &PipelineConfig, denylist: Denylist) -> Self {
        Self {
            denylist,
            daily_intake_cap: config.daily_intake_cap,
            technical_min_price: config.technical_min_price,
            high_value_price: config.high_value_price,
            high_value_max_stock: config.high_value_max_stock,
        }
    }

    /// Checks failed by `draft` given `orders_today` existing orders dated today.
    pub fn failed_checks(&self, draft: &OrderDraft, orders_today: i64) -> Vec<BusinessCheck> {
        let mut failed = Vec::new();

        if orders_today >= self.daily_intake_cap {
            failed.push(BusinessCheck::DailyIntakeCap);
        }

        match draft.category.known() {
            Some(Category::Technical) if draft.price < self.technical_min_price => {
                failed.push(BusinessCheck::TechnicalMinimumPrice);
            }
            Some(Category::Children) if self.denylist.first_match(&draft.title).is_some() => {
                failed.push(BusinessCheck::ChildrenRestrictedTitle);
            }
            _ => {}
        }

        if draft.price > self.high_value_price && draft.stock_quantity > self.high_value_max_stock {
            failed.push(BusinessCheck::HighValueStockLimit);
        }

        failed
    }
}

#[async_trait]
impl Rule for BusinessRule {
    fn name(&self) -> &'static str {
        "business_rules"
    }

    async fn evaluate(
        &self,
        draft: &OrderDraft,
        oracle: &dyn ExistenceOracle,
        ctx: &ValidationContext,
    ) -> Result<Vec<Violation>, OracleError> {
        let orders_today = oracle.count_published_on(ctx.today).await?;
        let failed = self.failed_checks(draft, orders_today);

        if failed.is_empty() {
            tracing::debug!(title = %draft.title, "All business rules passed");
            return Ok(Vec::new());
        }

        for check in &failed {
            tracing::warn!(
                operation_id = %ctx.operation_id,
                check = check.as_str(),
                title = %draft.title,
                price = %draft.price,
                stock_quantity = draft.stock_quantity,
                orders_today,
                "Business rule violation"
            );
        }

        Ok(vec![Violation::new(
            FieldId::Order,
            "business_rules",
            MSG_BUSINESS_RULES_FAILED,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::SubmittedCategory;
    use crate::types::Date;

    fn rule() -> BusinessRule {
        let config = PipelineConfig::default();
        BusinessRule::from_config(&config, Denylist::new(&config.title_denylist))
    }

    fn draft(category: Category, price: Decimal, stock: i32, title: &str) -> OrderDraft {
        OrderDraft {
            title: title.to_string(),
            author: "Ann Author".to_string(),
            isbn: "0306406152".to_string(),
            category: SubmittedCategory::Known(category),
            price,
            published_date: Date::from_ymd_opt(2020, 1, 1).unwrap(),
            cover_image_url: None,
            stock_quantity: stock,
        }
    }

    #[test]
    fn clean_draft_passes() {
        let d = draft(Category::Fiction, Decimal::new(1500, 2), 5, "Quiet Days");
        assert!(rule().failed_checks(&d, 0).is_empty());
    }

    #[test]
    fn daily_cap_is_exclusive() {
        let d = draft(Category::Fiction, Decimal::new(1500, 2), 5, "Quiet Days");
        assert!(rule().failed_checks(&d, 499).is_empty());
        assert_eq!(rule().failed_checks(&d, 500), vec![BusinessCheck::DailyIntakeCap]);
    }

    #[test]
    fn technical_minimum_price() {
        let cheap = draft(Category::Technical, Decimal::new(1999, 2), 1, "Rust");
        let exact = draft(Category::Technical, Decimal::new(2000, 2), 1, "Rust");
        assert_eq!(
            rule().failed_checks(&cheap, 0),
            vec![BusinessCheck::TechnicalMinimumPrice]
        );
        assert!(rule().failed_checks(&exact, 0).is_empty());
    }

    #[test]
    fn children_title_restriction() {
        let d = draft(Category::Children, Decimal::new(999, 2), 1, "An INAPPROPRIATE tale");
        assert_eq!(
            rule().failed_checks(&d, 0),
            vec![BusinessCheck::ChildrenRestrictedTitle]
        );
    }

    #[test]
    fn high_value_stock_limit() {
        let over = draft(Category::Fiction, Decimal::new(50001, 2), 11, "Gold");
        let at_threshold = draft(Category::Fiction, Decimal::new(50000, 2), 11, "Gold");
        let low_stock = draft(Category::Fiction, Decimal::new(90000, 2), 10, "Gold");
        assert_eq!(
            rule().failed_checks(&over, 0),
            vec![BusinessCheck::HighValueStockLimit]
        );
        assert!(rule().failed_checks(&at_threshold, 0).is_empty());
        assert!(rule().failed_checks(&low_stock, 0).is_empty());
    }
}
