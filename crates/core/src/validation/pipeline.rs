//! The validation pipeline: an explicit, ordered list of rules.

use std::time::Instant;

use futures::future::try_join_all;

use super::business::BusinessRule;
use super::context::{ValidationContext, ValidationMetrics, ValidationReport};
use super::denylist::Denylist;
use super::fields::{
    AuthorRule, CategoryRule, CoverImageUrlRule, IsbnRule, PriceRule, PublishedDateRule,
    StockQuantityRule, TitleAuthorUniqueRule, TitleRule,
};
use super::rules::{Rule, ValidationOutcome, Violation};
use crate::config::PipelineConfig;
use crate::error::CoreError;
use crate::oracle::{ExistenceOracle, MeteredOracle};
use crate::order::OrderDraft;

/// Runs every rule against a draft and collects all violations.
///
/// Rules are polled concurrently, so independent oracle queries are in
/// flight together, but violations are always reported in rule order.
pub struct ValidationPipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl ValidationPipeline {
    /// The standard order rule set.
    pub fn new(config: &PipelineConfig) -> Self {
        let denylist = Denylist::new(&config.title_denylist);
        Self::from_rules(vec![
            Box::new(TitleRule::new(denylist.clone())),
            Box::new(TitleAuthorUniqueRule),
            Box::new(AuthorRule),
            Box::new(IsbnRule),
            Box::new(CategoryRule),
            Box::new(PriceRule),
            Box::new(PublishedDateRule),
            Box::new(StockQuantityRule),
            Box::new(CoverImageUrlRule),
            Box::new(BusinessRule::from_config(config, denylist)),
        ])
    }

    pub fn from_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate `draft` against `oracle` as of `ctx.today`.
    ///
    /// Returns `Err` only when the oracle fails; a rejected draft is an
    /// `Ok` report whose outcome is [`ValidationOutcome::Rejected`].
    pub async fn validate(
        &self,
        draft: &OrderDraft,
        oracle: &dyn ExistenceOracle,
        ctx: &ValidationContext,
    ) -> Result<ValidationReport, CoreError> {
        let started = Instant::now();
        let metered = MeteredOracle::new(oracle);
        let metered_ref: &dyn ExistenceOracle = &metered;

        tracing::debug!(
            operation_id = %ctx.operation_id,
            title = %draft.title,
            isbn = %draft.isbn,
            category = draft.category.as_str(),
            rules = self.rules.len(),
            "Validating order draft"
        );

        let per_rule = try_join_all(
            self.rules
                .iter()
                .map(|rule| rule.evaluate(draft, metered_ref, ctx)),
        )
        .await
        .map_err(|err| {
            tracing::error!(
                operation_id = %ctx.operation_id,
                error = %err,
                "Existence lookup failed during validation"
            );
            CoreError::Oracle(err)
        })?;

        let violations: Vec<Violation> = per_rule.into_iter().flatten().collect();
        let outcome = ValidationOutcome::from_violations(violations);
        let metrics = ValidationMetrics::record(
            ctx,
            draft,
            &outcome,
            started.elapsed(),
            metered.query_count(),
        );

        match &outcome {
            ValidationOutcome::Accepted => tracing::info!(
                operation_id = %ctx.operation_id,
                title = %draft.title,
                isbn = %draft.isbn,
                duration_ms = metrics.validation_ms,
                oracle_queries = metrics.oracle_queries,
                "Order draft accepted"
            ),
            ValidationOutcome::Rejected(violations) => tracing::warn!(
                operation_id = %ctx.operation_id,
                title = %draft.title,
                isbn = %draft.isbn,
                duration_ms = metrics.validation_ms,
                violation_count = violations.len(),
                "Order draft rejected"
            ),
        }

        Ok(ValidationReport { outcome, metrics })
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rule_order() {
        let pipeline = ValidationPipeline::default();
        assert_eq!(
            pipeline.rule_names(),
            vec![
                "title",
                "title_author_unique",
                "author",
                "isbn",
                "category",
                "price",
                "published_date",
                "stock_quantity",
                "cover_image_url",
                "business_rules",
            ]
        );
    }
}
