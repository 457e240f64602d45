//! Order validation pipeline.
//!
//! Rule types and outcome ([`rules`]), the per-field rules ([`fields`]), the
//! cross-field business check ([`business`]), the per-call context and
//! metrics ([`context`]) and the pipeline that runs them ([`pipeline`]).

pub mod business;
pub mod context;
pub mod denylist;
pub mod fields;
pub mod pipeline;
pub mod rules;

pub use context::{ValidationContext, ValidationMetrics, ValidationReport};
pub use pipeline::ValidationPipeline;
pub use rules::{FieldId, Rule, ValidationOutcome, Violation};
