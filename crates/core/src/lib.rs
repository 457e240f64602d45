//! `orderdesk-core` -- order validation engine.
//!
//! Pure domain logic for deciding whether an order draft may be persisted:
//! the ISBN checksum, the existence-oracle port, the ordered rule set and the
//! pipeline that evaluates it. No database or transport dependencies.

pub mod config;
pub mod error;
pub mod isbn;
pub mod oracle;
pub mod order;
pub mod types;
pub mod validation;
