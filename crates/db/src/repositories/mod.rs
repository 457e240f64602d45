//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod order_lookup_repo;

pub use order_lookup_repo::OrderLookupRepo;
