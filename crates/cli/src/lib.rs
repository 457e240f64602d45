//! `orderdesk-cli` library crate.
//!
//! Input handling and exit-status mapping for the `orderdesk-validate`
//! binary, kept here so they can be tested without a database.

pub mod input;

use orderdesk_core::validation::ValidationReport;

/// The draft was accepted.
pub const EXIT_ACCEPTED: u8 = 0;
/// Bad input, bad configuration or an unreachable database.
pub const EXIT_FAILURE: u8 = 1;
/// The draft was rejected; violations are in the printed report.
pub const EXIT_REJECTED: u8 = 2;

pub fn exit_status(report: &ValidationReport) -> u8 {
    if report.is_accepted() {
        EXIT_ACCEPTED
    } else {
        EXIT_REJECTED
    }
}
