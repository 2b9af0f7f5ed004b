//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod notify_test;
pub mod validate;

pub use check::run_check;
pub use notify_test::run_notify_test;
pub use validate::run_validate;
