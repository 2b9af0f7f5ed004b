//! Database abstraction layer
//!
//! Provides a trait-based seam over the warehouse connection for testability.

pub mod redshift;
pub mod traits;

pub use redshift::RedshiftSource;
pub use traits::LagSource;
