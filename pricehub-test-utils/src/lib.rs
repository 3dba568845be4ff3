//! Shared test harness for the price hub crates.
//!
//! Tests build a [`TestContext`] through [`TestBuilder`], which provides an in-memory SQLite
//! database created from the entity definitions, a mock HTTP server for outbound requests,
//! and an in-memory session.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{constant::TEST_PASSWORD, TestBuilder, TestContext, TestError};
}
