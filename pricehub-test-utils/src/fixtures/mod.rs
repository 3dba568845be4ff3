//! Database fixtures used while a test runs.
//!
//! Each fixture group is reached through an accessor on [`TestContext`](crate::TestContext),
//! e.g. `test.user().insert_user("a@example.com")`.

pub mod currency;
pub mod price;
pub mod provider;
pub mod setting;
pub mod standard_model;
pub mod token;
pub mod user;
