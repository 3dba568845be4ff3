//! Helpers shared by controllers, mainly resolving the logged in user from the session.

pub mod get_user;
