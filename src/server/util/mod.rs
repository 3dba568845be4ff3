//! Small helpers shared by services and controllers: role checks, currency display data and
//! proof image storage.

pub mod currency;
pub mod role;
pub mod upload;
