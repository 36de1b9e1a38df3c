//! DTO modules that bridge the controller with list endpoints.

pub mod query;
