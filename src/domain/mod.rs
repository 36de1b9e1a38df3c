//! Domain values shared by the controller and the service layer.

pub mod page;
pub mod query;
pub mod types;
