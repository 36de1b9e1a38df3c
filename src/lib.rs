//! Query-state controller for server-paginated back-office tables.
//!
//! A list view owns one [`controller::QueryStateController`] for as long as
//! it is mounted. The controller folds search input (debounced), named
//! filters, pagination and sorting into a single
//! [`domain::query::EffectiveQuery`] that the data-fetch layer uses as both
//! request parameters and cache key.

#[cfg(feature = "data")]
pub mod controller;
#[cfg(feature = "data")]
pub mod debounce;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "runtime")]
pub mod runtime;
#[cfg(feature = "data")]
pub mod services;
