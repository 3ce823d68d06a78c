//! Cart Review
//!
//! Checkout order-review engine. Given a cart snapshot owned by an external
//! cart service, it decides which product lines can be removed, which lines
//! may switch plan-length variants and which coupon and credits adjustments
//! to show, then forwards validated cart commands to the service one at a time.

pub mod adjustments;
pub mod cart;
pub mod classification;
pub mod commands;
pub mod config;
pub mod coupon;
pub mod engine;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod products;
pub mod review;
pub mod rules;
pub mod service;
