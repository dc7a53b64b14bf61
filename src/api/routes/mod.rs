//! API Routes
//!
//! Route handlers organized by functionality.

pub mod app;
pub mod dataset;
pub mod health;
pub mod records;
pub mod reports;
pub mod tables;
