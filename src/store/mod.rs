//! Event Dataset Store
//!
//! This module provides persistence for one event dataset:
//!
//! - **types**: Record types (Station, Food, Order, Staff, Roster) and `EventWindow`
//! - **schema**: SQLite tables with unique, foreign-key and check constraints
//! - **insert**: Write-time validation for each record kind
//! - **engine**: `EventStore`, batch inserts and reads
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Batch → lock → BEGIN → validate + INSERT each row → COMMIT (or roll back all)
//!
//! Read Path:
//!   lock → SELECT ... ORDER BY id → records
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use event_tracker::store::{EventStore, EventWindow, NewStation};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EventStore::open_in_memory(EventWindow::default())?;
//!
//!     store.insert_stations(&[NewStation::new("Vietnamese Stall")]).await?;
//!
//!     let stations = store.stations().await?;
//!     println!("{} stations", stations.len());
//!
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
mod insert;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use engine::EventStore;
pub use error::{StoreError, StoreResult};
pub use types::{
    Dataset, DatasetCounts, EventWindow, Food, NewFood, NewOrder, NewRoster, NewStaff, NewStation,
    Order, Roster, Staff, Station,
};
