//! # Event Tracker
//!
//! Attendance, food sales and staff rosters for a one-day event, kept in a
//! SQLite-backed dataset store and served over a small JSON API.
//!
//! ## Modules
//!
//! - [`store`]: Record types and the `EventStore` with write-time validation
//! - [`table`]: Table schemas, grid views and CSV export
//! - [`seed`]: Demo dataset loader
//! - [`report`]: Food popularity and shift timeline views
//! - [`app`]: Navigation shell binding steps to views
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use event_tracker::report::food_popularity;
//! use event_tracker::seed::load_sample_data;
//! use event_tracker::store::{EventStore, EventWindow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EventStore::open_in_memory(EventWindow::default())?;
//!     load_sample_data(&store, false).await?;
//!
//!     for row in food_popularity(&store.orders().await?) {
//!         println!("{:<20} {}", row.food_name, row.quantity);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod report;
pub mod seed;
pub mod store;
pub mod table;

// Re-export top-level types for convenience
pub use store::{
    Dataset, DatasetCounts, EventStore, EventWindow, Food, NewFood, NewOrder, NewRoster, NewStaff,
    NewStation, Order, Roster, Staff, Station, StoreError, StoreResult,
};

pub use table::{GridView, Table, TableSource};

pub use report::{PopularityChart, PopularityRow, ShiftTimeline};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, Credentials, LoggingConfig};
