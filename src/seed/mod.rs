//! Sample Data Loader
//!
//! Seeds a store with the demo dataset: three stalls, their menus, four staff
//! members with their shifts, and a day of orders. Order rows are fixed; their
//! timestamps are drawn at random inside the event window.
//!
//! ```rust,no_run
//! use event_tracker::seed::load_sample_data;
//! use event_tracker::store::{EventStore, EventWindow};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = EventStore::open_in_memory(EventWindow::default())?;
//! let summary = load_sample_data(&store, false).await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

pub mod data;

use crate::store::{
    Dataset, DatasetCounts, EventStore, EventWindow, NewFood, NewOrder, NewRoster, NewStaff,
    NewStation, StoreResult,
};
use chrono::{Duration, NaiveTime};
use serde::Serialize;
use std::fmt;

/// Rows inserted by one seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub counts: DatasetCounts,
    /// Whether the store was cleared first
    pub reset: bool,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reset {
            write!(f, "Dataset replaced. {}", self.counts)
        } else {
            write!(f, "Dataset seeded. {}", self.counts)
        }
    }
}

/// Build the demo dataset for an event window
pub fn sample_dataset(window: &EventWindow, rng: &mut fastrand::Rng) -> Dataset {
    let stations = data::STATIONS.iter().map(|t| NewStation::new(*t)).collect();

    let foods = data::FOODS
        .iter()
        .map(|(station, title, description, price)| {
            let food = NewFood::new(*station, *title, *price);
            match description {
                Some(d) => food.description(*d),
                None => food,
            }
        })
        .collect();

    let staff = data::STAFF.iter().map(|s| NewStaff::new(*s)).collect();

    let rosters = data::ROSTERS
        .iter()
        .map(|row| {
            let day = window.date + Duration::days(row.day);
            let at = |hour: u32| day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour));
            let roster = NewRoster::new(
                row.station,
                row.staff,
                at(row.start_hour),
                at(row.end_hour),
            );
            match row.shift {
                Some(n) => roster.content(format!("{} Shift {}", day.format("%A"), n)),
                None => roster,
            }
        })
        .collect();

    let orders = data::ORDERS
        .iter()
        .map(|(food, quantity, age, postcode)| {
            let hour = rng.u32(window.first_hour..=window.last_hour);
            let minute = rng.u32(0..60);
            NewOrder {
                food: food.to_string(),
                timestamp: window.at(hour, minute),
                quantity: *quantity,
                age: *age,
                postcode: *postcode,
            }
        })
        .collect();

    Dataset {
        stations,
        foods,
        staff,
        rosters,
        orders,
    }
}

/// Seed the store with the demo dataset
///
/// Fails with `StoreError::NotEmpty` on a store that already holds rows
/// unless `reset` is set, in which case the old rows are replaced in the
/// same transaction.
pub async fn load_sample_data(store: &EventStore, reset: bool) -> StoreResult<SeedSummary> {
    seed_with_rng(store, &mut fastrand::Rng::new(), reset).await
}

/// Seed with a caller-supplied RNG so timestamps are reproducible
pub async fn seed_with_rng(
    store: &EventStore,
    rng: &mut fastrand::Rng,
    reset: bool,
) -> StoreResult<SeedSummary> {
    let dataset = sample_dataset(store.window(), rng);

    let counts = if reset {
        store.replace_dataset(&dataset).await?
    } else {
        store.insert_into_empty(&dataset).await?
    };

    tracing::info!(%counts, reset, "Sample data loaded");
    Ok(SeedSummary { counts, reset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use crate::table::Table;
    use chrono::Timelike;
    use std::collections::HashSet;

    fn create_test_store() -> EventStore {
        EventStore::open_in_memory(EventWindow::default()).unwrap()
    }

    #[tokio::test]
    async fn test_seed_counts() {
        let store = create_test_store();
        let summary = load_sample_data(&store, false).await.unwrap();

        assert_eq!(store.count(Table::Food).await.unwrap(), 11);
        assert_eq!(store.count(Table::Station).await.unwrap(), 3);
        assert_eq!(store.count(Table::Staff).await.unwrap(), 4);
        assert_eq!(store.count(Table::Roster).await.unwrap(), 6);
        assert_eq!(store.count(Table::Order).await.unwrap(), 24);
        assert_eq!(summary.counts, store.counts().await.unwrap());
        assert!(!summary.reset);
    }

    #[tokio::test]
    async fn test_seeded_orders_reference_foods() {
        let store = create_test_store();
        load_sample_data(&store, false).await.unwrap();

        let titles: HashSet<String> = store
            .foods()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.title)
            .collect();

        for order in store.orders().await.unwrap() {
            assert!(titles.contains(&order.food), "unknown food {}", order.food);
        }
    }

    #[tokio::test]
    async fn test_seeded_order_hours_in_window() {
        let store = create_test_store();
        load_sample_data(&store, false).await.unwrap();

        for order in store.orders().await.unwrap() {
            let hour = order.timestamp.hour();
            assert!((6..=18).contains(&hour), "hour {} out of range", hour);
            assert_eq!(order.timestamp.date(), store.window().date);
        }
    }

    #[tokio::test]
    async fn test_seeded_rosters_are_ordered_intervals() {
        let store = create_test_store();
        load_sample_data(&store, false).await.unwrap();

        let rosters = store.rosters().await.unwrap();
        for roster in &rosters {
            assert!(roster.start < roster.end);
        }

        let first = &rosters[0];
        assert_eq!(first.staff, "John");
        assert_eq!(first.content.as_deref(), Some("Monday Shift 1"));
        assert_eq!(rosters[1].content.as_deref(), Some("Tuesday Shift 2"));
    }

    #[tokio::test]
    async fn test_seed_non_empty_store_fails() {
        let store = create_test_store();
        load_sample_data(&store, false).await.unwrap();

        let err = load_sample_data(&store, false).await.unwrap_err();
        assert!(matches!(err, StoreError::NotEmpty));

        let stations = store.stations().await.unwrap();
        let matching = stations
            .iter()
            .filter(|s| s.title == "Vietnamese Stall")
            .count();
        assert_eq!(matching, 1);
        assert_eq!(store.count(Table::Order).await.unwrap(), 24);
    }

    #[tokio::test]
    async fn test_seed_with_reset_replaces() {
        let store = create_test_store();
        store
            .insert_stations(&[NewStation::new("Lemonade Stand")])
            .await
            .unwrap();

        let summary = load_sample_data(&store, true).await.unwrap();
        assert!(summary.reset);

        let stations = store.stations().await.unwrap();
        assert_eq!(stations.len(), 3);
        assert!(stations.iter().all(|s| s.title != "Lemonade Stand"));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let window = EventWindow::default();
        let a = sample_dataset(&window, &mut fastrand::Rng::with_seed(7));
        let b = sample_dataset(&window, &mut fastrand::Rng::with_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_lemongrass_chicken_never_ordered() {
        let dataset = sample_dataset(&EventWindow::default(), &mut fastrand::Rng::with_seed(1));
        assert!(dataset.foods.iter().any(|f| f.title == "Lemongrass Chicken"));
        assert!(dataset.orders.iter().all(|o| o.food != "Lemongrass Chicken"));
    }
}
