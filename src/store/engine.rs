//! Event Store
//!
//! One SQLite database holds one event dataset. The store owns a single
//! connection behind Tokio's async Mutex; every public operation takes the
//! lock once and runs as one transaction, so a failing batch leaves no rows
//! behind.

use crate::config::StoreConfig;
use crate::store::error::{StoreError, StoreResult};
use crate::store::insert::{insert_all, Insertable};
use crate::store::schema::{DELETE_ORDER, PRAGMAS, SCHEMA};
use crate::store::types::{
    Dataset, DatasetCounts, EventWindow, Food, NewFood, NewOrder, NewRoster, NewStaff, NewStation,
    Order, Roster, Staff, Station,
};
use crate::table::Table;
use rusqlite::{Connection, OpenFlags, Row, Transaction};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// SQLite-backed store for one event dataset
pub struct EventStore {
    conn: Mutex<Connection>,
    window: EventWindow,
    path: Option<PathBuf>,
}

impl EventStore {
    /// Open (or create) the dataset database named by the config
    pub fn open(config: &StoreConfig, window: EventWindow) -> StoreResult<Self> {
        let path = config.database_path();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;

        let store = Self::with_connection(conn, window, Some(path))?;
        tracing::info!(path = ?store.path, window = %window, "Opened event store");
        Ok(store)
    }

    /// Open a throwaway in-memory dataset
    pub fn open_in_memory(window: EventWindow) -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?, window, None)
    }

    fn with_connection(
        conn: Connection,
        window: EventWindow,
        path: Option<PathBuf>,
    ) -> StoreResult<Self> {
        conn.execute_batch(PRAGMAS)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
            window,
            path,
        })
    }

    /// The event window orders are checked against
    pub fn window(&self) -> &EventWindow {
        &self.window
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ============================================
    // INSERTS
    // ============================================

    pub async fn insert_stations(&self, rows: &[NewStation]) -> StoreResult<Vec<i64>> {
        self.insert_batch(rows).await
    }

    pub async fn insert_foods(&self, rows: &[NewFood]) -> StoreResult<Vec<i64>> {
        self.insert_batch(rows).await
    }

    pub async fn insert_orders(&self, rows: &[NewOrder]) -> StoreResult<Vec<i64>> {
        self.insert_batch(rows).await
    }

    pub async fn insert_staff(&self, rows: &[NewStaff]) -> StoreResult<Vec<i64>> {
        self.insert_batch(rows).await
    }

    pub async fn insert_rosters(&self, rows: &[NewRoster]) -> StoreResult<Vec<i64>> {
        self.insert_batch(rows).await
    }

    async fn insert_batch<T: Insertable>(&self, rows: &[T]) -> StoreResult<Vec<i64>> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let ids = insert_all(&tx, rows, &self.window)?;
        tx.commit()?;

        let table = T::TABLE;
        tracing::debug!(table = %table, rows = ids.len(), "Inserted batch");
        Ok(ids)
    }

    /// Insert every kind of a dataset in one transaction
    pub async fn insert_dataset(&self, dataset: &Dataset) -> StoreResult<DatasetCounts> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        insert_dataset_tx(&tx, dataset, &self.window)?;
        tx.commit()?;

        let counts = dataset.counts();
        tracing::info!(%counts, "Inserted dataset");
        Ok(counts)
    }

    /// Insert a dataset, failing with [`StoreError::NotEmpty`] if any rows exist
    pub async fn insert_into_empty(&self, dataset: &Dataset) -> StoreResult<DatasetCounts> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        if counts_tx(&tx)?.total() > 0 {
            return Err(StoreError::NotEmpty);
        }
        insert_dataset_tx(&tx, dataset, &self.window)?;
        tx.commit()?;

        let counts = dataset.counts();
        tracing::info!(%counts, "Loaded dataset into empty store");
        Ok(counts)
    }

    /// Clear the dataset and insert a new one in one transaction
    pub async fn replace_dataset(&self, dataset: &Dataset) -> StoreResult<DatasetCounts> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        clear_tx(&tx)?;
        insert_dataset_tx(&tx, dataset, &self.window)?;
        tx.commit()?;

        let counts = dataset.counts();
        tracing::info!(%counts, "Replaced dataset");
        Ok(counts)
    }

    /// Delete every row of every table
    pub async fn reset(&self) -> StoreResult<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        clear_tx(&tx)?;
        tx.commit()?;

        tracing::info!("Dataset reset");
        Ok(())
    }

    // ============================================
    // READS
    // ============================================

    pub async fn stations(&self) -> StoreResult<Vec<Station>> {
        self.select_all(SELECT_STATIONS, Station::from_row).await
    }

    pub async fn foods(&self) -> StoreResult<Vec<Food>> {
        self.select_all(SELECT_FOODS, Food::from_row).await
    }

    pub async fn orders(&self) -> StoreResult<Vec<Order>> {
        self.select_all(SELECT_ORDERS, Order::from_row).await
    }

    pub async fn staff(&self) -> StoreResult<Vec<Staff>> {
        self.select_all(SELECT_STAFF, Staff::from_row).await
    }

    pub async fn rosters(&self) -> StoreResult<Vec<Roster>> {
        self.select_all(SELECT_ROSTERS, Roster::from_row).await
    }

    async fn select_all<T>(&self, sql: &str, map_row: RowMapper<T>) -> StoreResult<Vec<T>> {
        let conn = self.conn.lock().await;
        select_rows(&conn, sql, map_row)
    }

    /// Number of rows in one table
    pub async fn count(&self, table: Table) -> StoreResult<usize> {
        let conn = self.conn.lock().await;
        count_table(&conn, table)
    }

    /// Row counts of every table
    pub async fn counts(&self) -> StoreResult<DatasetCounts> {
        let conn = self.conn.lock().await;
        counts_tx(&conn)
    }

    /// True when every table is empty
    pub async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.counts().await?.total() == 0)
    }

    /// Current contents as insert forms, ready to re-import elsewhere
    ///
    /// All five tables are read from one transaction, so concurrent writes
    /// never show up half-applied in the export.
    pub async fn export_dataset(&self) -> StoreResult<Dataset> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let stations = select_rows(&tx, SELECT_STATIONS, Station::from_row)?;
        let foods = select_rows(&tx, SELECT_FOODS, Food::from_row)?;
        let staff = select_rows(&tx, SELECT_STAFF, Staff::from_row)?;
        let rosters = select_rows(&tx, SELECT_ROSTERS, Roster::from_row)?;
        let orders = select_rows(&tx, SELECT_ORDERS, Order::from_row)?;
        tx.commit()?;

        Ok(Dataset {
            stations: stations.iter().map(NewStation::from).collect(),
            foods: foods.iter().map(NewFood::from).collect(),
            staff: staff.iter().map(NewStaff::from).collect(),
            rosters: rosters.iter().map(NewRoster::from).collect(),
            orders: orders.iter().map(NewOrder::from).collect(),
        })
    }
}

type RowMapper<T> = fn(&Row<'_>) -> rusqlite::Result<T>;

const SELECT_STATIONS: &str = "SELECT id, title FROM stations ORDER BY id";
const SELECT_FOODS: &str = "SELECT id, station, title, description, price FROM foods ORDER BY id";
const SELECT_ORDERS: &str =
    "SELECT id, food, timestamp, quantity, age, postcode FROM orders ORDER BY id";
const SELECT_STAFF: &str = "SELECT id, staff_name FROM staff ORDER BY id";
const SELECT_ROSTERS: &str =
    r#"SELECT id, station, staff, start, "end", content FROM rosters ORDER BY id"#;

fn select_rows<T>(conn: &Connection, sql: &str, map_row: RowMapper<T>) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<T>>>()?)
}

fn insert_dataset_tx(
    tx: &Transaction<'_>,
    dataset: &Dataset,
    window: &EventWindow,
) -> StoreResult<()> {
    insert_all(tx, &dataset.stations, window)?;
    insert_all(tx, &dataset.foods, window)?;
    insert_all(tx, &dataset.staff, window)?;
    insert_all(tx, &dataset.rosters, window)?;
    insert_all(tx, &dataset.orders, window)?;
    Ok(())
}

fn clear_tx(tx: &Transaction<'_>) -> StoreResult<()> {
    for table in DELETE_ORDER {
        tx.execute(&format!("DELETE FROM {}", table), [])?;
    }
    Ok(())
}

fn count_table(conn: &Connection, table: Table) -> StoreResult<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.sql_name());
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as usize)
}

fn counts_tx(conn: &Connection) -> StoreResult<DatasetCounts> {
    Ok(DatasetCounts {
        stations: count_table(conn, Table::Station)?,
        foods: count_table(conn, Table::Food)?,
        orders: count_table(conn, Table::Order)?,
        staff: count_table(conn, Table::Staff)?,
        rosters: count_table(conn, Table::Roster)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_store() -> EventStore {
        EventStore::open_in_memory(EventWindow::default()).unwrap()
    }

    async fn create_stocked_store() -> EventStore {
        let store = create_test_store();
        store
            .insert_stations(&[NewStation::new("Vietnamese Stall")])
            .await
            .unwrap();
        store
            .insert_foods(&[
                NewFood::new("Vietnamese Stall", "Pho", "12.50").description("Beef noodle soup"),
                NewFood::new("Vietnamese Stall", "Banh Mi", "9.00"),
            ])
            .await
            .unwrap();
        store.insert_staff(&[NewStaff::new("John")]).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_and_list_stations() {
        let store = create_test_store();

        let ids = store
            .insert_stations(&[
                NewStation::new("Vietnamese Stall"),
                NewStation::new("Pizza Stand"),
            ])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let stations = store.stations().await.unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].title, "Vietnamese Stall");
        assert_eq!(stations[1].title, "Pizza Stand");
        assert_eq!(store.count(Table::Station).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_station_rejected() {
        let store = create_test_store();
        store
            .insert_stations(&[NewStation::new("Vietnamese Stall")])
            .await
            .unwrap();

        let err = store
            .insert_stations(&[NewStation::new("Vietnamese Stall")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate {
                table: Table::Station,
                ..
            }
        ));

        let stations = store.stations().await.unwrap();
        let matching = stations
            .iter()
            .filter(|s| s.title == "Vietnamese Stall")
            .count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn test_duplicate_in_batch_rolls_back_whole_batch() {
        let store = create_test_store();

        let result = store
            .insert_staff(&[
                NewStaff::new("John"),
                NewStaff::new("Sarah"),
                NewStaff::new("John"),
            ])
            .await;
        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
        assert_eq!(store.count(Table::Staff).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_food_requires_existing_station() {
        let store = create_test_store();

        let err = store
            .insert_foods(&[NewFood::new("Nowhere", "Pho", "12.50")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DanglingReference {
                table: Table::Food,
                field: "station",
                target: Table::Station,
                ..
            }
        ));
        assert_eq!(store.count(Table::Food).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_food_title_rejected() {
        let store = create_stocked_store().await;
        store
            .insert_stations(&[NewStation::new("Pizza Stand")])
            .await
            .unwrap();

        let err = store
            .insert_foods(&[NewFood::new("Pizza Stand", "Pho", "10.00")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate {
                table: Table::Food,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_order_requires_existing_food() {
        let store = create_stocked_store().await;
        let window = *store.window();

        let result = store
            .insert_orders(&[
                NewOrder::new("Pho", window.at(9, 0), 1),
                NewOrder::new("Sushi", window.at(9, 5), 1),
            ])
            .await;
        assert!(matches!(
            result,
            Err(StoreError::DanglingReference {
                table: Table::Order,
                field: "food",
                ..
            })
        ));

        // First order of the failed batch is rolled back too
        assert_eq!(store.count(Table::Order).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_order_outside_window_rejected() {
        let store = create_stocked_store().await;
        let window = *store.window();

        let too_early = store
            .insert_orders(&[NewOrder::new("Pho", window.at(5, 30), 1)])
            .await;
        assert!(matches!(too_early, Err(StoreError::Validation(_))));

        let next_day = window.next_day().and_hms_opt(10, 0, 0).unwrap();
        let wrong_day = store
            .insert_orders(&[NewOrder::new("Pho", next_day, 1)])
            .await;
        assert!(matches!(wrong_day, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_zero_quantity_order_accepted() {
        let store = create_stocked_store().await;
        let window = *store.window();

        store
            .insert_orders(&[NewOrder::new("Banh Mi", window.at(18, 45), 0)
                .age(40)
                .postcode(4101)])
            .await
            .unwrap();

        let orders = store.orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, 0);
        assert_eq!(orders[0].age, Some(40));
        assert_eq!(orders[0].postcode, Some(4101));
        assert_eq!(orders[0].timestamp, window.at(18, 45));
    }

    #[tokio::test]
    async fn test_roster_validation() {
        let store = create_stocked_store().await;
        let window = *store.window();

        let backwards = store
            .insert_rosters(&[NewRoster::new(
                "Vietnamese Stall",
                "John",
                window.at(12, 0),
                window.at(7, 0),
            )])
            .await;
        assert!(matches!(backwards, Err(StoreError::Validation(_))));

        let empty = store
            .insert_rosters(&[NewRoster::new(
                "Vietnamese Stall",
                "John",
                window.at(12, 0),
                window.at(12, 0),
            )])
            .await;
        assert!(matches!(empty, Err(StoreError::Validation(_))));

        let unknown_staff = store
            .insert_rosters(&[NewRoster::new(
                "Vietnamese Stall",
                "Nobody",
                window.at(7, 0),
                window.at(12, 0),
            )])
            .await;
        assert!(matches!(
            unknown_staff,
            Err(StoreError::DanglingReference {
                field: "staff",
                target: Table::Staff,
                ..
            })
        ));

        store
            .insert_rosters(&[NewRoster::new(
                "Vietnamese Stall",
                "John",
                window.at(7, 0),
                window.at(12, 0),
            )
            .content("Monday Shift 1")])
            .await
            .unwrap();

        let rosters = store.rosters().await.unwrap();
        assert_eq!(rosters.len(), 1);
        assert_eq!(rosters[0].content.as_deref(), Some("Monday Shift 1"));
        assert_eq!(rosters[0].duration(), chrono::Duration::hours(5));
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let store = create_test_store();

        let result = store.insert_stations(&[NewStation::new("   ")]).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_insert_dataset_in_dependency_order() {
        let store = create_test_store();
        let window = *store.window();

        let dataset = Dataset {
            stations: vec![NewStation::new("Coffee Cart")],
            foods: vec![NewFood::new("Coffee Cart", "Flat White", "4.50")],
            staff: vec![NewStaff::new("Mei")],
            rosters: vec![NewRoster::new(
                "Coffee Cart",
                "Mei",
                window.at(6, 0),
                window.at(12, 0),
            )],
            orders: vec![NewOrder::new("Flat White", window.at(6, 30), 2)],
        };

        let counts = store.insert_dataset(&dataset).await.unwrap();
        assert_eq!(counts.total(), 5);
        assert_eq!(store.counts().await.unwrap(), counts);

        let exported = store.export_dataset().await.unwrap();
        assert_eq!(exported, dataset);
    }

    #[tokio::test]
    async fn test_insert_dataset_is_atomic() {
        let store = create_test_store();
        let window = *store.window();

        let dataset = Dataset {
            stations: vec![NewStation::new("Coffee Cart")],
            foods: vec![NewFood::new("Coffee Cart", "Flat White", "4.50")],
            orders: vec![NewOrder::new("Long Black", window.at(6, 30), 1)],
            ..Default::default()
        };

        assert!(store.insert_dataset(&dataset).await.is_err());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_into_empty_and_replace() {
        let store = create_test_store();
        let dataset = Dataset {
            stations: vec![NewStation::new("Pizza Stand")],
            ..Default::default()
        };

        store.insert_into_empty(&dataset).await.unwrap();

        let err = store.insert_into_empty(&dataset).await.unwrap_err();
        assert!(matches!(err, StoreError::NotEmpty));
        assert_eq!(store.count(Table::Station).await.unwrap(), 1);

        store.replace_dataset(&dataset).await.unwrap();
        assert_eq!(store.count(Table::Station).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reset() {
        let store = create_stocked_store().await;
        assert!(!store.is_empty().await.unwrap());

        store.reset().await.unwrap();
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_export_is_consistent_under_concurrent_writes() {
        let store = std::sync::Arc::new(create_test_store());
        let window = *store.window();
        store
            .insert_stations(&[NewStation::new("Coffee Cart")])
            .await
            .unwrap();

        let writer = {
            let store = std::sync::Arc::clone(&store);
            tokio::spawn(async move {
                for i in 0..300 {
                    let food = format!("Special {}", i);
                    let dataset = Dataset {
                        foods: vec![NewFood::new("Coffee Cart", food.as_str(), "5.00")],
                        orders: vec![NewOrder::new(food.as_str(), window.at(9, 0), 1)],
                        ..Default::default()
                    };
                    store.insert_dataset(&dataset).await.unwrap();
                }
            })
        };

        let mut exports = Vec::new();
        while !writer.is_finished() {
            exports.push(store.export_dataset().await.unwrap());
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();
        exports.push(store.export_dataset().await.unwrap());

        for export in &exports {
            assert_eq!(export.foods.len(), export.orders.len());
            for order in &export.orders {
                assert!(
                    export.foods.iter().any(|f| f.title == order.food),
                    "order for {} exported without its food",
                    order.food
                );
            }
        }

        // Every export re-imports cleanly into a fresh store
        for export in exports.iter().step_by(10) {
            let copy = create_test_store();
            copy.insert_dataset(export).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_persistence() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("events.db"));

        {
            let store = EventStore::open(&config, EventWindow::default()).unwrap();
            store
                .insert_stations(&[NewStation::new("Vietnamese Stall")])
                .await
                .unwrap();
            store.insert_staff(&[NewStaff::new("Sarah")]).await.unwrap();
        }

        {
            let store = EventStore::open(&config, EventWindow::default()).unwrap();
            let counts = store.counts().await.unwrap();
            assert_eq!(counts.stations, 1);
            assert_eq!(counts.staff, 1);
            assert_eq!(store.path(), Some(config.database_path().as_path()));
        }
    }
}
