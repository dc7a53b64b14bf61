//! Table Sources
//!
//! Every record kind exposes its schema and a key/value serialization of its
//! rows through [`TableSource`]. Grid views and CSV export are written once
//! against that capability instead of per record kind.

use crate::store::{EventStore, Food, Order, Roster, Staff, Station, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The five record kinds of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Station,
    Food,
    Order,
    Staff,
    Roster,
}

impl Table {
    /// All tables in dependency order
    pub fn all() -> &'static [Table] {
        &[
            Table::Station,
            Table::Food,
            Table::Staff,
            Table::Roster,
            Table::Order,
        ]
    }

    /// Singular name used in APIs and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Station => "station",
            Table::Food => "food",
            Table::Order => "order",
            Table::Staff => "staff",
            Table::Roster => "roster",
        }
    }

    /// Name of the backing SQLite table
    pub fn sql_name(&self) -> &'static str {
        match self {
            Table::Station => "stations",
            Table::Food => "foods",
            Table::Order => "orders",
            Table::Staff => "staff",
            Table::Roster => "rosters",
        }
    }

    /// Column definitions of this table
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Table::Station => Station::columns(),
            Table::Food => Food::columns(),
            Table::Order => Order::columns(),
            Table::Staff => Staff::columns(),
            Table::Roster => Roster::columns(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = StoreError;

    /// Accepts singular or plural names, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "station" | "stations" => Ok(Table::Station),
            "food" | "foods" => Ok(Table::Food),
            "order" | "orders" => Ok(Table::Order),
            "staff" => Ok(Table::Staff),
            "roster" | "rosters" => Ok(Table::Roster),
            _ => Err(StoreError::Validation(format!(
                "Unknown table: {}. Use station, food, order, staff or roster",
                s
            ))),
        }
    }
}

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Text,
    DateTime,
}

/// One column of a table schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub unique: bool,
    /// `table.column` this column refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<&'static str>,
}

impl Column {
    const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            unique: false,
            references: None,
        }
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    const fn references(mut self, target: &'static str) -> Self {
        self.references = Some(target);
        self
    }
}

const ID: Column = Column::new("id", ColumnKind::Integer).unique();

const STATION_COLUMNS: [Column; 2] = [ID, Column::new("title", ColumnKind::Text).unique()];

const FOOD_COLUMNS: [Column; 5] = [
    ID,
    Column::new("station", ColumnKind::Text).references("station.title"),
    Column::new("title", ColumnKind::Text).unique(),
    Column::new("description", ColumnKind::Text).nullable(),
    Column::new("price", ColumnKind::Text),
];

const ORDER_COLUMNS: [Column; 6] = [
    ID,
    Column::new("food", ColumnKind::Text).references("food.title"),
    Column::new("timestamp", ColumnKind::DateTime),
    Column::new("quantity", ColumnKind::Integer),
    Column::new("age", ColumnKind::Integer).nullable(),
    Column::new("postcode", ColumnKind::Integer).nullable(),
];

const STAFF_COLUMNS: [Column; 2] = [ID, Column::new("staff_name", ColumnKind::Text).unique()];

const ROSTER_COLUMNS: [Column; 6] = [
    ID,
    Column::new("station", ColumnKind::Text).references("station.title"),
    Column::new("staff", ColumnKind::Text).references("staff.staff_name"),
    Column::new("start", ColumnKind::DateTime),
    Column::new("end", ColumnKind::DateTime),
    Column::new("content", ColumnKind::Text).nullable(),
];

/// Schema plus row serialization for one record kind
pub trait TableSource: Serialize {
    const TABLE: Table;

    fn columns() -> &'static [Column];

    /// Plain key/value mapping of this row's fields
    fn to_row(&self) -> StoreResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Serialization(format!(
                "{} row serialized to {} instead of an object",
                Self::TABLE,
                other
            ))),
        }
    }

    /// Field values as text, in column order
    fn to_record(&self) -> StoreResult<Vec<String>> {
        let row = self.to_row()?;
        Ok(Self::columns()
            .iter()
            .map(|column| match row.get(column.name) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect())
    }
}

impl TableSource for Station {
    const TABLE: Table = Table::Station;

    fn columns() -> &'static [Column] {
        &STATION_COLUMNS
    }
}

impl TableSource for Food {
    const TABLE: Table = Table::Food;

    fn columns() -> &'static [Column] {
        &FOOD_COLUMNS
    }
}

impl TableSource for Order {
    const TABLE: Table = Table::Order;

    fn columns() -> &'static [Column] {
        &ORDER_COLUMNS
    }
}

impl TableSource for Staff {
    const TABLE: Table = Table::Staff;

    fn columns() -> &'static [Column] {
        &STAFF_COLUMNS
    }
}

impl TableSource for Roster {
    const TABLE: Table = Table::Roster;

    fn columns() -> &'static [Column] {
        &ROSTER_COLUMNS
    }
}

/// A grid over one table: its columns and every row as a key/value map
#[derive(Debug, Clone, Serialize)]
pub struct GridView {
    pub table: Table,
    pub columns: Vec<Column>,
    pub rows: Vec<Map<String, Value>>,
    pub total: usize,
}

impl GridView {
    pub fn from_rows<T: TableSource>(rows: &[T]) -> StoreResult<Self> {
        Ok(Self {
            table: T::TABLE,
            columns: T::columns().to_vec(),
            rows: rows
                .iter()
                .map(TableSource::to_row)
                .collect::<StoreResult<_>>()?,
            total: rows.len(),
        })
    }
}

/// Render rows as CSV with a header of column names
pub fn to_csv<T: TableSource>(rows: &[T]) -> StoreResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::columns().iter().map(|c| c.name))?;
    for row in rows {
        writer.write_record(row.to_record()?)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Load the grid view of a table from the store
pub async fn load_grid(store: &EventStore, table: Table) -> StoreResult<GridView> {
    match table {
        Table::Station => GridView::from_rows(&store.stations().await?),
        Table::Food => GridView::from_rows(&store.foods().await?),
        Table::Order => GridView::from_rows(&store.orders().await?),
        Table::Staff => GridView::from_rows(&store.staff().await?),
        Table::Roster => GridView::from_rows(&store.rosters().await?),
    }
}

/// Export a table from the store as CSV
pub async fn export_csv(store: &EventStore, table: Table) -> StoreResult<String> {
    match table {
        Table::Station => to_csv(&store.stations().await?),
        Table::Food => to_csv(&store.foods().await?),
        Table::Order => to_csv(&store.orders().await?),
        Table::Staff => to_csv(&store.staff().await?),
        Table::Roster => to_csv(&store.rosters().await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventWindow;

    fn sample_order() -> Order {
        Order {
            id: 7,
            food: "Pho".to_string(),
            timestamp: EventWindow::default().at(12, 15),
            quantity: 2,
            age: Some(31),
            postcode: None,
        }
    }

    #[test]
    fn test_parse_table() {
        assert_eq!("station".parse::<Table>().unwrap(), Table::Station);
        assert_eq!("Orders".parse::<Table>().unwrap(), Table::Order);
        assert_eq!("staff".parse::<Table>().unwrap(), Table::Staff);
        assert!("entry".parse::<Table>().is_err());
    }

    #[test]
    fn test_row_keys_match_columns() {
        let row = sample_order().to_row().unwrap();
        let names: Vec<&str> = Order::columns().iter().map(|c| c.name).collect();

        assert_eq!(row.len(), names.len());
        for name in names {
            assert!(row.contains_key(name), "missing column {}", name);
        }
    }

    #[test]
    fn test_to_record() {
        let record = sample_order().to_record().unwrap();
        assert_eq!(
            record,
            vec!["7", "Pho", "2017-01-02T12:15:00", "2", "31", ""]
        );
    }

    #[test]
    fn test_to_csv() {
        let stations = vec![
            Station {
                id: 1,
                title: "Vietnamese Stall".to_string(),
            },
            Station {
                id: 2,
                title: "Pizza, Pasta & Co".to_string(),
            },
        ];

        let csv = to_csv(&stations).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,title");
        assert_eq!(lines[1], "1,Vietnamese Stall");
        assert_eq!(lines[2], "2,\"Pizza, Pasta & Co\"");
    }

    #[test]
    fn test_grid_view() {
        let grid = GridView::from_rows(&[sample_order()]).unwrap();
        assert_eq!(grid.table, Table::Order);
        assert_eq!(grid.total, 1);
        assert_eq!(grid.columns.len(), 6);
        assert_eq!(grid.rows[0]["food"], "Pho");
    }

    #[derive(Serialize)]
    struct BareValue(u32);

    impl TableSource for BareValue {
        const TABLE: Table = Table::Staff;

        fn columns() -> &'static [Column] {
            &STAFF_COLUMNS
        }
    }

    #[test]
    fn test_non_object_row_is_an_error() {
        let err = BareValue(3).to_row().unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
        assert!(to_csv(&[BareValue(3)]).is_err());
    }

    #[test]
    fn test_every_table_has_id_column() {
        for table in Table::all() {
            assert_eq!(table.columns()[0].name, "id");
        }
    }
}
