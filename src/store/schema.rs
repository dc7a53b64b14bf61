//! SQLite schema for one event dataset
//!
//! Uniqueness, references and range checks are declared here as a backstop
//! for the checks the store runs before each insert.

/// Connection settings applied on open
pub const PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA synchronous = NORMAL;
    PRAGMA temp_store = MEMORY;
";

/// Tables, in dependency order
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS stations (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL UNIQUE CHECK (length(trim(title)) > 0)
);

CREATE TABLE IF NOT EXISTS foods (
    id INTEGER PRIMARY KEY,
    station TEXT NOT NULL REFERENCES stations(title),
    title TEXT NOT NULL UNIQUE CHECK (length(trim(title)) > 0),
    description TEXT,
    price TEXT NOT NULL CHECK (length(trim(price)) > 0)
);

CREATE TABLE IF NOT EXISTS staff (
    id INTEGER PRIMARY KEY,
    staff_name TEXT NOT NULL UNIQUE CHECK (length(trim(staff_name)) > 0)
);

CREATE TABLE IF NOT EXISTS rosters (
    id INTEGER PRIMARY KEY,
    station TEXT NOT NULL REFERENCES stations(title),
    staff TEXT NOT NULL REFERENCES staff(staff_name),
    start TEXT NOT NULL,
    "end" TEXT NOT NULL,
    content TEXT,
    CHECK (start < "end")
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY,
    food TEXT NOT NULL REFERENCES foods(title),
    timestamp TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    age INTEGER CHECK (age IS NULL OR age >= 0),
    postcode INTEGER
);

CREATE INDEX IF NOT EXISTS idx_foods_station ON foods(station);
CREATE INDEX IF NOT EXISTS idx_orders_food ON orders(food);
CREATE INDEX IF NOT EXISTS idx_rosters_staff_start ON rosters(staff, start);
"#;

/// Tables in the order rows must be deleted to satisfy foreign keys
pub const DELETE_ORDER: [&str; 5] = ["orders", "rosters", "foods", "staff", "stations"];
