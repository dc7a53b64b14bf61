//! Write-time validation and inserts for each record kind
//!
//! Every check runs inside the caller's transaction, so rows inserted
//! earlier in the same batch are visible to later ones.

use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{EventWindow, NewFood, NewOrder, NewRoster, NewStaff, NewStation};
use crate::table::Table;
use rusqlite::{params, OptionalExtension, Transaction};

/// An insert form that can be validated and written inside a transaction
pub(crate) trait Insertable {
    const TABLE: Table;

    fn validate(&self, tx: &Transaction<'_>, window: &EventWindow) -> StoreResult<()>;

    /// Write the row, returning its id
    fn insert(&self, tx: &Transaction<'_>) -> StoreResult<i64>;
}

/// Validate and insert every row of a batch, stopping at the first failure
pub(crate) fn insert_all<T: Insertable>(
    tx: &Transaction<'_>,
    rows: &[T],
    window: &EventWindow,
) -> StoreResult<Vec<i64>> {
    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        row.validate(tx, window)?;
        ids.push(row.insert(tx)?);
    }
    Ok(ids)
}

fn exists(tx: &Transaction<'_>, target: Table, column: &str, value: &str) -> StoreResult<bool> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
        target.sql_name(),
        column
    );
    let found = tx
        .prepare_cached(&sql)?
        .query_row(params![value], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn require_text(table: Table, field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!(
            "{}.{} cannot be empty",
            table, field
        )));
    }
    Ok(())
}

fn require_unique(tx: &Transaction<'_>, table: Table, column: &str, key: &str) -> StoreResult<()> {
    if exists(tx, table, column, key)? {
        return Err(StoreError::Duplicate {
            table,
            key: key.to_string(),
        });
    }
    Ok(())
}

fn require_reference(
    tx: &Transaction<'_>,
    table: Table,
    field: &'static str,
    value: &str,
    target: Table,
    column: &str,
) -> StoreResult<()> {
    if !exists(tx, target, column, value)? {
        return Err(StoreError::DanglingReference {
            table,
            field,
            value: value.to_string(),
            target,
        });
    }
    Ok(())
}

impl Insertable for NewStation {
    const TABLE: Table = Table::Station;

    fn validate(&self, tx: &Transaction<'_>, _window: &EventWindow) -> StoreResult<()> {
        require_text(Self::TABLE, "title", &self.title)?;
        require_unique(tx, Self::TABLE, "title", &self.title)
    }

    fn insert(&self, tx: &Transaction<'_>) -> StoreResult<i64> {
        tx.prepare_cached("INSERT INTO stations (title) VALUES (?1)")?
            .execute(params![self.title])?;
        Ok(tx.last_insert_rowid())
    }
}

impl Insertable for NewFood {
    const TABLE: Table = Table::Food;

    fn validate(&self, tx: &Transaction<'_>, _window: &EventWindow) -> StoreResult<()> {
        require_text(Self::TABLE, "title", &self.title)?;
        require_text(Self::TABLE, "price", &self.price)?;
        require_reference(
            tx,
            Self::TABLE,
            "station",
            &self.station,
            Table::Station,
            "title",
        )?;
        // Orders reference foods by title alone
        require_unique(tx, Self::TABLE, "title", &self.title)
    }

    fn insert(&self, tx: &Transaction<'_>) -> StoreResult<i64> {
        tx.prepare_cached(
            "INSERT INTO foods (station, title, description, price) VALUES (?1, ?2, ?3, ?4)",
        )?
        .execute(params![self.station, self.title, self.description, self.price])?;
        Ok(tx.last_insert_rowid())
    }
}

impl Insertable for NewOrder {
    const TABLE: Table = Table::Order;

    fn validate(&self, tx: &Transaction<'_>, window: &EventWindow) -> StoreResult<()> {
        if !window.contains(&self.timestamp) {
            return Err(StoreError::Validation(format!(
                "order timestamp {} is outside the event window {}",
                self.timestamp, window
            )));
        }
        require_reference(tx, Self::TABLE, "food", &self.food, Table::Food, "title")
    }

    fn insert(&self, tx: &Transaction<'_>) -> StoreResult<i64> {
        tx.prepare_cached(
            "INSERT INTO orders (food, timestamp, quantity, age, postcode)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?
        .execute(params![
            self.food,
            self.timestamp,
            self.quantity,
            self.age,
            self.postcode
        ])?;
        Ok(tx.last_insert_rowid())
    }
}

impl Insertable for NewStaff {
    const TABLE: Table = Table::Staff;

    fn validate(&self, tx: &Transaction<'_>, _window: &EventWindow) -> StoreResult<()> {
        require_text(Self::TABLE, "staff_name", &self.staff_name)?;
        require_unique(tx, Self::TABLE, "staff_name", &self.staff_name)
    }

    fn insert(&self, tx: &Transaction<'_>) -> StoreResult<i64> {
        tx.prepare_cached("INSERT INTO staff (staff_name) VALUES (?1)")?
            .execute(params![self.staff_name])?;
        Ok(tx.last_insert_rowid())
    }
}

impl Insertable for NewRoster {
    const TABLE: Table = Table::Roster;

    fn validate(&self, tx: &Transaction<'_>, _window: &EventWindow) -> StoreResult<()> {
        if self.start >= self.end {
            return Err(StoreError::Validation(format!(
                "roster start {} must be before end {}",
                self.start, self.end
            )));
        }
        require_reference(
            tx,
            Self::TABLE,
            "station",
            &self.station,
            Table::Station,
            "title",
        )?;
        require_reference(
            tx,
            Self::TABLE,
            "staff",
            &self.staff,
            Table::Staff,
            "staff_name",
        )
    }

    fn insert(&self, tx: &Transaction<'_>) -> StoreResult<i64> {
        tx.prepare_cached(
            r#"INSERT INTO rosters (station, staff, start, "end", content)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )?
        .execute(params![
            self.station,
            self.staff,
            self.start,
            self.end,
            self.content
        ])?;
        Ok(tx.last_insert_rowid())
    }
}
