//! Core record types for the event dataset
//!
//! Each record kind comes in two shapes:
//! - the stored row (`Station`, `Food`, ...) carrying the store-assigned `id`
//! - the insert form (`NewStation`, `NewFood`, ...) accepted by batch inserts
//!
//! `EventWindow` describes when orders may happen and `Dataset` bundles
//! insert forms of all five kinds for seeding, import and export.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stall or attraction at the event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    pub id: i64,
    /// Stall name, unique within the dataset
    pub title: String,
}

/// Insert form of [`Station`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewStation {
    pub title: String,
}

impl NewStation {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// A food item sold at a station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Food {
    pub id: i64,
    /// Title of the owning station
    pub station: String,
    /// Food name, referenced directly by orders
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Kept as text, no float handling
    pub price: String,
}

/// Insert form of [`Food`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFood {
    pub station: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: String,
}

impl NewFood {
    pub fn new(
        station: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            station: station.into(),
            title: title.into(),
            description: None,
            price: price.into(),
        }
    }

    /// Builder method: set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One purchase of a single food type
///
/// A quantity of zero records an order row where nothing was bought.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    /// Title of the food bought
    pub food: String,
    pub timestamp: NaiveDateTime,
    pub quantity: u32,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub postcode: Option<u32>,
}

/// Insert form of [`Order`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewOrder {
    pub food: String,
    pub timestamp: NaiveDateTime,
    pub quantity: u32,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub postcode: Option<u32>,
}

impl NewOrder {
    pub fn new(food: impl Into<String>, timestamp: NaiveDateTime, quantity: u32) -> Self {
        Self {
            food: food.into(),
            timestamp,
            quantity,
            age: None,
            postcode: None,
        }
    }

    /// Builder method: set customer age
    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Builder method: set customer postcode
    pub fn postcode(mut self, postcode: u32) -> Self {
        self.postcode = Some(postcode);
        self
    }
}

/// A member of staff
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Staff {
    pub id: i64,
    /// Unique within the dataset
    pub staff_name: String,
}

/// Insert form of [`Staff`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewStaff {
    pub staff_name: String,
}

impl NewStaff {
    pub fn new(staff_name: impl Into<String>) -> Self {
        Self {
            staff_name: staff_name.into(),
        }
    }
}

/// Assignment of one staff member to one station for `[start, end)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roster {
    pub id: i64,
    pub station: String,
    pub staff: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Free-text shift label
    #[serde(default)]
    pub content: Option<String>,
}

/// Insert form of [`Roster`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRoster {
    pub station: String,
    pub staff: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewRoster {
    pub fn new(
        station: impl Into<String>,
        staff: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            station: station.into(),
            staff: staff.into(),
            start,
            end,
            content: None,
        }
    }

    /// Builder method: set shift label
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl Station {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
        })
    }
}

impl Food {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            station: row.get("station")?,
            title: row.get("title")?,
            description: row.get("description")?,
            price: row.get("price")?,
        })
    }
}

impl Order {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            food: row.get("food")?,
            timestamp: row.get("timestamp")?,
            quantity: row.get("quantity")?,
            age: row.get("age")?,
            postcode: row.get("postcode")?,
        })
    }
}

impl Staff {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            staff_name: row.get("staff_name")?,
        })
    }
}

impl Roster {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            station: row.get("station")?,
            staff: row.get("staff")?,
            start: row.get("start")?,
            end: row.get("end")?,
            content: row.get("content")?,
        })
    }

    /// Length of the shift
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl From<&Station> for NewStation {
    fn from(station: &Station) -> Self {
        Self::new(station.title.clone())
    }
}

impl From<&Food> for NewFood {
    fn from(food: &Food) -> Self {
        Self {
            station: food.station.clone(),
            title: food.title.clone(),
            description: food.description.clone(),
            price: food.price.clone(),
        }
    }
}

impl From<&Order> for NewOrder {
    fn from(order: &Order) -> Self {
        Self {
            food: order.food.clone(),
            timestamp: order.timestamp,
            quantity: order.quantity,
            age: order.age,
            postcode: order.postcode,
        }
    }
}

impl From<&Staff> for NewStaff {
    fn from(staff: &Staff) -> Self {
        Self::new(staff.staff_name.clone())
    }
}

impl From<&Roster> for NewRoster {
    fn from(roster: &Roster) -> Self {
        Self {
            station: roster.station.clone(),
            staff: roster.staff.clone(),
            start: roster.start,
            end: roster.end,
            content: roster.content.clone(),
        }
    }
}

/// The event's operating window: one calendar date and an inclusive hour range
///
/// An order at `t` is inside the window iff `t.date() == date` and
/// `first_hour <= t.hour() <= last_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub date: NaiveDate,
    pub first_hour: u32,
    pub last_hour: u32,
}

impl Default for EventWindow {
    fn default() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(2017, 1, 2).expect("2017-01-02 is a valid date"),
            first_hour: 6,
            last_hour: 18,
        }
    }
}

impl EventWindow {
    pub fn new(date: NaiveDate, first_hour: u32, last_hour: u32) -> Self {
        Self {
            date,
            first_hour,
            last_hour,
        }
    }

    /// Check whether a timestamp falls inside the window
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        timestamp.date() == self.date
            && (self.first_hour..=self.last_hour).contains(&timestamp.hour())
    }

    /// Timestamp on the event date at `hour:minute`
    pub fn at(&self, hour: u32, minute: u32) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
            + Duration::hours(i64::from(hour))
            + Duration::minutes(i64::from(minute))
    }

    /// Day of the week the event runs on (e.g. "Monday")
    pub fn weekday_name(&self) -> String {
        self.date.format("%A").to_string()
    }

    /// The calendar day after the event date
    pub fn next_day(&self) -> NaiveDate {
        self.date + Duration::days(1)
    }
}

impl fmt::Display for EventWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:00-{:02}:59",
            self.date, self.first_hour, self.last_hour
        )
    }
}

/// Insert forms for every record kind of one dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    #[serde(default)]
    pub stations: Vec<NewStation>,
    #[serde(default)]
    pub foods: Vec<NewFood>,
    #[serde(default)]
    pub staff: Vec<NewStaff>,
    #[serde(default)]
    pub rosters: Vec<NewRoster>,
    #[serde(default)]
    pub orders: Vec<NewOrder>,
}

impl Dataset {
    /// Total number of rows across all kinds
    pub fn len(&self) -> usize {
        self.stations.len()
            + self.foods.len()
            + self.staff.len()
            + self.rosters.len()
            + self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> DatasetCounts {
        DatasetCounts {
            stations: self.stations.len(),
            foods: self.foods.len(),
            orders: self.orders.len(),
            staff: self.staff.len(),
            rosters: self.rosters.len(),
        }
    }
}

/// Row counts per record kind
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetCounts {
    pub stations: usize,
    pub foods: usize,
    pub orders: usize,
    pub staff: usize,
    pub rosters: usize,
}

impl DatasetCounts {
    pub fn total(&self) -> usize {
        self.stations + self.foods + self.orders + self.staff + self.rosters
    }
}

impl fmt::Display for DatasetCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stations: {}, Foods: {}, Orders: {}, Staff: {}, Rosters: {}",
            self.stations, self.foods, self.orders, self.staff, self.rosters
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_contains() {
        let window = EventWindow::default();

        assert!(window.contains(&window.at(6, 0)));
        assert!(window.contains(&window.at(18, 59)));
        assert!(!window.contains(&window.at(5, 59)));
        assert!(!window.contains(&window.at(19, 0)));

        let next_day = window.next_day().and_hms_opt(12, 0, 0).unwrap();
        assert!(!window.contains(&next_day));
    }

    #[test]
    fn test_window_weekday() {
        // 2017-01-02 was a Monday
        assert_eq!(EventWindow::default().weekday_name(), "Monday");
    }

    #[test]
    fn test_window_display() {
        assert_eq!(EventWindow::default().to_string(), "2017-01-02 06:00-18:59");
    }

    #[test]
    fn test_order_builder() {
        let window = EventWindow::default();
        let order = NewOrder::new("Pho", window.at(12, 30), 2)
            .age(34)
            .postcode(4000);

        assert_eq!(order.food, "Pho");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.age, Some(34));
        assert_eq!(order.postcode, Some(4000));
    }

    #[test]
    fn test_dataset_counts() {
        let dataset = Dataset {
            stations: vec![NewStation::new("Pizza Stand")],
            foods: vec![
                NewFood::new("Pizza Stand", "Margherita", "14.00"),
                NewFood::new("Pizza Stand", "Pepperoni", "15.00"),
            ],
            ..Default::default()
        };

        let counts = dataset.counts();
        assert_eq!(counts.stations, 1);
        assert_eq!(counts.foods, 2);
        assert_eq!(counts.total(), 3);
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_order_json_shape() {
        let window = EventWindow::default();
        let order = NewOrder::new("Banh Mi", window.at(7, 5), 1);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["food"], "Banh Mi");
        assert_eq!(json["timestamp"], "2017-01-02T07:05:00");
        assert_eq!(json["quantity"], 1);
        assert!(json["age"].is_null());
    }
}
