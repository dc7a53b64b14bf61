//! Fixed rows of the demo dataset

/// Stall names
pub const STATIONS: [&str; 3] = ["Vietnamese Stall", "Pizza Stand", "Coffee Cart"];

/// `(station, title, description, price)`
pub const FOODS: [(&str, &str, Option<&str>, &str); 11] = [
    ("Vietnamese Stall", "Pho", Some("Beef noodle soup"), "12.50"),
    ("Vietnamese Stall", "Banh Mi", Some("Pork roll with pickled vegetables"), "9.00"),
    ("Vietnamese Stall", "Rice Paper Rolls", None, "8.00"),
    ("Vietnamese Stall", "Lemongrass Chicken", Some("Served with rice"), "13.00"),
    ("Pizza Stand", "Margherita", Some("Tomato, mozzarella, basil"), "14.00"),
    ("Pizza Stand", "Pepperoni", None, "15.00"),
    ("Pizza Stand", "Garlic Bread", None, "6.00"),
    ("Pizza Stand", "Hawaiian", Some("Ham and pineapple"), "15.00"),
    ("Coffee Cart", "Flat White", None, "4.50"),
    ("Coffee Cart", "Iced Coffee", Some("With ice cream"), "6.50"),
    ("Coffee Cart", "Banana Bread", None, "5.00"),
];

pub const STAFF: [&str; 4] = ["John", "Sarah", "Mei", "Tom"];

/// Shift on the event date (day 0) or the day after (day 1)
pub struct ShiftRow {
    pub station: &'static str,
    pub staff: &'static str,
    pub day: i64,
    pub start_hour: u32,
    pub end_hour: u32,
    /// Shift number within the day, rendered as "<Weekday> Shift <n>"
    pub shift: Option<u32>,
}

pub const ROSTERS: [ShiftRow; 6] = [
    ShiftRow {
        station: "Vietnamese Stall",
        staff: "John",
        day: 0,
        start_hour: 7,
        end_hour: 12,
        shift: Some(1),
    },
    ShiftRow {
        station: "Vietnamese Stall",
        staff: "John",
        day: 1,
        start_hour: 12,
        end_hour: 17,
        shift: Some(2),
    },
    ShiftRow {
        station: "Pizza Stand",
        staff: "Sarah",
        day: 0,
        start_hour: 11,
        end_hour: 17,
        shift: Some(2),
    },
    ShiftRow {
        station: "Pizza Stand",
        staff: "Sarah",
        day: 1,
        start_hour: 7,
        end_hour: 12,
        shift: Some(1),
    },
    ShiftRow {
        station: "Coffee Cart",
        staff: "Mei",
        day: 0,
        start_hour: 6,
        end_hour: 12,
        shift: Some(1),
    },
    ShiftRow {
        station: "Coffee Cart",
        staff: "Tom",
        day: 0,
        start_hour: 12,
        end_hour: 18,
        shift: None,
    },
];

/// `(food, quantity, age, postcode)`; timestamps are drawn at seed time
pub const ORDERS: [(&str, u32, Option<u32>, Option<u32>); 24] = [
    ("Flat White", 2, Some(34), Some(4000)),
    ("Banana Bread", 1, Some(34), Some(4000)),
    ("Pho", 1, Some(27), Some(4101)),
    ("Banh Mi", 3, None, Some(4059)),
    ("Margherita", 1, Some(45), Some(4064)),
    ("Pepperoni", 2, Some(19), None),
    ("Iced Coffee", 1, Some(22), Some(4169)),
    ("Garlic Bread", 4, Some(38), Some(4005)),
    ("Pho", 2, Some(61), Some(4000)),
    ("Rice Paper Rolls", 2, None, None),
    ("Flat White", 1, Some(29), Some(4101)),
    ("Hawaiian", 1, Some(12), Some(4059)),
    ("Banh Mi", 1, Some(33), Some(4064)),
    ("Margherita", 3, Some(41), Some(4169)),
    ("Iced Coffee", 0, Some(25), Some(4005)),
    ("Pho", 1, None, Some(4000)),
    ("Pepperoni", 1, Some(52), Some(4101)),
    ("Flat White", 3, Some(30), None),
    ("Banana Bread", 2, Some(8), Some(4059)),
    ("Rice Paper Rolls", 1, Some(36), Some(4064)),
    ("Garlic Bread", 1, None, Some(4169)),
    ("Hawaiian", 2, Some(17), Some(4005)),
    ("Banh Mi", 2, Some(44), Some(4000)),
    ("Margherita", 1, Some(57), Some(4101)),
];
