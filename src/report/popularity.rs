//! Food popularity: total ordered quantity per food title

use crate::store::{EventStore, Order, StoreResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Total quantity ordered of one food
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularityRow {
    pub food_name: String,
    pub quantity: u64,
}

/// Sum quantities per food in one pass over the orders
///
/// Rows are sorted by food name. Foods without orders are absent; foods
/// whose orders all have quantity 0 appear with 0.
pub fn food_popularity(orders: &[Order]) -> Vec<PopularityRow> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for order in orders {
        *totals.entry(order.food.as_str()).or_insert(0) += u64::from(order.quantity);
    }

    totals
        .into_iter()
        .map(|(food_name, quantity)| PopularityRow {
            food_name: food_name.to_string(),
            quantity,
        })
        .collect()
}

/// Popularity rows over every order in the store
pub async fn popularity_report(store: &EventStore) -> StoreResult<Vec<PopularityRow>> {
    let orders = store.orders().await?;
    let rows = food_popularity(&orders);
    tracing::debug!(orders = orders.len(), foods = rows.len(), "Computed food popularity");
    Ok(rows)
}

/// One named series of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<u64>,
}

/// Bar chart payload: one label per food, one `quantity` series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularityChart {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl From<&[PopularityRow]> for PopularityChart {
    fn from(rows: &[PopularityRow]) -> Self {
        Self {
            labels: rows.iter().map(|r| r.food_name.clone()).collect(),
            datasets: vec![ChartDataset {
                label: "quantity".to_string(),
                data: rows.iter().map(|r| r.quantity).collect(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventWindow;
    use std::collections::HashMap;

    fn order(id: i64, food: &str, quantity: u32) -> Order {
        Order {
            id,
            food: food.to_string(),
            timestamp: EventWindow::default().at(10, id as u32 % 60),
            quantity,
            age: None,
            postcode: None,
        }
    }

    fn sample_orders() -> Vec<Order> {
        vec![
            order(1, "Pho", 2),
            order(2, "Flat White", 1),
            order(3, "Pho", 3),
            order(4, "Banh Mi", 1),
            order(5, "Iced Coffee", 0),
            order(6, "Flat White", 4),
        ]
    }

    #[test]
    fn test_totals_match_manual_tally() {
        let orders = sample_orders();
        let rows = food_popularity(&orders);

        let mut tally: HashMap<&str, u64> = HashMap::new();
        for o in &orders {
            *tally.entry(o.food.as_str()).or_default() += u64::from(o.quantity);
        }

        assert_eq!(rows.len(), tally.len());
        for row in &rows {
            assert_eq!(tally[row.food_name.as_str()], row.quantity);
        }
    }

    #[test]
    fn test_sorted_without_duplicates() {
        let rows = food_popularity(&sample_orders());
        let names: Vec<&str> = rows.iter().map(|r| r.food_name.as_str()).collect();
        assert_eq!(names, vec!["Banh Mi", "Flat White", "Iced Coffee", "Pho"]);
    }

    #[test]
    fn test_zero_quantity_food_listed() {
        let rows = food_popularity(&sample_orders());
        let iced = rows.iter().find(|r| r.food_name == "Iced Coffee").unwrap();
        assert_eq!(iced.quantity, 0);
    }

    #[test]
    fn test_sparse_and_no_placeholder() {
        let rows = food_popularity(&sample_orders());
        assert!(rows.iter().all(|r| r.food_name != "Margherita"));
        assert!(rows.iter().all(|r| r.food_name != "Food 1"));
        assert!(food_popularity(&[]).is_empty());
    }

    #[test]
    fn test_chart() {
        let rows = food_popularity(&sample_orders());
        let chart = PopularityChart::from(rows.as_slice());

        assert_eq!(chart.labels, vec!["Banh Mi", "Flat White", "Iced Coffee", "Pho"]);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "quantity");
        assert_eq!(chart.datasets[0].data, vec![1, 5, 0, 5]);
    }

    #[tokio::test]
    async fn test_report_over_seeded_store() {
        let store = crate::store::EventStore::open_in_memory(EventWindow::default()).unwrap();
        crate::seed::load_sample_data(&store, false).await.unwrap();

        let rows = popularity_report(&store).await.unwrap();
        let total: u64 = rows.iter().map(|r| r.quantity).sum();
        let expected: u64 = store
            .orders()
            .await
            .unwrap()
            .iter()
            .map(|o| u64::from(o.quantity))
            .sum();
        assert_eq!(total, expected);
        assert!(rows.iter().all(|r| r.food_name != "Lemongrass Chicken"));
    }
}
