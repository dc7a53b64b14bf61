//! Application shell: named step groups, each step bound to the views it shows

use crate::table::Table;
use serde::Serialize;

pub const APP_NAME: &str = "Event Tracking Demo";

/// A view shown by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// All rows of one table
    Grid { table: Table },
    PopularityChart,
    ShiftTimeline,
}

impl Widget {
    /// API path (under `/api/v1`) serving this widget's data
    pub fn endpoint(&self) -> String {
        match self {
            Widget::Grid { table } => format!("/tables/{}", table),
            Widget::PopularityChart => "/reports/popularity?format=chart".to_string(),
            Widget::ShiftTimeline => "/reports/timeline".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub name: &'static str,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepGroup {
    pub name: &'static str,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub name: String,
    pub groups: Vec<StepGroup>,
}

impl Navigation {
    /// Every widget in navigation order
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.groups
            .iter()
            .flat_map(|g| g.steps.iter())
            .flat_map(|s| s.widgets.iter())
    }
}

fn step(name: &'static str, widgets: Vec<Widget>) -> Step {
    Step { name, widgets }
}

fn grid(table: Table) -> Widget {
    Widget::Grid { table }
}

/// Navigation shell of the app, under the given display name
pub fn navigation(name: impl Into<String>) -> Navigation {
    Navigation {
        name: name.into(),
        groups: vec![
            StepGroup {
                name: "Stations",
                steps: vec![
                    step("Overview", vec![grid(Table::Station)]),
                    step("Foods", vec![grid(Table::Food)]),
                ],
            },
            StepGroup {
                name: "Sales",
                steps: vec![
                    step("Orders", vec![grid(Table::Order)]),
                    step("Popularity", vec![Widget::PopularityChart]),
                ],
            },
            StepGroup {
                name: "Staff",
                steps: vec![
                    step("Staff", vec![grid(Table::Staff)]),
                    step("Rosters", vec![grid(Table::Roster), Widget::ShiftTimeline]),
                ],
            },
        ],
    }
}
