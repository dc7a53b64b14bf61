//! Shift timeline built from roster rows

use crate::store::{EventStore, Roster, StoreResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

pub const TIMELINE_TITLE: &str = "Work shifts";

/// One shift bar on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftItem {
    /// Roster id
    pub id: i64,
    /// Staff name; one timeline lane per staff member
    pub group: String,
    pub station: String,
    /// Roster content, or the station title when the roster has none
    pub content: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl From<&Roster> for ShiftItem {
    fn from(roster: &Roster) -> Self {
        Self {
            id: roster.id,
            group: roster.staff.clone(),
            station: roster.station.clone(),
            content: roster
                .content
                .clone()
                .unwrap_or_else(|| roster.station.clone()),
            start: roster.start,
            end: roster.end,
        }
    }
}

/// Span of time the timeline collapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HiddenRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineOptions {
    pub hidden_dates: Vec<HiddenRange>,
}

/// Timeline view payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftTimeline {
    pub title: String,
    /// Staff names in order of first appearance
    pub groups: Vec<String>,
    pub items: Vec<ShiftItem>,
    pub options: TimelineOptions,
}

/// Hours the timeline shows each day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleHours {
    pub first_hour: u32,
    pub hide_from_hour: u32,
}

impl Default for VisibleHours {
    fn default() -> Self {
        Self {
            first_hour: 6,
            hide_from_hour: 18,
        }
    }
}

fn at_hour(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour))
}

/// One overnight range per pair of consecutive days spanned by the items
fn hidden_dates(items: &[ShiftItem], hours: VisibleHours) -> Vec<HiddenRange> {
    let first_day = items.iter().map(|i| i.start.date()).min();
    let last_day = items.iter().map(|i| i.end.date()).max();

    let (Some(mut day), Some(last_day)) = (first_day, last_day) else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    while day < last_day {
        let next = day + Duration::days(1);
        ranges.push(HiddenRange {
            start: at_hour(day, hours.hide_from_hour),
            end: at_hour(next, hours.first_hour),
        });
        day = next;
    }
    ranges
}

/// Build the timeline from roster rows, optionally for one staff member
pub fn build_timeline(
    rosters: &[Roster],
    staff: Option<&str>,
    hours: VisibleHours,
) -> ShiftTimeline {
    let mut items: Vec<ShiftItem> = rosters
        .iter()
        .filter(|r| staff.map_or(true, |name| r.staff == name))
        .map(ShiftItem::from)
        .collect();
    items.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));

    let mut groups: Vec<String> = Vec::new();
    for item in &items {
        if !groups.contains(&item.group) {
            groups.push(item.group.clone());
        }
    }

    let options = TimelineOptions {
        hidden_dates: hidden_dates(&items, hours),
    };

    ShiftTimeline {
        title: TIMELINE_TITLE.to_string(),
        groups,
        items,
        options,
    }
}

/// Timeline over every roster in the store
pub async fn shift_timeline(
    store: &EventStore,
    staff: Option<&str>,
    hours: VisibleHours,
) -> StoreResult<ShiftTimeline> {
    let rosters = store.rosters().await?;
    Ok(build_timeline(&rosters, staff, hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventWindow;

    fn roster(
        id: i64,
        staff: &str,
        day: i64,
        start: u32,
        end: u32,
        content: Option<&str>,
    ) -> Roster {
        let date = EventWindow::default().date + Duration::days(day);
        Roster {
            id,
            station: "Pizza Stand".to_string(),
            staff: staff.to_string(),
            start: at_hour(date, start),
            end: at_hour(date, end),
            content: content.map(String::from),
        }
    }

    fn sample_rosters() -> Vec<Roster> {
        vec![
            roster(1, "John", 0, 7, 12, Some("Monday Shift 1")),
            roster(2, "John", 1, 12, 17, Some("Tuesday Shift 2")),
            roster(3, "Sarah", 0, 11, 17, Some("Monday Shift 2")),
            roster(4, "Sarah", 1, 7, 12, Some("Tuesday Shift 1")),
            roster(5, "Tom", 0, 12, 18, None),
        ]
    }

    #[test]
    fn test_items_in_start_order() {
        let timeline = build_timeline(&sample_rosters(), None, VisibleHours::default());

        assert_eq!(timeline.title, "Work shifts");
        let ids: Vec<i64> = timeline.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3, 5, 4, 2]);
        assert_eq!(timeline.groups, vec!["John", "Sarah", "Tom"]);
    }

    #[test]
    fn test_staff_filter_non_decreasing() {
        let timeline = build_timeline(&sample_rosters(), Some("Sarah"), VisibleHours::default());

        assert_eq!(timeline.items.len(), 2);
        assert!(timeline.items.iter().all(|i| i.group == "Sarah"));
        for pair in timeline.items.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
    }

    #[test]
    fn test_content_falls_back_to_station() {
        let timeline = build_timeline(&sample_rosters(), Some("Tom"), VisibleHours::default());
        assert_eq!(timeline.items[0].content, "Pizza Stand");
    }

    #[test]
    fn test_hidden_dates() {
        let timeline = build_timeline(&sample_rosters(), None, VisibleHours::default());
        let day0 = EventWindow::default().date;

        assert_eq!(
            timeline.options.hidden_dates,
            vec![HiddenRange {
                start: at_hour(day0, 18),
                end: at_hour(day0 + Duration::days(1), 6),
            }]
        );

        let single_day = build_timeline(&sample_rosters(), Some("Tom"), VisibleHours::default());
        assert!(single_day.options.hidden_dates.is_empty());
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = build_timeline(&[], None, VisibleHours::default());
        assert!(timeline.items.is_empty());
        assert!(timeline.groups.is_empty());
        assert!(timeline.options.hidden_dates.is_empty());
    }

    #[tokio::test]
    async fn test_timeline_over_seeded_store() {
        let store = EventStore::open_in_memory(EventWindow::default()).unwrap();
        crate::seed::load_sample_data(&store, false).await.unwrap();

        let timeline = shift_timeline(&store, Some("John"), VisibleHours::default())
            .await
            .unwrap();
        let contents: Vec<&str> = timeline.items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["Monday Shift 1", "Tuesday Shift 2"]);
    }
}
