//! Report views computed from the stored dataset
//!
//! - [`popularity`]: total quantity ordered per food
//! - [`timeline`]: staff shifts laid out on a timeline

pub mod popularity;
pub mod timeline;

pub use popularity::{
    food_popularity, popularity_report, ChartDataset, PopularityChart, PopularityRow,
};
pub use timeline::{
    build_timeline, shift_timeline, HiddenRange, ShiftItem, ShiftTimeline, TimelineOptions,
    VisibleHours,
};
