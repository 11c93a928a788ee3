mod build_times;
mod filters;

pub use build_times::{get_build_times, BuildTimes, NodeSeries, ALL_NODES};
pub use filters::SeriesFilter;
