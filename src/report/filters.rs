use chrono::{DateTime, Duration, Utc};

use super::build_times::NodeSeries;

const MINUTE_MS: i64 = 60_000;

/// Transform applied to a series before it is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesFilter {
    /// Plot the raw points.
    Identity,
    /// Resample to one point per minute, carrying the last value forward.
    Pad,
    /// Pad, average into `freq_minutes` buckets, then take a centered rolling
    /// mean over `window` buckets.
    RollingMean { window: usize, freq_minutes: u32 },
}

impl SeriesFilter {
    pub fn apply(&self, series: &NodeSeries) -> NodeSeries {
        match *self {
            Self::Identity => series.clone(),
            Self::Pad => resample_pad(series),
            Self::RollingMean {
                window,
                freq_minutes,
            } => {
                let padded = resample_pad(series);
                let bucketed = if freq_minutes > 1 {
                    downsample(&padded, freq_minutes)
                } else {
                    padded
                };
                rolling_mean_centered(&bucketed, window)
            }
        }
    }
}

fn floor_to(ts: DateTime<Utc>, bucket_ms: i64) -> DateTime<Utc> {
    ts - Duration::milliseconds(ts.timestamp_millis().rem_euclid(bucket_ms))
}

/// Average the points falling in each `bucket_ms` slot. Empty slots get the
/// previous slot's value; the first slot is never empty.
fn resample(series: &NodeSeries, bucket_ms: i64) -> NodeSeries {
    let Some((first, last)) = series.time_range() else {
        return NodeSeries::default();
    };

    let step = Duration::milliseconds(bucket_ms);
    let end = floor_to(last, bucket_ms);
    let mut bucket = floor_to(first, bucket_ms);
    let mut points = series.points().iter().peekable();
    let mut resampled = Vec::new();
    let mut previous = 0.0;

    while bucket <= end {
        let next = bucket + step;
        let mut sum = 0.0;
        let mut count = 0u32;
        while let Some((_, value)) = points.next_if(|(ts, _)| *ts < next) {
            sum += value;
            count += 1;
        }

        let value = if count > 0 {
            sum / f64::from(count)
        } else {
            previous
        };
        resampled.push((bucket, value));
        previous = value;
        bucket = next;
    }

    NodeSeries::from_points(resampled)
}

fn resample_pad(series: &NodeSeries) -> NodeSeries {
    resample(series, MINUTE_MS)
}

fn downsample(series: &NodeSeries, freq_minutes: u32) -> NodeSeries {
    resample(series, i64::from(freq_minutes) * MINUTE_MS)
}

/// Mean over `window` consecutive points, labelled at the window's center.
/// For even windows that is the later of the two middle points. Positions
/// where the window does not fit entirely are dropped.
fn rolling_mean_centered(series: &NodeSeries, window: usize) -> NodeSeries {
    let points = series.points();
    if window == 0 || points.len() < window {
        return NodeSeries::default();
    }

    let offset = window / 2;

    #[allow(clippy::cast_precision_loss)]
    let averaged = points
        .windows(window)
        .map(|w| {
            let mean = w.iter().map(|(_, v)| v).sum::<f64>() / window as f64;
            (w[offset].0, mean)
        })
        .collect();

    NodeSeries::from_points(averaged)
}
