use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::track::TrackPoint;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Summary numbers derived from a point sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStats {
    pub total_distance_m: f64,
    pub total_distance_km: f64,
    pub total_points: usize,
    pub elevation: Option<ElevationStats>,
    pub duration: Option<DurationStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationStats {
    pub min: f64,
    pub max: f64,
    /// max - min
    pub range: f64,
    pub gain: f64,
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationStats {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub seconds: i64,
    pub display: String,
}

/// Great-circle distance in metres between two points (haversine).
pub fn haversine_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(b.latitude - a.latitude);
    let dlon = to_rad(b.longitude - a.longitude);
    // Rounding can push h just past 1 for near-antipodal points.
    let h = ((dlat / 2.0).sin().powi(2)
        + to_rad(a.latitude).cos() * to_rad(b.latitude).cos() * (dlon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

pub fn compute_stats(points: &[TrackPoint]) -> TrackStats {
    let total_distance_m: f64 = points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum();

    TrackStats {
        total_distance_m,
        total_distance_km: total_distance_m / 1000.0,
        total_points: points.len(),
        elevation: elevation_stats(points),
        duration: duration_stats(points),
    }
}

fn elevation_stats(points: &[TrackPoint]) -> Option<ElevationStats> {
    let mut elevations = points.iter().filter_map(|p| p.elevation);
    let first = elevations.next()?;
    let (min, max) = elevations.fold((first, first), |(lo, hi), e| (lo.min(e), hi.max(e)));

    let mut gain = 0.0;
    let mut loss = 0.0;
    for pair in points.windows(2) {
        // Pairs with a missing elevation on either side contribute nothing.
        if let (Some(prev), Some(curr)) = (pair[0].elevation, pair[1].elevation) {
            let delta = curr - prev;
            if delta > 0.0 {
                gain += delta;
            } else {
                loss += -delta;
            }
        }
    }

    Some(ElevationStats {
        min,
        max,
        range: max - min,
        gain,
        loss,
    })
}

fn duration_stats(points: &[TrackPoint]) -> Option<DurationStats> {
    let mut times = points.iter().filter_map(|p| p.time);
    let start = times.next()?;
    let end = times.last()?;
    let elapsed = end - start;

    Some(DurationStats {
        start,
        end,
        seconds: elapsed.num_seconds(),
        display: format_duration(elapsed),
    })
}

/// Format an elapsed time as `H:MM:SS`, prefixed by `N day(s), ` when it
/// spans at least one day.
pub fn format_duration(elapsed: TimeDelta) -> String {
    let sign = if elapsed < TimeDelta::zero() { "-" } else { "" };
    let total = elapsed.num_seconds().unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{sign}{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("{sign}1 day, {hours}:{minutes:02}:{seconds:02}"),
        n => format!("{sign}{n} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}
