use serde::Serialize;

use crate::track::TrackPoint;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the track point preview table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRow {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub time: Option<String>,
}

impl From<&TrackPoint> for PointRow {
    fn from(pt: &TrackPoint) -> Self {
        Self {
            latitude: round_to(pt.latitude, 6),
            longitude: round_to(pt.longitude, 6),
            elevation: pt.elevation.map(|e| round_to(e, 1)),
            time: pt.time.map(|t| t.format(TIME_FORMAT).to_string()),
        }
    }
}

/// The first `limit` points as table rows.
pub fn preview_rows(points: &[TrackPoint], limit: usize) -> Vec<PointRow> {
    points.iter().take(limit).map(PointRow::from).collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_row_formatting() {
        let pt = TrackPoint {
            latitude: 35.676_212_345,
            longitude: 139.650_387_654,
            elevation: Some(40.46),
            time: Some(Utc.with_ymd_and_hms(2025, 1, 1, 6, 30, 5).unwrap()),
        };
        let row = PointRow::from(&pt);
        assert_eq!(row.latitude, 35.676212);
        assert_eq!(row.longitude, 139.650388);
        assert_eq!(row.elevation, Some(40.5));
        assert_eq!(row.time.as_deref(), Some("2025-01-01 06:30:05"));
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let pt = TrackPoint {
            latitude: 1.0,
            longitude: 2.0,
            elevation: None,
            time: None,
        };
        let row = PointRow::from(&pt);
        assert_eq!(row.elevation, None);
        assert_eq!(row.time, None);
    }

    #[test]
    fn test_preview_limit() {
        let points: Vec<TrackPoint> = (0..25)
            .map(|i| TrackPoint {
                latitude: i as f64,
                longitude: 0.0,
                elevation: None,
                time: None,
            })
            .collect();
        let rows = preview_rows(&points, 10);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[9].latitude, 9.0);

        assert_eq!(preview_rows(&points[..3], 10).len(), 3);
        assert!(preview_rows(&points, 0).is_empty());
    }
}
