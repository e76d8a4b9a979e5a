use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::gpx_types::{GpxData, GpxPoint};

/// A single recorded position, flattened out of its track and segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl From<&GpxPoint> for TrackPoint {
    fn from(pt: &GpxPoint) -> Self {
        Self {
            latitude: pt.lat,
            longitude: pt.lon,
            elevation: pt.ele,
            time: pt.time,
        }
    }
}

/// Every track point of every track and segment, in document order.
pub fn collect_points(data: &GpxData) -> Vec<TrackPoint> {
    data.tracks
        .iter()
        .flat_map(|trk| trk.segments.iter())
        .flat_map(|seg| seg.points.iter())
        .map(TrackPoint::from)
        .collect()
}

/// Names of the named tracks, in document order.
pub fn track_names(data: &GpxData) -> Vec<String> {
    data.tracks
        .iter()
        .filter_map(|trk| trk.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct activity types (`<type>`) of the tracks, in first-seen order.
pub fn track_types(data: &GpxData) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for kind in data.tracks.iter().filter_map(|trk| trk.track_type.as_deref()) {
        let kind = kind.trim();
        if !kind.is_empty() && !types.iter().any(|t| t == kind) {
            types.push(kind.to_string());
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_gpx;

    #[test]
    fn test_points_flattened_in_order() {
        let xml = r#"<gpx version="1.1">
  <trk>
    <name>First</name>
    <trkseg>
      <trkpt lat="1.0" lon="10.0"><ele>100</ele></trkpt>
      <trkpt lat="2.0" lon="20.0"/>
    </trkseg>
    <trkseg>
      <trkpt lat="3.0" lon="30.0"/>
    </trkseg>
  </trk>
  <trk>
    <name>  </name>
    <trkseg><trkpt lat="4.0" lon="40.0"/></trkseg>
  </trk>
  <trk>
    <name>Third</name>
    <trkseg><trkpt lat="5.0" lon="50.0"/></trkseg>
  </trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        let points = collect_points(&data);

        let lats: Vec<f64> = points.iter().map(|p| p.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(points[0].elevation, Some(100.0));
        assert_eq!(points[1].elevation, None);

        assert_eq!(track_names(&data), vec!["First", "Third"]);
    }

    #[test]
    fn test_track_types_deduplicated() {
        let xml = r#"<gpx version="1.1">
  <trk><type>running</type></trk>
  <trk><type> cycling </type></trk>
  <trk><type>running</type></trk>
  <trk></trk>
</gpx>"#;
        let data = parse_gpx(xml).unwrap();
        assert_eq!(track_types(&data), vec!["running", "cycling"]);
    }

    #[test]
    fn test_no_tracks() {
        let data = parse_gpx(r#"<gpx version="1.1"/>"#).unwrap();
        assert!(collect_points(&data).is_empty());
        assert!(track_names(&data).is_empty());
        assert!(track_types(&data).is_empty());
    }
}
