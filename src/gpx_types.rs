use chrono::{DateTime, Utc};

/// Parsed GPX document. Only tracks are kept in full; waypoints and routes
/// are counted so the viewer can report what it skipped.
#[derive(Debug, Default)]
pub struct GpxData {
    pub version: Option<String>,
    pub creator: Option<String>,
    pub tracks: Vec<GpxTrack>,
    pub waypoint_count: usize,
    pub route_count: usize,
}

/// A GPX track point (<trkpt>).
#[derive(Debug, Clone, PartialEq)]
pub struct GpxPoint {
    pub lat: f64,
    pub lon: f64,
    pub ele: Option<f64>,
    pub time: Option<DateTime<Utc>>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ele: None,
            time: None,
        }
    }
}

/// A GPX track (<trk>).
#[derive(Debug, Default)]
pub struct GpxTrack {
    pub name: Option<String>,
    pub track_type: Option<String>,
    pub segments: Vec<GpxSegment>,
}

/// A GPX track segment (<trkseg>).
#[derive(Debug, Default)]
pub struct GpxSegment {
    pub points: Vec<GpxPoint>,
}
