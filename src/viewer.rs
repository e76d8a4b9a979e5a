use serde::Serialize;
use tracing::{debug, info};

use crate::error::GpxViewerError;
use crate::map::{MapView, build_map};
use crate::options::ViewerOptions;
use crate::parser::parse_gpx;
use crate::stats::{TrackStats, compute_stats};
use crate::table::{PointRow, preview_rows};
use crate::track::{collect_points, track_names, track_types};
use crate::upload::{check_file_name, decode_contents};

type Result<T> = std::result::Result<T, GpxViewerError>;

/// A label/value pair for the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// The complete result of loading one GPX file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    pub file_name: Option<String>,
    pub track_names: Vec<String>,
    pub track_types: Vec<String>,
    pub stats: TrackStats,
    pub metrics: Vec<Metric>,
    pub map: MapView,
    pub preview: Vec<PointRow>,
}

/// Parse a GPX document and build its view.
pub fn load_track(xml: &str, opts: &ViewerOptions) -> Result<TrackView> {
    let data = parse_gpx(xml)?;
    let points = collect_points(&data);

    let Some(map) = build_map(&points, opts) else {
        debug!(
            waypoints = data.waypoint_count,
            routes = data.route_count,
            "GPX document has no track points"
        );
        return Err(GpxViewerError::NoTrackData);
    };

    let stats = compute_stats(&points);
    info!(
        points = stats.total_points,
        distance_km = stats.total_distance_km,
        "loaded GPX track"
    );

    Ok(TrackView {
        file_name: None,
        track_names: track_names(&data),
        track_types: track_types(&data),
        metrics: metrics(&stats),
        preview: preview_rows(&points, opts.preview_rows),
        stats,
        map,
    })
}

/// Validate an uploaded file and build its view.
pub fn load_file(name: &str, bytes: &[u8], opts: &ViewerOptions) -> Result<TrackView> {
    check_file_name(name)?;
    let xml = decode_contents(bytes)?;
    debug!(file = name, size = bytes.len(), "loading uploaded file");

    let mut view = load_track(xml, opts)?;
    view.file_name = Some(name.to_string());
    Ok(view)
}

/// Panel entries in display order.
pub fn metrics(stats: &TrackStats) -> Vec<Metric> {
    let mut out = vec![
        Metric {
            label: "Total distance",
            value: format!("{:.2} km", stats.total_distance_km),
        },
        Metric {
            label: "Points",
            value: group_thousands(stats.total_points),
        },
    ];

    if let Some(ele) = &stats.elevation {
        for (label, metres) in [
            ("Min elevation", ele.min),
            ("Max elevation", ele.max),
            ("Elevation range", ele.range),
            ("Elevation gain", ele.gain),
            ("Elevation loss", ele.loss),
        ] {
            out.push(Metric {
                label,
                value: format!("{metres:.1} m"),
            });
        }
    }

    if let Some(dur) = &stats.duration {
        out.push(Metric {
            label: "Duration",
            value: dur.display.clone(),
        });
    }

    out
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
