use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::options::ViewerOptions;
use crate::track::TrackPoint;

pub const TILE_LAYER: &str = "OpenStreetMap";

/// Everything the page needs to draw the track: where to center, how far to
/// zoom, and the features to overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: String,
    /// [[min_lat, min_lon], [max_lat, max_lon]]
    pub bounds: [[f64; 2]; 2],
    pub features: FeatureCollection,
}

/// Build the map for a point sequence. Returns None when there is nothing to draw.
pub fn build_map(points: &[TrackPoint], opts: &ViewerOptions) -> Option<MapView> {
    let first = points.first()?;
    let last = points.last()?;

    let n = points.len() as f64;
    let center_lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let center_lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;

    let [min_lat, min_lon, max_lat, max_lon] = points.iter().fold(
        [first.latitude, first.longitude, first.latitude, first.longitude],
        |[lo_lat, lo_lon, hi_lat, hi_lon], p| {
            [
                lo_lat.min(p.latitude),
                lo_lon.min(p.longitude),
                hi_lat.max(p.latitude),
                hi_lon.max(p.longitude),
            ]
        },
    );

    let mut features = Vec::with_capacity(3);
    if points.len() >= 2 {
        features.push(route_feature(points, opts));
    }
    features.push(marker_feature(first, "start", "Start", "green", "play", opts));
    features.push(marker_feature(last, "goal", "Goal", "red", "stop", opts));

    Some(MapView {
        center: [center_lat, center_lon],
        zoom: opts.zoom_start,
        tiles: TILE_LAYER.to_string(),
        bounds: [[min_lat, min_lon], [max_lat, max_lon]],
        features: FeatureCollection {
            bbox: Some(vec![min_lon, min_lat, max_lon, max_lat]),
            features,
            foreign_members: None,
        },
    })
}

fn route_feature(points: &[TrackPoint], opts: &ViewerOptions) -> Feature {
    let coords: Vec<Vec<f64>> = points
        .iter()
        .map(|pt| point_coords(pt, opts.include_elevation))
        .collect();

    let mut props = Map::new();
    insert_str(&mut props, "role", "route");
    insert_str(&mut props, "popup", "GPX Route");
    insert_str(&mut props, "color", &opts.line_color);
    props.insert("weight".to_string(), JsonValue::from(opts.line_weight));
    props.insert("opacity".to_string(), JsonValue::from(opts.line_opacity));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn marker_feature(
    pt: &TrackPoint,
    role: &str,
    popup: &str,
    color: &str,
    icon: &str,
    opts: &ViewerOptions,
) -> Feature {
    let mut props = Map::new();
    insert_str(&mut props, "role", role);
    insert_str(&mut props, "popup", popup);
    insert_str(&mut props, "color", color);
    insert_str(&mut props, "icon", icon);

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(point_coords(
            pt,
            opts.include_elevation,
        )))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &TrackPoint, include_elevation: bool) -> Vec<f64> {
    match (include_elevation, pt.elevation) {
        (true, Some(ele)) => vec![pt.longitude, pt.latitude, ele],
        _ => vec![pt.longitude, pt.latitude],
    }
}

fn insert_str(props: &mut Map<String, JsonValue>, key: &str, value: &str) {
    props.insert(key.to_string(), JsonValue::String(value.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64, ele: Option<f64>) -> TrackPoint {
        TrackPoint {
            latitude: lat,
            longitude: lon,
            elevation: ele,
            time: None,
        }
    }

    fn role(f: &Feature) -> &str {
        f.properties.as_ref().unwrap()["role"].as_str().unwrap()
    }

    #[test]
    fn test_empty_points_no_map() {
        assert!(build_map(&[], &ViewerOptions::default()).is_none());
    }

    #[test]
    fn test_route_and_markers() {
        let points = vec![
            pt(35.0, 139.0, Some(10.0)),
            pt(35.2, 139.4, Some(20.0)),
            pt(35.4, 139.2, None),
        ];
        let map = build_map(&points, &ViewerOptions::default()).unwrap();

        assert!((map.center[0] - 35.2).abs() < 1e-9);
        assert!((map.center[1] - 139.2).abs() < 1e-9);
        assert_eq!(map.zoom, 13);
        assert_eq!(map.tiles, "OpenStreetMap");
        assert_eq!(map.bounds, [[35.0, 139.0], [35.4, 139.4]]);
        assert_eq!(map.features.bbox, Some(vec![139.0, 35.0, 139.4, 35.4]));

        let roles: Vec<&str> = map.features.features.iter().map(role).collect();
        assert_eq!(roles, vec!["route", "start", "goal"]);

        let route = &map.features.features[0];
        match &route.geometry.as_ref().unwrap().value {
            Value::LineString(coords) => {
                assert_eq!(coords.len(), 3);
                // [lon, lat, ele] order, elevation dropped where absent
                assert_eq!(coords[0], vec![139.0, 35.0, 10.0]);
                assert_eq!(coords[2], vec![139.2, 35.4]);
            }
            _ => panic!("Expected LineString"),
        }
        let props = route.properties.as_ref().unwrap();
        assert_eq!(props["color"], "red");
        assert_eq!(props["weight"], 3.0);
        assert_eq!(props["opacity"], 0.8);
        assert_eq!(props["popup"], "GPX Route");

        let goal = &map.features.features[2];
        let props = goal.properties.as_ref().unwrap();
        assert_eq!(props["icon"], "stop");
        assert_eq!(props["color"], "red");
        match &goal.geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![139.2, 35.4]),
            _ => panic!("Expected Point"),
        }
    }

    #[test]
    fn test_single_point_has_markers_only() {
        let map = build_map(&[pt(1.0, 2.0, None)], &ViewerOptions::default()).unwrap();
        let roles: Vec<&str> = map.features.features.iter().map(role).collect();
        assert_eq!(roles, vec!["start", "goal"]);
        assert_eq!(map.center, [1.0, 2.0]);
    }

    #[test]
    fn test_options_applied() {
        let opts = ViewerOptions {
            zoom_start: 10,
            line_color: "blue".to_string(),
            include_elevation: false,
            ..Default::default()
        };
        let points = vec![pt(0.0, 0.0, Some(5.0)), pt(0.1, 0.1, Some(6.0))];
        let map = build_map(&points, &opts).unwrap();
        assert_eq!(map.zoom, 10);

        let route = &map.features.features[0];
        assert_eq!(route.properties.as_ref().unwrap()["color"], "blue");
        if let Value::LineString(coords) = &route.geometry.as_ref().unwrap().value {
            assert!(coords.iter().all(|c| c.len() == 2));
        } else {
            panic!("Expected LineString");
        }
    }
}
