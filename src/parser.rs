use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::error::GpxViewerError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, GpxViewerError>;

/// Parse a GPX XML string into GpxData.
///
/// The first element of the document must be `<gpx>`; anything else is
/// rejected as not being a GPX file. Track points without usable
/// coordinates are skipped rather than failing the whole document.
pub fn parse_gpx(xml: &str) -> Result<GpxData> {
    if xml.trim().is_empty() {
        return Err(GpxViewerError::EmptyDocument);
    }

    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    let mut data = GpxData::default();
    let mut seen_root = false;
    let mut root_open = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if !seen_root => {
                read_root(&e, &mut data)?;
                seen_root = true;
                root_open = true;
            }
            Ok(Event::Empty(e)) if !seen_root => {
                read_root(&e, &mut data)?;
                seen_root = true;
            }
            Ok(Event::Text(e)) if !seen_root => {
                if e.as_ref().iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(GpxViewerError::NotGpx {
                        root: "#text".to_string(),
                    });
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"gpx" => root_open = false,
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trk" => data.tracks.push(parse_track(&mut reader)?),
                b"wpt" => {
                    data.waypoint_count += 1;
                    reader.read_to_end(e.name())?;
                }
                b"rte" => {
                    data.route_count += 1;
                    reader.read_to_end(e.name())?;
                }
                _ => {
                    // metadata, extensions
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"wpt" {
                    data.waypoint_count += 1;
                }
            }
            Ok(Event::Eof) if root_open => return Err(unexpected_eof(b"gpx")),
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxViewerError::XmlParse(e)),
            _ => {}
        }
    }

    if !seen_root {
        return Err(GpxViewerError::NotGpx {
            root: String::new(),
        });
    }

    debug!(
        version = data.version.as_deref().unwrap_or("?"),
        creator = data.creator.as_deref().unwrap_or("?"),
        tracks = data.tracks.len(),
        waypoints = data.waypoint_count,
        routes = data.route_count,
        "parsed GPX document"
    );

    Ok(data)
}

/// A document that stops before `element` is closed.
fn unexpected_eof(element: &[u8]) -> GpxViewerError {
    GpxViewerError::XmlParse(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(
        String::from_utf8_lossy(element).into_owned(),
    )))
}

/// Check the root element and pick up its version/creator attributes.
fn read_root(e: &BytesStart<'_>, data: &mut GpxData) -> Result<()> {
    if e.local_name().as_ref() != b"gpx" {
        return Err(GpxViewerError::NotGpx {
            root: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        });
    }

    for attr in e.attributes().flatten() {
        let val = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.local_name().as_ref() {
            b"version" => data.version = Some(val),
            b"creator" => data.creator = Some(val),
            _ => {}
        }
    }

    Ok(())
}

/// Parse lat/lon attributes from a <trkpt> start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| GpxViewerError::XmlParse(e.into()))?;
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(parse_coordinate("lat", val, 90.0)?),
            b"lon" => lon = Some(parse_coordinate("lon", val, 180.0)?),
            _ => {}
        }
    }

    let lat = lat.ok_or(GpxViewerError::MissingAttribute {
        element: "trkpt",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(GpxViewerError::MissingAttribute {
        element: "trkpt",
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

fn parse_coordinate(attribute: &'static str, val: &str, limit: f64) -> Result<f64> {
    match val.trim().parse::<f64>() {
        Ok(v) if (-limit..=limit).contains(&v) => Ok(v),
        _ => Err(GpxViewerError::InvalidAttribute {
            element: "trkpt",
            attribute,
            value: val.to_string(),
        }),
    }
}

/// Parse GPX timestamps. Most files carry RFC 3339 with an offset or `Z`;
/// some older exporters drop the zone, which is read as UTC.
fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

/// Parse a <trkpt> element and its children.
/// Called after receiving Event::Start for the point element.
fn parse_point<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<GpxPoint>> {
    let (lat, lon) = match parse_lat_lon(start) {
        Ok(coords) => coords,
        Err(e) => {
            warn!("skipping track point: {e}");
            reader.read_to_end(start.name())?;
            return Ok(None);
        }
    };

    let mut point = GpxPoint::new(lat, lon);
    let end_name = start.name().0.to_vec();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"ele" => {
                    let text = read_text_owned(reader, &e)?;
                    point.ele = text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
                }
                b"time" => {
                    let text = read_text_owned(reader, &e)?;
                    point.time = parse_time(&text);
                    if point.time.is_none() {
                        warn!(time = %text, "ignoring unparseable track point time");
                    }
                }
                _ => {
                    // name, sym, speed, extensions, ...
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(unexpected_eof(&end_name)),
            Err(e) => return Err(GpxViewerError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Some(point))
}

/// Parse a <trk> element.
fn parse_track<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxTrack> {
    let mut track = GpxTrack::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => track.name = Some(read_text_owned(reader, &e)?),
                b"type" => track.track_type = Some(read_text_owned(reader, &e)?),
                b"trkseg" => {
                    let seg = parse_segment(reader)?;
                    if !seg.points.is_empty() {
                        track.segments.push(seg);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => return Err(unexpected_eof(b"trk")),
            Err(e) => return Err(GpxViewerError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a <trkseg> element.
fn parse_segment<'a>(reader: &mut Reader<&'a [u8]>) -> Result<GpxSegment> {
    let mut segment = GpxSegment::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trkpt" => {
                    if let Some(pt) = parse_point(&e, reader)? {
                        segment.points.push(pt);
                    }
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"trkpt" => {
                match parse_lat_lon(&e) {
                    Ok((lat, lon)) => segment.points.push(GpxPoint::new(lat, lon)),
                    Err(err) => warn!("skipping track point: {err}"),
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => return Err(unexpected_eof(b"trkseg")),
            Err(e) => return Err(GpxViewerError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(segment)
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
fn read_text_owned<'a>(reader: &mut Reader<&'a [u8]>, start: &BytesStart<'_>) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::CData(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => return Err(unexpected_eof(&end_name)),
            Err(e) => return Err(GpxViewerError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
