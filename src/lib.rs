pub mod error;
pub mod gpx_types;
pub mod map;
pub mod options;
pub mod parser;
pub mod stats;
pub mod table;
pub mod track;
pub mod upload;
pub mod viewer;

use wasm_bindgen::prelude::*;

use crate::error::GpxViewerError;
use crate::options::ViewerOptions;

/// Load a GPX string and return the track view as a JS object.
#[wasm_bindgen(js_name = loadGpx)]
pub fn load_gpx(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let view = viewer::load_track(gpx_string, &opts)?;
    to_js(&view)
}

/// Load a GPX string and return the track view as a JSON string.
#[wasm_bindgen(js_name = loadGpxString)]
pub fn load_gpx_string(gpx_string: &str, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let view = viewer::load_track(gpx_string, &opts)?;
    serde_json::to_string(&view).map_err(|e| GpxViewerError::from(e).into())
}

/// Load an uploaded file (name plus raw bytes) and return the track view as a JS object.
#[wasm_bindgen(js_name = loadGpxFile)]
pub fn load_gpx_file(
    file_name: &str,
    contents: &js_sys::Uint8Array,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let bytes = contents.to_vec();
    let view = viewer::load_file(file_name, &bytes, &opts)?;
    to_js(&view)
}

/// Statistics only, for callers that draw their own map.
#[wasm_bindgen(js_name = trackStats)]
pub fn track_stats(gpx_string: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let data = parser::parse_gpx(gpx_string)?;
    let points = track::collect_points(&data);
    if points.is_empty() {
        return Err(GpxViewerError::NoTrackData.into());
    }
    to_js(&stats::compute_stats(&points))
}

fn parse_options(options: JsValue) -> Result<ViewerOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ViewerOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| GpxViewerError::from(e).into())
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Plain objects rather than Maps so the page can read fields directly.
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| GpxViewerError::from(e).into())
}
