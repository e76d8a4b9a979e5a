use std::str::Utf8Error;

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GpxViewerError {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("The file is empty")]
    EmptyDocument,

    #[error("Not a GPX document: root element is <{root}>")]
    NotGpx { root: String },

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Unsupported file '{name}': only .gpx files are accepted")]
    UnsupportedFileType { name: String },

    #[error("The file is not valid UTF-8 text: {0}")]
    InvalidEncoding(#[from] Utf8Error),

    #[error("No valid track data found in the GPX file")]
    NoTrackData,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<GpxViewerError> for JsValue {
    fn from(e: GpxViewerError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl From<serde_json::Error> for GpxViewerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for GpxViewerError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
