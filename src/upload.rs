use std::path::Path;

use crate::error::GpxViewerError;

type Result<T> = std::result::Result<T, GpxViewerError>;

const BOM: &str = "\u{feff}";

/// Only `.gpx` files are accepted, whatever the case of the extension.
pub fn check_file_name(name: &str) -> Result<()> {
    let is_gpx = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"));

    if is_gpx {
        Ok(())
    } else {
        Err(GpxViewerError::UnsupportedFileType {
            name: name.to_string(),
        })
    }
}

/// Decode uploaded bytes as UTF-8 text, dropping a leading byte order mark.
pub fn decode_contents(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes)?;
    Ok(text.strip_prefix(BOM).unwrap_or(text))
}
