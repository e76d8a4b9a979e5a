use serde::Deserialize;

/// Options for building a track view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewerOptions {
    /// Number of track points listed in the preview table (default: 10)
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Initial map zoom level (default: 13)
    #[serde(default = "default_zoom_start")]
    pub zoom_start: u8,

    /// Route line color (default: "red")
    #[serde(default = "default_line_color")]
    pub line_color: String,

    /// Route line weight in pixels (default: 3)
    #[serde(default = "default_line_weight")]
    pub line_weight: f64,

    /// Route line opacity (default: 0.8)
    #[serde(default = "default_line_opacity")]
    pub line_opacity: f64,

    /// Include elevation as the 3rd coordinate value (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            zoom_start: default_zoom_start(),
            line_color: default_line_color(),
            line_weight: default_line_weight(),
            line_opacity: default_line_opacity(),
            include_elevation: true,
        }
    }
}

fn default_preview_rows() -> usize {
    10
}

fn default_zoom_start() -> u8 {
    13
}

fn default_line_color() -> String {
    "red".to_string()
}

fn default_line_weight() -> f64 {
    3.0
}

fn default_line_opacity() -> f64 {
    0.8
}

fn default_true() -> bool {
    true
}
