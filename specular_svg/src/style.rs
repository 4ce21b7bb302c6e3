use specular::Float;

/// Stroke and fill configuration shared by every plot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Style {
    pub laser_color: String,
    pub laser_weight: Float,
    pub mirror_color: String,
    pub mirror_weight: Float,
    pub border_color: String,
    pub border_weight: Float,
    /// When set, the beam polyline is also closed and filled underneath
    /// the strokes with this color.
    pub fill: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            laser_color: "#e63412".to_owned(),
            laser_weight: 2.0,
            mirror_color: "#1a1a1a".to_owned(),
            mirror_weight: 3.0,
            border_color: "#1a1a1a".to_owned(),
            border_weight: 1.0,
            fill: None,
        }
    }
}
