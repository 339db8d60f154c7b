use serde::{Deserialize, Serialize};

/// Main color property of fills, strokes and most other paint nodes.
pub const COLOR_KEY: &str = "c";
/// Stroke color key used by older exporters.
pub const LEGACY_STROKE_COLOR_KEY: &str = "sc";
/// Gradient color container (`{ p, k }`).
pub const GRADIENT_KEY: &str = "g";
/// Every key that carries color data. Walkers treat these as leaves.
pub const COLOR_KEYS: [&str; 3] = [COLOR_KEY, LEGACY_STROKE_COLOR_KEY, GRADIENT_KEY];

/// Keyframe start value and property value field names.
pub const KEYFRAME_START_KEY: &str = "s";
pub const VALUE_KEY: &str = "k";
/// Number of color stops inside a gradient container.
pub const STOP_COUNT_KEY: &str = "p";

/// The top-level fields of a Lottie document that are read as typed data.
///
/// Everything else in the document stays untyped; this view is deserialized
/// from a `serde_json::Value` on demand and never written back.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LottieHeader {
    #[serde(default)]
    pub v: Option<String>,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub ip: f64,
    pub op: f64,
    pub fr: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub layers: Vec<LayerHeader>,
}

impl LottieHeader {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Frames between the in-point and the out-point.
    pub fn total_frames(&self) -> f64 {
        self.op - self.ip
    }

    /// Playback length in seconds. Not finite when `fr` is zero.
    pub fn duration_seconds(&self) -> f64 {
        self.total_frames() / self.fr
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LayerHeader {
    #[serde(default)]
    pub ty: u8, // 0..5
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool, // Hidden
}

impl LayerHeader {
    pub fn is_visible(&self) -> bool {
        !self.hd
    }

    pub fn type_name(&self) -> &'static str {
        match self.ty {
            0 => "precomp",
            1 => "solid",
            2 => "image",
            3 => "null",
            4 => "shape",
            5 => "text",
            _ => "unknown",
        }
    }
}

/// Paint node types that carry color, keyed by their `ty` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintType {
    Fill,
    Stroke,
    GradientFill,
    GradientStroke,
}

impl PaintType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "fl" => Some(PaintType::Fill),
            "st" => Some(PaintType::Stroke),
            "gf" => Some(PaintType::GradientFill),
            "gs" => Some(PaintType::GradientStroke),
            _ => None,
        }
    }

    /// Reads the `ty` tag of a JSON node, if it names a paint type.
    pub fn of_node(node: &serde_json::Value) -> Option<Self> {
        node.get("ty")
            .and_then(serde_json::Value::as_str)
            .and_then(Self::from_tag)
    }
}
