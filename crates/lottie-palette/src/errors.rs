use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?}")]
    InvalidFormat(String),
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to parse animation document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to decompress animation: {0}")]
    Decompress(std::io::Error),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("Unsupported gradient data structure")]
    UnsupportedGradient,
    #[error("No gradient instance available to edit")]
    NoGradientSite,
    #[error("No color group {0}")]
    GroupNotFound(String),
    #[error("No color site at index {0}")]
    SiteNotFound(usize),
    #[error("Gradient needs at least 2 stops ({remaining} remaining)")]
    StopFloor { remaining: usize },
    #[error("Gradient stop {index} out of range ({len} stops)")]
    StopOutOfRange { index: usize, len: usize },
    #[error("Document location {0} no longer exists")]
    StaleSite(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No layer at index {0}")]
    LayerOutOfRange(usize),
    #[error("Theme not found: {0}")]
    ThemeNotFound(u64),
    #[error("Preset store error: {0}")]
    Store(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EditorError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
