use thiserror::Error;

/// Which side of the artwork a dimension refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    /// Artwork width or height is zero, negative or not finite.
    #[error("invalid artwork {axis}: {value}")]
    InvalidDimension { axis: Axis, value: f64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown {kind}: {id}")]
    UnknownCatalogItem { kind: &'static str, id: String },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = FrameError> = std::result::Result<T, E>;
