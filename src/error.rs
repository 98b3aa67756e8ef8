use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("zero-length axis: min={min}, max={max}")]
    ZeroLengthAxis { min: f64, max: f64 },

    #[error("unable to find divisions for a {length}px axis spanning {duration}")]
    NoDivisions { length: f64, duration: f64 },

    #[error("unrecognised time unit `{0}`")]
    UnknownTimeUnit(String),

    #[error("invalid axis: min > max (min={min}, max={max})")]
    InvertedBounds { min: f64, max: f64 },

    #[error("not enough space for {axes} axes")]
    NotEnoughSpace { axes: usize },

    #[error("non-numeric min/max for {axis} axis")]
    NonNumericBounds { axis: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("font metrics I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
