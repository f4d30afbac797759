use thiserror::Error;

// Errors raised for malformed soil tables and configuration files.
// Numeric edge cases (division by zero, log of non-positive values) are not errors,
// they propagate as NaN.
#[derive(Debug, Error)]
pub enum SoilError {
    #[error("soil table has no columns")]
    EmptyTable,

    #[error("soil {soil} has {points} usable calibration points, at least 2 are required")]
    TooFewPoints { soil: usize, points: usize },

    #[error("soil {soil} has repeated water content values")]
    NonMonotonic { soil: usize },

    #[error("table row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown soil '{0}'")]
    UnknownSoil(String),

    #[error("failed to read soil parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse soil parameters: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SoilError>;
