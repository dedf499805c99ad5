use thiserror::Error;

/// Top-level error type for the surfview crate.
#[derive(Debug, Error)]
pub enum SurfviewError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Description(#[from] DescriptionError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the detector element/surface store.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors raised while loading a detector description file.
#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("cannot read description file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse description file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid description: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`SurfviewError`].
pub type Result<T> = std::result::Result<T, SurfviewError>;
