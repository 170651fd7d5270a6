use thiserror::Error;

/// Top-level error type for the massing engine.
#[derive(Debug, Error)]
pub enum MassingError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors related to plan geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("loop has {0} vertices, at least 3 are required")]
    TooFewVertices(usize),

    #[error("kernel {operation} produced no result")]
    EmptyResult { operation: &'static str },
}

/// Errors related to level lookup.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level group `{0}` has no levels")]
    EmptyGroup(String),

    #[error("level not found: {0}")]
    NotFound(String),
}

/// Errors related to massing operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to the mass/building arena.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Convenience type alias for results using [`MassingError`].
pub type Result<T> = std::result::Result<T, MassingError>;
