use thiserror::Error;

/// Error taxonomy for catalog operations.
///
/// Provider failures never appear here: the enrichment service swallows them
/// and reports per-item `reason` fields instead.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Malformed or missing input; message is shown to the caller verbatim.
    #[error("{0}")]
    Validation(String),

    /// Missing entity.
    #[error("{0}")]
    NotFound(String),

    /// Page out of bounds or a reorder id-set mismatch.
    #[error("{0}")]
    PageRange(String),

    /// Backing store failure.
    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<kinodex_model::ModelError> for CatalogError {
    fn from(err: kinodex_model::ModelError) -> Self {
        CatalogError::Validation(err.to_string())
    }
}
