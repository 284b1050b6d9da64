use core_library::LibraryError;
use core_metadata::MetadataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Search service unavailable: {0}")]
    SearchUnavailable(String),

    #[error("Search service returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Catalog store error: {0}")]
    Store(#[from] LibraryError),
}

impl From<MetadataError> for CoreError {
    fn from(err: MetadataError) -> Self {
        if err.is_unavailable() {
            CoreError::SearchUnavailable(err.to_string())
        } else {
            CoreError::MalformedResponse(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
