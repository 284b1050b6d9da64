use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    JsonParse(String),
}

impl MetadataError {
    /// The search service could not be reached or refused the request, as
    /// opposed to answering with something undecodable.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, MetadataError::JsonParse(_))
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
