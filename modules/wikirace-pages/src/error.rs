/// Result type alias for page operations.
pub type Result<T> = std::result::Result<T, PagesError>;

#[derive(Debug, thiserror::Error)]
pub enum PagesError {
    #[error("No article named: {0}")]
    NotFound(String),

    #[error("Article has no body content: {0}")]
    MissingBody(String),

    #[error(transparent)]
    Client(#[from] wiki_client::ClientError),
}
