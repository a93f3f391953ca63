use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("node name must not be empty")]
    EmptyNodeName,

    #[error("no candidate links to choose from")]
    NoCandidates,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read taxonomy {path}: {source}")]
    TaxonomyIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy: {0}")]
    TaxonomyParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
