use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SDK returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected SDK response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid transaction payload: {0}")]
    Transaction(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Missing field in SDK response: {0}")]
    MissingField(&'static str),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

pub type DefiResult<T> = Result<T, DefiError>;
