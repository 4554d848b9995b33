use thiserror::Error;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("event name \"{0}\" is not supported")]
    UnsupportedEvent(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("interval is not a number: {0}")]
    InvalidInterval(String),
    #[error("running command failed with code {code}, output: {output}")]
    CommandFailed { code: i32, output: String },
    #[error("failed to unmarshal request body: {0}")]
    MalformedJson(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
