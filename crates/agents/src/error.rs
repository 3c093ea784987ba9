use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no text provided to improve")]
    NothingToImprove,

    /// The model's reply, after fence stripping, is not a JSON object of
    /// strings.
    #[error("failed to parse model response: {reason}")]
    UnparsableModelResponse { reason: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("provider error ({status}): {message}")]
    Provider { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
